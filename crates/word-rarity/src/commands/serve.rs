//! Serve command: MCP server on stdio.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument};

use word_rarity_core::{Config, LayeredOracle};

use crate::server::RarityServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the MCP server until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    oracle: LayeredOracle,
    config: &Config,
) -> anyhow::Result<()> {
    let server = RarityServer::new(Arc::new(oracle), config.language(), config.max_length());
    info!(language = config.language(), "starting MCP server on stdio");

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service.waiting().await.context("MCP server task failed")?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
