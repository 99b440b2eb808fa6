//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes word rarity scoring over the MCP protocol so AI assistants can
//! check vocabulary difficulty via stdio transport.
//!
//! The server is a presentation layer over `word_rarity_core`: every tool
//! delegates to the same functions the CLI commands call, against one shared
//! [`FrequencyOracle`].

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use word_rarity_core::{
    DEFAULT_LANGUAGE, DEFAULT_MAX_LENGTH, FrequencyOracle, LayeredOracle, RarityError,
    analyze_rarity, word_rarity,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `word_rarity` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct WordRarityParams {
    /// The word to score.
    pub word: String,
    /// Language code (e.g. "en", "fr"). Defaults to the server's language.
    pub language: Option<String>,
}

/// Parameters for the `analyze_rarity` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeRarityParams {
    /// The text to analyze.
    pub text: String,
    /// Language code. Defaults to the server's language.
    pub language: Option<String>,
    /// Maximum accepted length in characters. Capped at the server's limit.
    pub max_length: Option<usize>,
    /// Whether to strip markdown formatting before analysis.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `list_languages` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListLanguagesParams {}

/// MCP server exposing word rarity scoring to AI assistants.
#[derive(Clone)]
pub struct RarityServer {
    oracle: Arc<dyn FrequencyOracle>,
    language: String,
    max_length: usize,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for RarityServer {
    fn default() -> Self {
        Self::new(
            Arc::new(LayeredOracle::bundled()),
            DEFAULT_LANGUAGE,
            DEFAULT_MAX_LENGTH,
        )
    }
}

fn rarity_error(err: &RarityError) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl RarityServer {
    /// Create a server over `oracle` with the given request defaults.
    pub fn new(oracle: Arc<dyn FrequencyOracle>, language: &str, max_length: usize) -> Self {
        Self {
            oracle,
            language: language.to_string(),
            max_length,
            tool_router: Self::tool_router(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "default_language": self.language,
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Score a single word.
    #[tool(
        description = "Score how rare a single word is, from 0 (very common) to 8 (very rare)."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn word_rarity(
        &self,
        Parameters(params): Parameters<WordRarityParams>,
    ) -> Result<CallToolResult, McpError> {
        let language = params.language.as_deref().unwrap_or(&self.language);
        tracing::debug!(tool = "word_rarity", language, "executing MCP tool");

        let score = word_rarity(self.oracle.as_ref(), &params.word, language)
            .map_err(|e| rarity_error(&e))?;

        let json = to_json(&serde_json::json!({
            "word": params.word,
            "language": language,
            "score": score,
        }))?;

        tracing::info!(tool = "word_rarity", score, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Rank the distinct words of a text by rarity.
    #[tool(
        description = "Analyze a text: average rarity plus every distinct word scored, rarest first."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn analyze_rarity(
        &self,
        Parameters(params): Parameters<AnalyzeRarityParams>,
    ) -> Result<CallToolResult, McpError> {
        let language = params.language.as_deref().unwrap_or(&self.language);
        let max_length = params
            .max_length
            .map_or(self.max_length, |requested| requested.min(self.max_length));
        tracing::debug!(
            tool = "analyze_rarity",
            language,
            max_length,
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );

        let text = if params.strip_markdown {
            word_rarity_core::markdown::visible_text(&params.text)
        } else {
            params.text
        };

        let report = analyze_rarity(self.oracle.as_ref(), &text, language, max_length)
            .map_err(|e| rarity_error(&e))?;
        let json = to_json(&report)?;

        tracing::info!(
            tool = "analyze_rarity",
            words = report.len(),
            average = report.average,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// List supported language codes.
    #[tool(description = "List the language codes that can be analyzed.")]
    #[tracing::instrument(skip(self, _params), fields(otel.kind = "server"))]
    fn list_languages(
        &self,
        Parameters(_params): Parameters<ListLanguagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let languages = self.oracle.supported_languages();
        let json = to_json(&serde_json::json!({ "languages": languages }))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for RarityServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Scores words from 0 (very common) to 8 (very rare); \
                 use analyze_rarity for whole texts.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use word_rarity_core::FrequencyTable;

    fn server() -> RarityServer {
        server_with_limit(DEFAULT_MAX_LENGTH)
    }

    fn server_with_limit(max_length: usize) -> RarityServer {
        let table = FrequencyTable::new()
            .with_language(
                "en",
                [
                    ("the", 7.73),
                    ("and", 7.45),
                    ("fox", 4.5),
                    ("dog", 5.2),
                    ("hello", 5.0),
                    ("there", 6.4),
                ],
            )
            .unwrap()
            .with_language("fr", [("le", 7.5)])
            .unwrap();
        RarityServer::new(Arc::new(table), DEFAULT_LANGUAGE, max_length)
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = RarityServer::default();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn server_has_tools_capability() {
        let server = RarityServer::default();
        let info = ServerHandler::get_info(&server);

        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn server_has_instructions() {
        let server = RarityServer::default();
        let info = ServerHandler::get_info(&server);

        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains(env!("CARGO_PKG_NAME")));
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn extract_json(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("output should be valid JSON")
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = RarityServer::default();
        let params = Parameters(GetInfoParams {
            format: "text".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");

        assert!(!result.is_error.unwrap_or(false));
        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = RarityServer::default();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let json = extract_json(&result);

        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["default_language"], "en");
    }

    #[test]
    fn word_rarity_tool_scores_digits_as_max() {
        let server = server();
        let params = Parameters(WordRarityParams {
            word: "12345".to_string(),
            language: None,
        });

        let result = server.word_rarity(params).expect("word_rarity should succeed");
        let json = extract_json(&result);
        assert_eq!(json["score"].as_f64(), Some(8.0));
        assert_eq!(json["language"], "en");
    }

    #[test]
    fn word_rarity_tool_rejects_unknown_language() {
        let server = server();
        let params = Parameters(WordRarityParams {
            word: "hello".to_string(),
            language: Some("invalid_lang".to_string()),
        });

        let err = server
            .word_rarity(params)
            .expect_err("unknown language should fail");
        assert!(err.message.contains("Unsupported language: invalid_lang"));
    }

    #[test]
    fn analyze_rarity_tool_ranks_words() {
        let server = server();
        let params = Parameters(AnalyzeRarityParams {
            text: "The quixotic fox and the dog".to_string(),
            language: None,
            max_length: None,
            strip_markdown: false,
        });

        let result = server
            .analyze_rarity(params)
            .expect("analyze_rarity should succeed");
        let json = extract_json(&result);

        let words = json["words"].as_array().expect("words array");
        assert_eq!(words.len(), 5);
        assert_eq!(words[0]["word"], "quixotic");
        assert!(json["average"].as_f64().expect("average") > 0.0);
    }

    #[test]
    fn analyze_rarity_tool_enforces_max_length() {
        let server = server();
        let params = Parameters(AnalyzeRarityParams {
            text: "a".repeat(11),
            language: None,
            max_length: Some(10),
            strip_markdown: false,
        });

        let err = server
            .analyze_rarity(params)
            .expect_err("long text should fail");
        assert!(err.message.contains("Maximum allowed length is 10 characters"));
    }

    #[test]
    fn analyze_rarity_tool_caps_client_max_length() {
        let server = server_with_limit(20);
        let params = Parameters(AnalyzeRarityParams {
            text: "a".repeat(21),
            language: None,
            max_length: Some(usize::MAX),
            strip_markdown: false,
        });

        let err = server
            .analyze_rarity(params)
            .expect_err("client limit must not lift the server limit");
        assert!(err.message.contains("Maximum allowed length is 20 characters"));

        let params = Parameters(AnalyzeRarityParams {
            text: "a".repeat(20),
            language: None,
            max_length: Some(1_000),
            strip_markdown: false,
        });
        assert!(server.analyze_rarity(params).is_ok());
    }

    #[test]
    fn analyze_rarity_tool_strips_markdown() {
        let server = server();
        let params = Parameters(AnalyzeRarityParams {
            text: "Hello there.\n\n```\nzzyzx\n```\n".to_string(),
            language: None,
            max_length: None,
            strip_markdown: true,
        });

        let result = server
            .analyze_rarity(params)
            .expect("analyze_rarity should succeed");
        let json = extract_json(&result);
        let words: Vec<&str> = json["words"]
            .as_array()
            .expect("words array")
            .iter()
            .filter_map(|w| w["word"].as_str())
            .collect();
        assert!(!words.contains(&"zzyzx"));
        assert!(words.contains(&"hello"));
    }

    #[test]
    fn list_languages_tool_lists_oracle_languages() {
        let server = server();
        let result = server
            .list_languages(Parameters(ListLanguagesParams::default()))
            .expect("list_languages should succeed");
        let json = extract_json(&result);

        let languages: Vec<&str> = json["languages"]
            .as_array()
            .expect("languages array")
            .iter()
            .filter_map(|l| l.as_str())
            .collect();
        assert_eq!(languages, vec!["en", "fr"]);
    }

    #[test]
    fn default_server_lists_bundled_languages() {
        let server = RarityServer::default();
        let result = server
            .list_languages(Parameters(ListLanguagesParams::default()))
            .expect("list_languages should succeed");
        let json = extract_json(&result);

        let languages: Vec<&str> = json["languages"]
            .as_array()
            .expect("languages array")
            .iter()
            .filter_map(|l| l.as_str())
            .collect();
        assert_eq!(languages, word_rarity_core::BUNDLED_LANGUAGES);
    }
}
