//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;

pub mod analyze;
pub mod info;
pub mod languages;
pub mod score;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Read all of `reader`, failing once more than `max_bytes` arrive.
pub fn read_input_stream<R: Read>(reader: R, max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    match max_bytes {
        Some(max) => {
            reader
                .take((max as u64).saturating_add(1))
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            if buf.len() > max {
                anyhow::bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            let mut reader = reader;
            reader
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
        }
    }
    String::from_utf8(buf).context("stdin is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_within_limit_is_read() {
        let text = read_input_stream("hello world".as_bytes(), Some(11)).unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn stream_over_limit_fails() {
        let err = read_input_stream("hello world".as_bytes(), Some(5)).unwrap_err();
        assert!(err.to_string().contains("exceeds 5 bytes"));
    }

    #[test]
    fn stream_with_largest_limit_is_read() {
        let text = read_input_stream("abc".as_bytes(), Some(usize::MAX)).unwrap();
        assert_eq!(text, "abc");
    }

    #[test]
    fn stream_without_limit_reads_everything() {
        let big = "word ".repeat(1000);
        assert_eq!(read_input_stream(big.as_bytes(), None).unwrap(), big);
    }

    #[test]
    fn stream_rejects_invalid_utf8() {
        assert!(read_input_stream(&[0xff, 0xfe][..], None).is_err());
    }

    #[test]
    fn file_over_limit_fails_before_reading() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "0123456789").unwrap();
        let path = Utf8Path::from_path(tmp.path()).unwrap();

        let err = read_input_file(path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
        assert_eq!(read_input_file(path, Some(10)).unwrap(), "0123456789");
    }
}
