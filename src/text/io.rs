// Line-oriented text file loading.
//
// Input files are legacy single-byte text (ISO-8859-1). Every byte maps to
// the Unicode code point with the same value, so decoding can't fail and
// no byte is ever dropped.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::TextContext;

/// Read a whole file and return its lines, each trimmed and passed through
/// `parse`. Lines keep their file order; blank lines are kept as empty strings.
pub fn load_file<T, F>(path: impl AsRef<Path>, parse: F) -> Result<Vec<T>>
where
    F: Fn(&str) -> T,
{
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = decode_latin1(&bytes);

    let records: Vec<T> = split_lines(&text).map(|line| parse(line.trim())).collect();

    debug!(path = %path.display(), lines = records.len(), "Loaded text file");
    Ok(records)
}

/// Read a file's trimmed lines with no further parsing.
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    load_file(path, str::to_string)
}

/// Read a file and clean every line with `ctx`. Returns the raw lines
/// alongside their token lists, in file order.
pub fn load_documents(
    path: impl AsRef<Path>,
    ctx: &TextContext,
    min_length: usize,
) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let path = path.as_ref();
    let lines = load_lines(path)?;
    let documents = ctx.preprocess(&lines, min_length);
    info!(path = %path.display(), documents = documents.len(), "Documents loaded");
    Ok((lines, documents))
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Lines ended by `\n`, `\r\n` or a lone `\r`. A final terminator doesn't
/// start an extra empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let body = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text);
    let empty = text.is_empty();
    body.split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .filter(move |_| !empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1_high_bytes() {
        assert_eq!(decode_latin1(b"caf\xe9"), "café");
        assert_eq!(decode_latin1(b"\xa3 10"), "£ 10");
    }

    #[test]
    fn test_split_lines_handles_every_terminator() {
        let lines: Vec<&str> = split_lines("a\r\nb\nc\rd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_lines_trailing_terminator_and_blanks() {
        assert_eq!(split_lines("a\r\r").collect::<Vec<_>>(), vec!["a", ""]);
        assert_eq!(split_lines("a\n").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("\n").collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_decode_latin1_ascii_is_unchanged() {
        assert_eq!(decode_latin1(b"plain text"), "plain text");
    }
}
