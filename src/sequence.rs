//! Input-sequence sources.
//!
//! The engine consumes a plain ordered list of tokens. That list can come
//! from a token-per-line file, or from the record dump of an external lexical
//! analyzer (a "PIF" file), where each record's token is the text between the
//! first and second quote character of the line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{to_error_source, DescentError, Span};

/// How a sequence file should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceFormat {
    /// One token per line; blank lines ignored.
    #[default]
    Plain,
    /// Lexer records; the token is the first `'...'`-quoted segment.
    Pif,
}

static PIF_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']*)'").unwrap());

/// Reads the ordered token sequence from a file.
pub fn read_sequence(
    path: &std::path::Path,
    format: SequenceFormat,
) -> Result<Vec<String>, DescentError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| DescentError::io(path.display(), e))?;
    parse_sequence(&path.display().to_string(), &text, format)
}

/// Parses sequence text into the ordered token list.
pub fn parse_sequence(
    name: &str,
    text: &str,
    format: SequenceFormat,
) -> Result<Vec<String>, DescentError> {
    let mut sequence = Vec::new();
    let mut offset = 0;
    for raw in text.split('\n') {
        let line = raw.trim();
        if !line.is_empty() {
            match format {
                SequenceFormat::Plain => sequence.push(line.to_string()),
                SequenceFormat::Pif => {
                    let Some(captures) = PIF_TOKEN.captures(raw) else {
                        let src = to_error_source(name, text);
                        return Err(DescentError::sequence(
                            "lexer record has no quoted token",
                            src,
                            Span::new(offset, offset + raw.trim_end().len()),
                        ));
                    };
                    sequence.push(captures[1].to_string());
                }
            }
        }
        offset += raw.len() + 1;
    }
    Ok(sequence)
}
