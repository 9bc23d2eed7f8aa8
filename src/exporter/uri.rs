//! URI Overrides
//!
//! `url::Url` quietly repairs sloppy input (trims spaces, percent-encodes,
//! appends a root path). Override text is checked for characters a URI may
//! not contain before parsing, and the text is kept as written so the
//! exporter sends to exactly what was configured.

use std::fmt;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("illegal character {ch:?} at index {index}")]
    IllegalCharacter { ch: char, index: usize },

    #[error("malformed percent escape at index {index}")]
    MalformedEscape { index: usize },

    #[error(transparent)]
    Parse(#[from] url::ParseError),
}

/// An absolute URI override, as configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriOverride {
    raw: String,
    url: Url,
}

impl UriOverride {
    /// Relative references are rejected: an override must name a destination.
    pub fn parse(raw: &str) -> Result<Self, UriError> {
        check_characters(raw)?;
        let url = Url::parse(raw)?;
        Ok(UriOverride {
            raw: raw.to_string(),
            url,
        })
    }

    /// The text exactly as configured
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed (normalized) form
    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for UriOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// RFC 3986 excludes whitespace, controls and these delimiters everywhere
fn is_excluded(c: char) -> bool {
    c.is_control()
        || c.is_whitespace()
        || matches!(c, '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
}

fn check_characters(raw: &str) -> Result<(), UriError> {
    let bytes = raw.as_bytes();
    for (index, ch) in raw.char_indices() {
        if is_excluded(ch) {
            return Err(UriError::IllegalCharacter { ch, index });
        }
        if ch == '%' {
            let valid = bytes
                .get(index + 1..index + 3)
                .map(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .unwrap_or(false);
            if !valid {
                return Err(UriError::MalformedEscape { index });
            }
        }
    }
    Ok(())
}
