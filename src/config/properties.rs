//! Properties-Style Settings
//!
//! Supports two on-disk formats:
//! - Java-style `.properties` text (`key=value`, `key: value` or `key value`)
//! - TOML, with nested tables flattened into dotted keys

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::source::ConfigSource;
use super::ConfigError;

/// Static key/value settings, the lower layer of a [`super::LayeredConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Load a settings file. `.toml` files are parsed as TOML, anything
    /// else as properties text.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        let properties = if is_toml {
            Self::from_toml_str(&text)?
        } else {
            Self::parse(&text)?
        };

        tracing::info!(
            path = %path.display(),
            keys = properties.len(),
            "Loaded settings file"
        );
        Ok(properties)
    }

    /// Parse Java-style properties text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        let mut lines = text.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            let first = raw.trim_start();
            if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
                continue;
            }

            // Join continuation lines into one logical line
            let mut logical = String::new();
            let mut current = first;
            loop {
                if ends_with_continuation(current) {
                    logical.push_str(&current[..current.len() - 1]);
                    match lines.next() {
                        Some((_, next)) => current = next.trim_start(),
                        None => break,
                    }
                } else {
                    logical.push_str(current);
                    break;
                }
            }

            let line_no = idx + 1;
            let (key, value) = split_key_value(&logical);
            values.insert(unescape(key, line_no)?, unescape(value, line_no)?);
        }

        Ok(Properties { values })
    }

    /// Parse a TOML document, flattening nested tables into dotted keys
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(text)?;
        let mut values = BTreeMap::new();
        flatten_toml("", &table, &mut values);
        Ok(Properties { values })
    }
}

impl ConfigSource for Properties {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Properties {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An odd number of trailing backslashes continues the line
fn ends_with_continuation(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

/// Split a logical line at the first unescaped `=`, `:` or blank
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(&['=', ':'][..]) {
        rest = stripped.trim_start_matches(is_blank);
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    // Consecutive \uXXXX escapes are decoded together so surrogate pairs work
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_utf16(&mut units, &mut out, line)?;
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return Err(ConfigError::MalformedEscape {
                        line,
                        escape: format!("\\u{hex}"),
                    });
                }
                let unit = u16::from_str_radix(&hex, 16).map_err(|_| {
                    ConfigError::MalformedEscape {
                        line,
                        escape: format!("\\u{hex}"),
                    }
                })?;
                units.push(unit);
            }
            other => {
                flush_utf16(&mut units, &mut out, line)?;
                match other {
                    Some('t') => out.push('\t'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('f') => out.push('\x0c'),
                    Some(c) => out.push(c),
                    None => {}
                }
            }
        }
    }
    flush_utf16(&mut units, &mut out, line)?;
    Ok(out)
}

fn flush_utf16(units: &mut Vec<u16>, out: &mut String, line: usize) -> Result<(), ConfigError> {
    if units.is_empty() {
        return Ok(());
    }
    for decoded in char::decode_utf16(units.drain(..)) {
        let c = decoded.map_err(|e| ConfigError::MalformedEscape {
            line,
            escape: format!("\\u{:04x}", e.unpaired_surrogate()),
        })?;
        out.push(c);
    }
    Ok(())
}

fn flatten_toml(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_toml(&full_key, inner, out),
            other => {
                out.insert(full_key, toml_scalar(other));
            }
        }
    }
}

fn toml_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items.iter().map(toml_scalar).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
