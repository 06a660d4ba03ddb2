//! Lexical helpers shared by the structure grammars.

use crate::occi::error::{StructureError, StructureKind, StructureResult};

/// Strip a leading `<header>:` prefix (ASCII case-insensitive).
///
/// Returns the remainder after the colon, or `None` when the line does not
/// start with the header.
pub(crate) fn strip_header<'a>(line: &'a str, header: &str) -> Option<&'a str> {
    let prefix = line.get(..header.len())?;
    if !prefix.eq_ignore_ascii_case(header) {
        return None;
    }
    line[header.len()..].strip_prefix(':')
}

/// Split on `separator`, ignoring separators inside double quotes.
pub(crate) fn split_segments(text: &str, separator: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut quoted = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '"' {
            quoted = !quoted;
        } else if ch == separator && !quoted {
            segments.push(&text[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    segments.push(&text[start..]);
    segments
}

/// Strip enclosing double quotes from a value.
///
/// With `required` set, a bare value is an error naming `field`.
pub(crate) fn strip_quotes(
    value: &str,
    required: bool,
    kind: StructureKind,
    field: &str,
) -> StructureResult<String> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Ok(value[1..value.len() - 1].to_string());
    }
    if required {
        return Err(StructureError::Unquoted {
            kind,
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// The `key=value` segments of a structure line.
///
/// Later duplicates replace earlier ones; declaration order is kept for the
/// remaining keys so unknown-key reports stay stable.
#[derive(Debug, Default)]
pub(crate) struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Parse `key=value` segments, skipping blank ones.
    pub(crate) fn parse<'a>(
        segments: impl IntoIterator<Item = &'a str>,
        kind: StructureKind,
    ) -> StructureResult<Self> {
        let mut fields = Fields::default();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| StructureError::Malformed {
                    kind,
                    segment: segment.to_string(),
                })?;
            fields.insert(key.trim(), value.trim());
        }
        Ok(fields)
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Remove and return the raw value of `key`.
    pub(crate) fn take(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Remove `key`, failing when it is absent.
    pub(crate) fn take_required(
        &mut self,
        key: &'static str,
        kind: StructureKind,
    ) -> StructureResult<String> {
        self.take(key)
            .ok_or(StructureError::MissingField { kind, field: key })
    }

    /// Remove `key` and strip its quotes.
    pub(crate) fn take_quoted(
        &mut self,
        key: &str,
        strict: bool,
        kind: StructureKind,
    ) -> StructureResult<Option<String>> {
        self.take(key)
            .map(|value| strip_quotes(&value, strict, kind, key))
            .transpose()
    }

    /// Fail in strict mode when keys are left over.
    pub(crate) fn finish(self, strict: bool, kind: StructureKind) -> StructureResult<()> {
        if strict && !self.entries.is_empty() {
            return Err(StructureError::UnknownFields {
                kind,
                fields: self.entries.into_iter().map(|(k, _)| k).collect(),
            });
        }
        Ok(())
    }

    /// Consume the remaining entries.
    pub(crate) fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }
}
