//! Codec error definitions.

use std::fmt;
use thiserror::Error;

/// The structure kinds of the text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Attribute,
    Location,
    Category,
    Link,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureKind::Attribute => "attribute",
            StructureKind::Location => "location",
            StructureKind::Category => "category",
            StructureKind::Link => "link",
        };
        f.write_str(name)
    }
}

/// Errors raised while parsing structure text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A mandatory key is absent.
    #[error("Invalid {kind} structure: `{field}` key is missing.")]
    MissingField {
        kind: StructureKind,
        field: &'static str,
    },

    /// Strict mode requires the value to be enclosed in quotes.
    #[error("Invalid {kind} structure: `{field}` is required to be enquoted.")]
    Unquoted { kind: StructureKind, field: String },

    /// Strict mode found keys the grammar does not define.
    #[error("Invalid {kind} structure: Unknown keys found (`{}`).", .fields.join("`, `"))]
    UnknownFields {
        kind: StructureKind,
        fields: Vec<String>,
    },

    /// Strict mode found attribute properties other than `immutable`/`required`.
    #[error("Invalid category structure: Unknown attribute properties found (`{}`).", .properties.join("`, `"))]
    UnknownProperties {
        attribute: String,
        properties: Vec<String>,
    },

    /// A field carries a value outside its domain.
    #[error("Invalid {kind} structure: `{field}` has invalid value `{value}`.")]
    InvalidValue {
        kind: StructureKind,
        field: &'static str,
        value: String,
    },

    /// A segment could not be split into `key=value`.
    #[error("Invalid {kind} structure: malformed segment `{segment}`.")]
    Malformed {
        kind: StructureKind,
        segment: String,
    },

    /// Strict mode met a non-empty line that is no structure at all.
    #[error("Invalid response data: `{0}`")]
    InvalidResponseData(String),
}

impl StructureError {
    /// The structure kind the error refers to, if any.
    pub fn kind(&self) -> Option<StructureKind> {
        match self {
            StructureError::MissingField { kind, .. }
            | StructureError::Unquoted { kind, .. }
            | StructureError::UnknownFields { kind, .. }
            | StructureError::InvalidValue { kind, .. }
            | StructureError::Malformed { kind, .. } => Some(*kind),
            StructureError::UnknownProperties { .. } => Some(StructureKind::Category),
            StructureError::InvalidResponseData(_) => None,
        }
    }
}

/// Result type for codec operations.
pub type StructureResult<T> = Result<T, StructureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_names_field() {
        let err = StructureError::MissingField {
            kind: StructureKind::Category,
            field: "scheme",
        };
        assert_eq!(
            err.to_string(),
            "Invalid category structure: `scheme` key is missing."
        );
        assert_eq!(err.kind(), Some(StructureKind::Category));
    }

    #[test]
    fn test_unknown_fields_enumerates_keys() {
        let err = StructureError::UnknownFields {
            kind: StructureKind::Category,
            fields: vec!["foo".into(), "bar".into()],
        };
        assert!(err.to_string().contains("`foo`, `bar`"));
    }
}
