//! Field definitions and type classification for scaffolding
//!
//! Field types are free-form SQL-style tokens. They are never rejected:
//! [`classify`] maps every token onto one of a fixed set of [`TargetType`]s
//! and falls back to text for anything it does not recognise.
//!
//! # Classification
//!
//! ```text
//! VARCHAR CHAR NVARCHAR NCHAR CLOB TEXT STRING          → text       (string)
//! INT INTEGER TINYINT SMALLINT MEDIUMINT BIGINT          → integer    (int)
//! FLOAT DOUBLE REAL DECIMAL NUMERIC                      → float      (float64)
//! DATE DATETIME TIMESTAMP TIME YEAR                      → timestamp  (time.Time)
//! BINARY VARBINARY BLOB LONGBLOB MEDIUMBLOB TINYBLOB BYTEA → bytes    ([]byte)
//! BOOL BOOLEAN                                           → boolean    (bool)
//! anything else                                          → text       (string)
//! ```
//!
//! Length and precision suffixes are ignored: `VARCHAR(255)` and
//! `DECIMAL(10,2)` classify exactly like `VARCHAR` and `DECIMAL`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ScaffoldError, ScaffoldResult};

/// Leading type name, before any `(n)` or `(p,s)` suffix
static BASE_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z]+)").expect("static regex is valid"));

/// A single field as submitted by the user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name (e.g., "quantity", "`created_at`")
    pub name: String,
    /// Source-level type token (e.g., "INT", "VARCHAR(255)")
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Target type a field is generated as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Character data
    Text,
    /// Whole numbers
    Integer,
    /// Floating-point and fixed-point numbers
    Float,
    /// Dates and times
    Timestamp,
    /// Raw bytes
    Bytes,
    /// True/false
    Boolean,
}

/// Classify a source-level type token
///
/// Total and case-insensitive. Never fails.
///
/// # Examples
///
/// ```
/// # use grails_scaffold::scaffold::field_type::{classify, TargetType};
/// assert_eq!(classify("VARCHAR(255)"), TargetType::Text);
/// assert_eq!(classify("BIGINT"), TargetType::Integer);
/// assert_eq!(classify("decimal(10,2)"), TargetType::Float);
/// assert_eq!(classify("FROBNICATE"), TargetType::Text);
/// ```
#[must_use]
pub fn classify(type_token: &str) -> TargetType {
    let Some(captures) = BASE_TYPE.captures(type_token) else {
        return TargetType::Text;
    };

    match captures[1].to_ascii_uppercase().as_str() {
        "INT" | "INTEGER" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "BIGINT" => TargetType::Integer,
        "FLOAT" | "DOUBLE" | "REAL" | "DECIMAL" | "NUMERIC" => TargetType::Float,
        "DATE" | "DATETIME" | "TIMESTAMP" | "TIME" | "YEAR" => TargetType::Timestamp,
        "BINARY" | "VARBINARY" | "BLOB" | "LONGBLOB" | "MEDIUMBLOB" | "TINYBLOB" | "BYTEA" => {
            TargetType::Bytes
        }
        "BOOL" | "BOOLEAN" => TargetType::Boolean,
        // VARCHAR, CHAR, NVARCHAR, NCHAR, CLOB, TEXT, STRING and everything unknown
        _ => TargetType::Text,
    }
}

impl TargetType {
    /// Go type used in generated models
    #[must_use]
    pub const fn go_type(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "int",
            Self::Float => "float64",
            Self::Timestamp => "time.Time",
            Self::Bytes => "[]byte",
            Self::Boolean => "bool",
        }
    }

    /// HTML `<input type>` used in generated forms
    #[must_use]
    pub const fn html_input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer | Self::Float => "number",
            Self::Timestamp => "datetime-local",
            Self::Bytes => "file",
            Self::Boolean => "checkbox",
        }
    }

    /// Whether the generated model needs the `time` import
    #[must_use]
    pub const fn needs_time_import(self) -> bool {
        matches!(self, Self::Timestamp)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Bytes => "bytes",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

impl FieldSpec {
    /// Create a field from a name and a type token
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }

    /// Parse a field from command-line form
    ///
    /// Format: `name:TYPE`. The type may itself contain colons or commas
    /// (everything after the first colon is the type token).
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::field_type::FieldSpec;
    /// let field = FieldSpec::parse("price:DECIMAL(10,2)").unwrap();
    /// assert_eq!(field.name, "price");
    /// assert_eq!(field.field_type, "DECIMAL(10,2)");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidIdentifier`] if the colon or either
    /// side of it is missing.
    pub fn parse(input: &str) -> ScaffoldResult<Self> {
        let (name, field_type) = input.split_once(':').ok_or_else(|| {
            ScaffoldError::invalid_identifier(input, "expected format name:TYPE")
        })?;

        let name = name.trim();
        let field_type = field_type.trim();
        if name.is_empty() {
            return Err(ScaffoldError::invalid_identifier(input, "field name cannot be empty"));
        }
        if field_type.is_empty() {
            return Err(ScaffoldError::invalid_identifier(input, "field type cannot be empty"));
        }

        Ok(Self::new(name, field_type))
    }

    /// Classified target type of this field
    #[must_use]
    pub fn target_type(&self) -> TargetType {
        classify(&self.field_type)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_families() {
        let cases = [
            ("VARCHAR(255)", TargetType::Text),
            ("char", TargetType::Text),
            ("NVARCHAR(40)", TargetType::Text),
            ("text", TargetType::Text),
            ("INT", TargetType::Integer),
            ("BIGINT", TargetType::Integer),
            ("tinyint(1)", TargetType::Integer),
            ("FLOAT", TargetType::Float),
            ("DECIMAL(10,2)", TargetType::Float),
            ("numeric", TargetType::Float),
            ("DATETIME", TargetType::Timestamp),
            ("year", TargetType::Timestamp),
            ("BLOB", TargetType::Bytes),
            ("varbinary(16)", TargetType::Bytes),
            ("BOOLEAN", TargetType::Boolean),
            ("bool", TargetType::Boolean),
        ];

        for (input, expected) in cases {
            assert_eq!(classify(input), expected, "classify({input})");
        }
    }

    #[test]
    fn test_classify_unknown_defaults_to_text() {
        assert_eq!(classify("FROBNICATE"), TargetType::Text);
        assert_eq!(classify(""), TargetType::Text);
        assert_eq!(classify("(255)"), TargetType::Text);
        assert_eq!(classify("   "), TargetType::Text);
        assert_eq!(classify("42"), TargetType::Text);
    }

    #[test]
    fn test_classify_ignores_surrounding_whitespace() {
        assert_eq!(classify("  int "), TargetType::Integer);
    }

    #[test]
    fn test_go_types() {
        assert_eq!(TargetType::Text.go_type(), "string");
        assert_eq!(TargetType::Integer.go_type(), "int");
        assert_eq!(TargetType::Float.go_type(), "float64");
        assert_eq!(TargetType::Timestamp.go_type(), "time.Time");
        assert_eq!(TargetType::Bytes.go_type(), "[]byte");
        assert_eq!(TargetType::Boolean.go_type(), "bool");
    }

    #[test]
    fn test_html_input_types() {
        assert_eq!(TargetType::Integer.html_input_type(), "number");
        assert_eq!(TargetType::Boolean.html_input_type(), "checkbox");
        assert_eq!(TargetType::Text.html_input_type(), "text");
    }

    #[test]
    fn test_parse_field() {
        let field = FieldSpec::parse("quantity:INT").unwrap();
        assert_eq!(field.name, "quantity");
        assert_eq!(field.field_type, "INT");
        assert_eq!(field.target_type(), TargetType::Integer);
    }

    #[test]
    fn test_parse_field_with_precision() {
        let field = FieldSpec::parse("price:DECIMAL(10,2)").unwrap();
        assert_eq!(field.field_type, "DECIMAL(10,2)");
        assert_eq!(field.target_type(), TargetType::Float);
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(FieldSpec::parse("quantity").is_err());
        assert!(FieldSpec::parse(":INT").is_err());
        assert!(FieldSpec::parse("quantity:").is_err());
    }

    #[test]
    fn test_serde_uses_type_key() {
        let field: FieldSpec = serde_json::from_str(r#"{"name":"price","type":"DECIMAL"}"#).unwrap();
        assert_eq!(field, FieldSpec::new("price", "DECIMAL"));
        assert_eq!(
            serde_json::to_string(&field).unwrap(),
            r#"{"name":"price","type":"DECIMAL"}"#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldSpec::new("price", "DECIMAL").to_string(), "price:DECIMAL");
    }
}
