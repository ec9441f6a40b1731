use crate::integer::IntegerKind;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/* Raw value of a declared constant as it came out of the declaration source.
 * Variant order matters for untagged deserialization: integers are tried
 * before floats, and strings carry source-style integer literals. */
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(untagged)]
#[serde(expecting = "expected an integer or an integer literal string")]
pub enum DeclaredValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Literal(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("floating-point constant {0} is not an integer")]
    NotInteger(String),

    #[error("'{0}' is not an integer literal")]
    Malformed(String),

    #[error("literal '{0}' does not fit in 128 bits")]
    Overflow(String),
}

impl DeclaredValue {
    /* Interpret the declared value as an exact integer. No range check against
     * a declared kind happens here. */
    pub fn resolve(&self) -> Result<i128, LiteralError> {
        match self {
            DeclaredValue::Signed(v) => Ok(*v as i128),
            DeclaredValue::Unsigned(v) => Ok(*v as i128),
            DeclaredValue::Float(v) => Err(LiteralError::NotInteger(v.to_string())),
            DeclaredValue::Literal(text) => parse_int_literal(text),
        }
    }
}

impl fmt::Display for DeclaredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredValue::Signed(v) => write!(f, "{}", v),
            DeclaredValue::Unsigned(v) => write!(f, "{}", v),
            DeclaredValue::Float(v) => write!(f, "{}", v),
            DeclaredValue::Literal(text) => f.write_str(text),
        }
    }
}

/* Parse a Go-style integer literal: optional sign, `0x`/`0o`/`0b` prefixes,
 * legacy leading-zero octal, `_` digit separators. */
pub fn parse_int_literal(text: &str) -> Result<i128, LiteralError> {
    let malformed = || LiteralError::Malformed(text.to_string());

    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let lower = unsigned.to_ascii_lowercase();
    if !lower.starts_with("0x") && (lower.contains('.') || lower.contains('e')) {
        return Err(LiteralError::NotInteger(trimmed.to_string()));
    }
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };

    let digits = digits.strip_prefix('_').unwrap_or(digits);
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__")
    {
        return Err(malformed());
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }

    let magnitude =
        u128::from_str_radix(&cleaned, radix).map_err(|_| LiteralError::Overflow(text.to_string()))?;
    if negative {
        if magnitude > i128::MAX as u128 + 1 {
            return Err(LiteralError::Overflow(text.to_string()));
        }
        Ok((magnitude as i128).wrapping_neg())
    } else {
        i128::try_from(magnitude).map_err(|_| LiteralError::Overflow(text.to_string()))
    }
}

/* One named constant of an enumeration group, in declaration order */
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Declaration {
    pub name: String,
    pub value: DeclaredValue,
    /// Trailing line comment attached to the declaration, if any.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: DeclaredValue::Signed(value),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/* A declared integer type plus every constant declared for it */
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct EnumDecl {
    pub name: String,
    pub underlying: IntegerKind,
    #[serde(default)]
    pub values: Vec<Declaration>,
}

/* Naming options applied to every declaration before tables are built */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GenerationOptions {
    /// Literal prefix stripped from identifier-derived display names.
    #[serde(default)]
    pub trim_prefix: String,
    /// Use the trailing line comment as display name when present.
    #[serde(default)]
    pub line_comment: bool,
}

impl GenerationOptions {
    /* Display name for one declaration. A non-blank line comment wins when
     * `line_comment` is set and is used verbatim (whitespace-trimmed); the
     * prefix is only ever stripped from identifiers, and never down to an
     * empty name. */
    pub fn display_name(&self, ident: &str, comment: Option<&str>) -> String {
        if self.line_comment {
            if let Some(text) = comment.map(str::trim).filter(|text| !text.is_empty()) {
                return text.to_string();
            }
        }
        match ident.strip_prefix(self.trim_prefix.as_str()) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => ident.to_string(),
        }
    }
}
