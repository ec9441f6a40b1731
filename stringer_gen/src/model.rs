/* Resolved enumeration groups: declarations turned into concrete integers
 * of the declared kind, with display names already derived. */

use crate::error::{GenError, GenResult};
use serde_derive::Serialize;
use stringer_types::{EnumDecl, GenerationOptions, IntegerKind};

/// One declared constant after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    /// Identifier as written in the declaration.
    pub ident: String,
    /// Name returned by stringification.
    pub name: String,
    pub value: i128,
}

/// A declared type and all of its constants, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumGroup {
    pub type_name: String,
    pub kind: IntegerKind,
    pub values: Vec<Value>,
}

impl EnumGroup {
    /* Resolve a declaration against its underlying kind. Blank (`_`)
     * declarations are skipped; every other value must be an integer the
     * kind can represent. */
    pub fn from_decl(decl: &EnumDecl, options: &GenerationOptions) -> GenResult<Self> {
        let mut values = Vec::with_capacity(decl.values.len());

        for declaration in &decl.values {
            if declaration.name == "_" {
                continue;
            }

            let unsupported = |reason: String| GenError::UnsupportedValueKind {
                type_name: decl.name.clone(),
                name: declaration.name.clone(),
                value: declaration.value.to_string(),
                reason,
            };

            if declaration.name.trim().is_empty() {
                return Err(unsupported("constant has an empty name".to_string()));
            }

            let value = declaration
                .value
                .resolve()
                .map_err(|err| unsupported(err.to_string()))?;
            if !decl.underlying.contains(value) {
                return Err(unsupported(format!(
                    "out of range for {} [{}, {}]",
                    decl.underlying,
                    decl.underlying.min_value(),
                    decl.underlying.max_value()
                )));
            }

            values.push(Value {
                ident: declaration.name.clone(),
                name: options.display_name(&declaration.name, declaration.comment.as_deref()),
                value,
            });
        }

        if values.is_empty() {
            return Err(GenError::NoValues {
                type_name: decl.name.clone(),
            });
        }

        Ok(Self {
            type_name: decl.name.clone(),
            kind: decl.underlying,
            values,
        })
    }

    /* First-declared name for a value, if the value is declared at all */
    pub fn canonical_name(&self, value: i128) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name.as_str())
    }
}
