use thiserror::Error;

/// Result alias used across the generator.
pub type GenResult<T> = Result<T, GenError>;

/// Errors produced while analyzing, emitting or formatting a group.
#[derive(Debug, Error)]
pub enum GenError {
    /// A declared value cannot be held by the declared integer kind.
    #[error("type '{type_name}': constant '{name}' = {value} is not supported: {reason}")]
    UnsupportedValueKind {
        type_name: String,
        name: String,
        value: String,
        reason: String,
    },

    /// The group declares no (non-blank) constants.
    #[error("type '{type_name}' has no values defined")]
    NoValues { type_name: String },

    /// Tables or plans are structurally inconsistent; indicates a generator bug.
    #[error("internal invariant violated for type '{type_name}': {detail}")]
    InternalInvariantViolation { type_name: String, detail: String },

    /// Two groups in one pass share a type name.
    #[error("type '{type_name}' is declared more than once")]
    DuplicateType { type_name: String },

    /// The formatting stage refused the emitted text. `buffer` is the
    /// unformatted input, kept verbatim for diagnosis.
    #[error("formatter rejected generated code for {}: {message}", type_names.join(", "))]
    FormatterRejected {
        type_names: Vec<String>,
        message: String,
        buffer: Vec<u8>,
    },

    /// The external formatter process could not be driven.
    #[error("failed to run formatter '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /* Whether a caller may drop the affected group and keep the rest of the pass */
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GenError::UnsupportedValueKind { .. } | GenError::NoValues { .. }
        )
    }

    pub(crate) fn invariant(type_name: &str, detail: impl Into<String>) -> Self {
        GenError::InternalInvariantViolation {
            type_name: type_name.to_string(),
            detail: detail.into(),
        }
    }
}
