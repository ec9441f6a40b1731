pub mod go;
pub mod helpers;
pub mod rust;

use crate::error::GenResult;
use crate::plan::GroupPlan;
use serde_derive::{Deserialize, Serialize};

/// Language of the emitted accessor code.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Go,
    Rust,
}

impl Target {
    pub fn file_extension(self) -> &'static str {
        match self {
            Target::Go => "go",
            Target::Rust => "rs",
        }
    }

    pub fn backend(self) -> &'static dyn Backend {
        match self {
            Target::Go => &go::GoBackend,
            Target::Rust => &rust::RustBackend,
        }
    }
}

/* A code generation backend. Emission is pure: it only appends text. */
pub trait Backend: Sync {
    /* File prologue written once per output file */
    fn emit_header(&self, package: &str, out: &mut String);

    /* Declarations and accessors for one group */
    fn emit_group(&self, plan: &GroupPlan, out: &mut String) -> GenResult<()>;
}

/* Render one group into a fresh buffer; on error nothing is returned, so a
 * partially written group can never escape. */
pub fn emit_group(target: Target, plan: &GroupPlan) -> GenResult<String> {
    let mut out = String::new();
    target.backend().emit_group(plan, &mut out)?;
    Ok(out)
}

pub fn emit_header(target: Target, package: &str) -> String {
    let mut out = String::new();
    target.backend().emit_header(package, &mut out);
    out
}
