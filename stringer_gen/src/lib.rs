//! Stringer Code Generation
//!
//! Turns declared integer constant groups into bitmask accessors and a
//! stringification method. A group is resolved ([`model`]), split into runs
//! of consecutive values ([`analyze`]), given name tables ([`table`]) and an
//! emit plan ([`plan`]), then rendered by a backend ([`codegen`]). [`pass`]
//! runs this for many groups and sends the assembled file through a
//! [`format`] stage.

pub mod analyze;
pub mod bitmask;
pub mod codegen;
pub mod error;
pub mod format;
pub mod model;
pub mod pass;
pub mod plan;
pub mod table;

pub use analyze::{split_into_runs, Run};
pub use bitmask::{BitOp, BitOutcome};
pub use codegen::Target;
pub use error::{GenError, GenResult};
pub use format::{formatter_for, Canonical, External, Formatter, FormatterKind, Passthrough};
pub use model::{EnumGroup, Value};
pub use pass::{Assembled, Generator, PassOutcome};
pub use plan::{EmitPlan, GroupPlan, Segment, MAX_RANGE_RUNS};
pub use table::{IndexWidth, NameTable};

pub use stringer_types;
