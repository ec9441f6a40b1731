//! Name tables: every canonical name of a run joined into one string, plus
//! the byte offsets delimiting each name.
//!
//! Stringification then needs one range check and one slice instead of a
//! branch per value.

use crate::analyze::Run;
use crate::error::{GenError, GenResult};
use serde_derive::Serialize;

/// Unsigned element type of an emitted offset array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexWidth {
    U8,
    U16,
    U32,
    U64,
}

impl IndexWidth {
    /* Smallest width able to hold `max_offset` */
    pub fn for_max(max_offset: usize) -> Self {
        match max_offset as u64 {
            n if n < 1 << 8 => IndexWidth::U8,
            n if n < 1 << 16 => IndexWidth::U16,
            n if n < 1 << 32 => IndexWidth::U32,
            _ => IndexWidth::U64,
        }
    }

    pub fn go_name(self) -> &'static str {
        match self {
            IndexWidth::U8 => "uint8",
            IndexWidth::U16 => "uint16",
            IndexWidth::U32 => "uint32",
            IndexWidth::U64 => "uint64",
        }
    }

    pub fn rust_name(self) -> &'static str {
        match self {
            IndexWidth::U8 => "u8",
            IndexWidth::U16 => "u16",
            IndexWidth::U32 => "u32",
            IndexWidth::U64 => "u64",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameTable {
    pub concatenated: String,
    /// `offsets[i]..offsets[i + 1]` delimits name `i`; the last offset is the
    /// string length.
    pub offsets: Vec<usize>,
}

impl NameTable {
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut concatenated = String::new();
        let mut offsets = vec![0];
        for name in names {
            concatenated.push_str(name);
            offsets.push(concatenated.len());
        }
        Self {
            concatenated,
            offsets,
        }
    }

    /* Table over the canonical names of a run, verified against it */
    pub fn build(type_name: &str, run: &Run) -> GenResult<Self> {
        let canonical = run.canonical();
        let table = Self::from_names(canonical.iter().map(|v| v.name.as_str()));

        if canonical.len() as u128 != run.width() {
            return Err(GenError::invariant(
                type_name,
                format!(
                    "run [{}, {}] has {} distinct values but spans {}",
                    run.lo,
                    run.hi,
                    canonical.len(),
                    run.width()
                ),
            ));
        }
        for (i, entry) in canonical.iter().enumerate() {
            if entry.value != run.lo + i as i128 {
                return Err(GenError::invariant(
                    type_name,
                    format!(
                        "run [{}, {}] is not contiguous at entry '{}' = {}",
                        run.lo, run.hi, entry.name, entry.value
                    ),
                ));
            }
        }
        table.verify(type_name, canonical.len())?;
        Ok(table)
    }

    /// Number of names in the table.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice(&self, index: usize) -> Option<&str> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        self.concatenated.get(start..end)
    }

    pub fn index_width(&self) -> IndexWidth {
        IndexWidth::for_max(self.concatenated.len())
    }

    /* Structural checks: one offset per name plus the end, starting at zero,
     * strictly increasing, ending at the string length, on char boundaries. */
    pub fn verify(&self, type_name: &str, expected_names: usize) -> GenResult<()> {
        if self.offsets.len() != expected_names + 1 {
            return Err(GenError::invariant(
                type_name,
                format!(
                    "name table has {} offsets for {} names",
                    self.offsets.len(),
                    expected_names
                ),
            ));
        }
        if self.offsets.first() != Some(&0) {
            return Err(GenError::invariant(type_name, "name table does not start at 0"));
        }
        if self.offsets.last() != Some(&self.concatenated.len()) {
            return Err(GenError::invariant(
                type_name,
                "name table does not end at the string length",
            ));
        }
        for pair in self.offsets.windows(2) {
            if pair[0] >= pair[1] {
                return Err(GenError::invariant(
                    type_name,
                    format!("name table offsets not increasing at {}", pair[1]),
                ));
            }
        }
        if let Some(bad) = self
            .offsets
            .iter()
            .find(|offset| !self.concatenated.is_char_boundary(**offset))
        {
            return Err(GenError::invariant(
                type_name,
                format!("name table offset {} splits a character", bad),
            ));
        }
        Ok(())
    }
}
