//! Range analysis: partition a group's values into maximal contiguous runs.
//!
//! Values are stably sorted, so constants sharing a value keep their
//! declaration order and the first-declared one stays canonical.

use crate::model::{EnumGroup, Value};
use serde_derive::Serialize;

/// A maximal contiguous interval `[lo, hi]` of declared values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub lo: i128,
    pub hi: i128,
    /// Every constant whose value lies in `[lo, hi]`, sorted by value,
    /// aliases included.
    pub entries: Vec<Value>,
}

impl Run {
    /// Number of distinct values covered.
    pub fn width(&self) -> u128 {
        self.lo.abs_diff(self.hi) + 1
    }

    pub fn contains(&self, value: i128) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// One entry per covered value: the first-declared name for it.
    pub fn canonical(&self) -> Vec<&Value> {
        let mut out: Vec<&Value> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if out.last().map_or(true, |last| last.value != entry.value) {
                out.push(entry);
            }
        }
        out
    }
}

/// Split a group into runs ordered by `lo`. A new run starts whenever the
/// next distinct value is not `previous + 1`.
pub fn split_into_runs(group: &EnumGroup) -> Vec<Run> {
    let mut sorted: Vec<&Value> = group.values.iter().collect();
    sorted.sort_by_key(|v| v.value);

    let mut runs: Vec<Run> = Vec::new();
    for value in sorted {
        match runs.last_mut() {
            Some(run) if value.value == run.hi => run.entries.push(value.clone()),
            Some(run) if value.value == run.hi + 1 => {
                run.hi = value.value;
                run.entries.push(value.clone());
            }
            _ => runs.push(Run {
                lo: value.value,
                hi: value.value,
                entries: vec![value.clone()],
            }),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringer_types::IntegerKind;

    fn group(kind: IntegerKind, values: &[(&str, i128)]) -> EnumGroup {
        EnumGroup {
            type_name: "T".to_string(),
            kind,
            values: values
                .iter()
                .map(|(name, value)| Value {
                    ident: name.to_string(),
                    name: name.to_string(),
                    value: *value,
                })
                .collect(),
        }
    }

    fn names(run: &Run) -> Vec<&str> {
        run.entries.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_unum_splits_into_two_runs() {
        let g = group(
            IntegerKind::Uint,
            &[("m_2", 253), ("m_1", 254), ("m0", 0), ("m1", 1), ("m2", 2)],
        );
        let runs = split_into_runs(&g);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].lo, runs[0].hi), (0, 2));
        assert_eq!(names(&runs[0]), vec!["m0", "m1", "m2"]);
        assert_eq!((runs[1].lo, runs[1].hi), (253, 254));
        assert_eq!(names(&runs[1]), vec!["m_2", "m_1"]);
    }

    #[test]
    fn test_duplicates_stay_in_one_run() {
        let g = group(IntegerKind::Int, &[("a", 1), ("b", 1)]);
        let runs = split_into_runs(&g);
        assert_eq!(runs.len(), 1);
        assert_eq!((runs[0].lo, runs[0].hi), (1, 1));
        assert_eq!(names(&runs[0]), vec!["a", "b"]);
        let canonical: Vec<&str> = runs[0].canonical().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(canonical, vec!["a"]);
    }

    #[test]
    fn test_duplicate_keeps_declaration_order_inside_run() {
        let g = group(IntegerKind::Int, &[("two", 2), ("one", 1), ("uno", 1), ("three", 3)]);
        let runs = split_into_runs(&g);
        assert_eq!(runs.len(), 1);
        assert_eq!(names(&runs[0]), vec!["one", "uno", "two", "three"]);
        assert_eq!(runs[0].canonical().len(), 3);
        assert_eq!(runs[0].width(), 3);
    }

    #[test]
    fn test_negative_values_and_isolated_points() {
        let g = group(
            IntegerKind::Int8,
            &[("a", -128), ("b", -3), ("c", -2), ("d", -1), ("e", 0), ("f", 5), ("g", 127)],
        );
        let runs = split_into_runs(&g);
        let bounds: Vec<(i128, i128)> = runs.iter().map(|r| (r.lo, r.hi)).collect();
        assert_eq!(bounds, vec![(-128, -128), (-3, 0), (5, 5), (127, 127)]);
        assert!(runs[1].contains(-2));
        assert!(!runs[1].contains(1));
    }

    #[test]
    fn test_full_width_bounds() {
        let g = group(
            IntegerKind::Uint64,
            &[("max", u64::MAX as i128), ("zero", 0), ("below", u64::MAX as i128 - 1)],
        );
        let runs = split_into_runs(&g);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].lo, u64::MAX as i128 - 1);
        assert_eq!(runs[1].width(), 2);
    }
}
