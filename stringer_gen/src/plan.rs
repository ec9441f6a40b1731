//! Emit plans: the code shape chosen for a group's stringification.
//!
//! The choice depends only on the run list, so unchanged input always gives
//! the same plan. The plan is also directly evaluable: [`EmitPlan::lookup`]
//! answers exactly what the emitted code answers.

use crate::analyze::{split_into_runs, Run};
use crate::error::{GenError, GenResult};
use crate::model::EnumGroup;
use crate::table::NameTable;
use serde_derive::Serialize;
use stringer_types::{EnumDecl, GenerationOptions};

/// Above this many runs the ordered range tests give way to a map.
pub const MAX_RANGE_RUNS: usize = 10;

/// One range-guarded slice of a name table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub lo: i128,
    pub hi: i128,
    pub table: NameTable,
}

impl Segment {
    pub fn is_single_value(&self) -> bool {
        self.lo == self.hi
    }

    pub fn lookup(&self, value: i128) -> Option<&str> {
        if value < self.lo || value > self.hi {
            return None;
        }
        self.table.slice((value - self.lo) as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EmitPlan {
    /// One run: subtract `lo`, bounds-check, slice.
    SingleRun { segment: Segment },
    /// Several runs tested in ascending `lo` order, first match wins.
    MultiRun { segments: Vec<Segment> },
    /// Sparse groups: `values[i]` maps to `table.slice(i)`, ascending.
    Map { values: Vec<i128>, table: NameTable },
}

impl EmitPlan {
    pub fn choose(type_name: &str, runs: &[Run]) -> GenResult<Self> {
        let segment = |run: &Run| -> GenResult<Segment> {
            Ok(Segment {
                lo: run.lo,
                hi: run.hi,
                table: NameTable::build(type_name, run)?,
            })
        };

        match runs.len() {
            0 => Err(GenError::invariant(type_name, "no runs to plan")),
            1 => Ok(EmitPlan::SingleRun {
                segment: segment(&runs[0])?,
            }),
            n if n <= MAX_RANGE_RUNS => {
                let segments = runs.iter().map(segment).collect::<GenResult<Vec<_>>>()?;
                for pair in segments.windows(2) {
                    if pair[0].hi + 1 >= pair[1].lo {
                        return Err(GenError::invariant(
                            type_name,
                            format!(
                                "runs [{}, {}] and [{}, {}] are not disjoint and ordered",
                                pair[0].lo, pair[0].hi, pair[1].lo, pair[1].hi
                            ),
                        ));
                    }
                }
                Ok(EmitPlan::MultiRun { segments })
            }
            _ => {
                let canonical: Vec<_> = runs.iter().flat_map(|run| run.canonical()).collect();
                let table = NameTable::from_names(canonical.iter().map(|v| v.name.as_str()));
                table.verify(type_name, canonical.len())?;
                Ok(EmitPlan::Map {
                    values: canonical.iter().map(|v| v.value).collect(),
                    table,
                })
            }
        }
    }

    /* Every table must hold exactly one name per value it covers, so the
     * emitters can index offsets without bounds checks. */
    pub fn verify(&self, type_name: &str) -> GenResult<()> {
        let check_segment = |segment: &Segment| -> GenResult<()> {
            if segment.lo > segment.hi {
                return Err(GenError::invariant(
                    type_name,
                    format!("segment [{}, {}] is empty", segment.lo, segment.hi),
                ));
            }
            let width = usize::try_from(segment.lo.abs_diff(segment.hi) + 1).map_err(|_| {
                GenError::invariant(
                    type_name,
                    format!("segment [{}, {}] is too wide", segment.lo, segment.hi),
                )
            })?;
            segment.table.verify(type_name, width)
        };

        match self {
            EmitPlan::SingleRun { segment } => check_segment(segment),
            EmitPlan::MultiRun { segments } => segments.iter().try_for_each(check_segment),
            EmitPlan::Map { values, table } => {
                if values.len() + 1 != table.offsets.len() {
                    return Err(GenError::invariant(
                        type_name,
                        format!(
                            "map plan has {} values for {} offsets",
                            values.len(),
                            table.offsets.len()
                        ),
                    ));
                }
                table.verify(type_name, values.len())
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            EmitPlan::SingleRun { .. } => "single-run",
            EmitPlan::MultiRun { .. } => "multi-run",
            EmitPlan::Map { .. } => "map",
        }
    }

    pub fn lookup(&self, value: i128) -> Option<&str> {
        match self {
            EmitPlan::SingleRun { segment } => segment.lookup(value),
            EmitPlan::MultiRun { segments } => segments
                .iter()
                .find(|segment| segment.lo <= value && value <= segment.hi)
                .and_then(|segment| segment.lookup(value)),
            EmitPlan::Map { values, table } => values
                .binary_search(&value)
                .ok()
                .and_then(|index| table.slice(index)),
        }
    }
}

/// Everything the emitters need for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPlan {
    pub group: EnumGroup,
    pub runs: Vec<Run>,
    pub plan: EmitPlan,
}

impl GroupPlan {
    pub fn build(group: EnumGroup) -> GenResult<Self> {
        let runs = split_into_runs(&group);
        let plan = EmitPlan::choose(&group.type_name, &runs)?;
        Ok(Self { group, runs, plan })
    }

    pub fn from_decl(decl: &EnumDecl, options: &GenerationOptions) -> GenResult<Self> {
        Self::build(EnumGroup::from_decl(decl, options)?)
    }

    pub fn type_name(&self) -> &str {
        &self.group.type_name
    }

    /// Total stringification: the declared name or `Type(value)`.
    pub fn stringify(&self, value: i128) -> String {
        match self.plan.lookup(value) {
            Some(name) => name.to_string(),
            None => format!("{}({})", self.group.type_name, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringer_types::{Declaration, IntegerKind};

    fn plan(kind: IntegerKind, values: &[(&str, i64)]) -> GroupPlan {
        let decl = EnumDecl {
            name: "Unum".to_string(),
            underlying: kind,
            values: values
                .iter()
                .map(|(name, value)| Declaration::new(*name, *value))
                .collect(),
        };
        GroupPlan::from_decl(&decl, &GenerationOptions::default()).unwrap()
    }

    #[test]
    fn test_unum_scenario() {
        let p = plan(
            IntegerKind::Uint8,
            &[("m_2", 253), ("m_1", 254), ("m0", 0), ("m1", 1), ("m2", 2)],
        );
        assert_eq!(p.plan.kind_name(), "multi-run");
        assert_eq!(p.stringify(1), "m1");
        assert_eq!(p.stringify(254), "m_1");
        assert_eq!(p.stringify(253), "m_2");
        assert_eq!(p.stringify(100), "Unum(100)");
        assert_eq!(p.stringify(255), "Unum(255)");
    }

    #[test]
    fn test_duplicate_scenario() {
        let p = plan(IntegerKind::Int, &[("a", 1), ("b", 1)]);
        assert_eq!(p.runs.len(), 1);
        assert_eq!(p.runs[0].entries.len(), 2);
        assert_eq!(p.plan.kind_name(), "single-run");
        assert_eq!(p.stringify(1), "a");
        assert_eq!(p.stringify(0), "Unum(0)");
        assert_eq!(p.stringify(-5), "Unum(-5)");
    }

    #[test]
    fn test_sparse_group_uses_map() {
        let values: Vec<(String, i64)> = (0..12).map(|i| (format!("v{i}"), i * 10 - 50)).collect();
        let refs: Vec<(&str, i64)> = values.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        let p = plan(IntegerKind::Int16, &refs);
        assert_eq!(p.runs.len(), 12);
        assert_eq!(p.plan.kind_name(), "map");
        assert_eq!(p.stringify(-50), "v0");
        assert_eq!(p.stringify(60), "v11");
        assert_eq!(p.stringify(61), "Unum(61)");
    }

    #[test]
    fn test_ten_runs_still_range_tested() {
        let values: Vec<(String, i64)> = (0..10).map(|i| (format!("v{i}"), i * 3)).collect();
        let refs: Vec<(&str, i64)> = values.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        let p = plan(IntegerKind::Int, &refs);
        assert_eq!(p.plan.kind_name(), "multi-run");
        assert_eq!(p.stringify(27), "v9");
        assert_eq!(p.stringify(28), "Unum(28)");
    }

    #[test]
    fn test_plan_is_deterministic() {
        let input = [("x", 7), ("y", 3), ("z", 4), ("w", 7)];
        let first = plan(IntegerKind::Int32, &input);
        let second = plan(IntegerKind::Int32, &input);
        assert_eq!(first, second);
        assert_eq!(first.stringify(7), "x");
    }

    #[test]
    fn test_verify_rejects_mismatched_tables() {
        let mut p = plan(IntegerKind::Int8, &[("a", 0), ("b", 1), ("c", 2)]);
        assert!(p.plan.verify("Unum").is_ok());

        if let EmitPlan::SingleRun { segment } = &mut p.plan {
            segment.hi = 5;
        }
        let err = p.plan.verify("Unum").unwrap_err();
        assert!(matches!(err, GenError::InternalInvariantViolation { .. }), "{err:?}");

        let p = EmitPlan::Map {
            values: vec![1, 5, 9],
            table: NameTable::from_names(["a"]),
        };
        let err = p.verify("Unum").unwrap_err();
        assert!(err.to_string().contains("3 values for 2 offsets"), "{err}");
    }

    #[test]
    fn test_plan_serializes_with_kind_tag() {
        let p = plan(IntegerKind::Uint8, &[("a", 0), ("b", 1)]);
        let json = serde_json::to_value(&p.plan).unwrap();
        assert_eq!(json["kind"], "single-run");
        assert_eq!(json["segment"]["table"]["concatenated"], "ab");
    }
}
