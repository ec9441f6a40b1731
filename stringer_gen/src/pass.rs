//! A generation pass over every requested group.
//!
//! Groups are planned and emitted independently and in parallel; outcomes are
//! kept in discovery order so the assembled file does not depend on
//! scheduling. Assembly is all-or-nothing: a single fatal group error means
//! no bytes are produced.

use crate::codegen::{emit_group, emit_header, Target};
use crate::error::{GenError, GenResult};
use crate::format::Formatter;
use crate::plan::GroupPlan;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::HashSet;
use stringer_types::{EnumDecl, GenerationOptions};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Generator {
    pub target: Target,
    pub options: GenerationOptions,
}

impl Generator {
    pub fn new(target: Target, options: GenerationOptions) -> Self {
        Self { target, options }
    }

    pub fn plan_group(&self, decl: &EnumDecl) -> GenResult<GroupPlan> {
        GroupPlan::from_decl(decl, &self.options)
    }

    /// Emitted text for a single group, without the file header.
    pub fn generate_group(&self, decl: &EnumDecl) -> GenResult<String> {
        let plan = self.plan_group(decl)?;
        debug!(
            type_name = %decl.name,
            runs = plan.runs.len(),
            plan = plan.plan.kind_name(),
            "planned group"
        );
        emit_group(self.target, &plan)
    }

    /// Plans and emits every group. Fails up front only if two groups share
    /// a name; per-group failures are recorded in the outcome.
    pub fn generate(&self, package: &str, decls: &[EnumDecl]) -> GenResult<PassOutcome> {
        let mut seen = HashSet::new();
        for decl in decls {
            if !seen.insert(decl.name.as_str()) {
                return Err(GenError::DuplicateType {
                    type_name: decl.name.clone(),
                });
            }
        }

        info!(
            package = package,
            groups = decls.len(),
            target = ?self.target,
            "starting generation pass"
        );

        /* par_iter + collect keeps input order */
        let results: Vec<GenResult<String>> = decls
            .par_iter()
            .map(|decl| self.generate_group(decl))
            .collect();

        let groups = decls
            .iter()
            .map(|decl| decl.name.clone())
            .zip(results)
            .collect();

        Ok(PassOutcome {
            target: self.target,
            package: package.to_string(),
            groups,
        })
    }
}

/// Per-group results of a pass, keyed by type name in discovery order.
#[derive(Debug)]
pub struct PassOutcome {
    pub target: Target,
    pub package: String,
    pub groups: IndexMap<String, GenResult<String>>,
}

/// A committed pass: formatted file contents plus what went into them.
#[derive(Debug)]
pub struct Assembled {
    pub source: Vec<u8>,
    pub types: Vec<String>,
    pub skipped: Vec<GenError>,
}

impl PassOutcome {
    pub fn failed(&self) -> impl Iterator<Item = (&str, &GenError)> {
        self.groups.iter().filter_map(|(name, result)| match result {
            Err(err) => Some((name.as_str(), err)),
            Ok(_) => None,
        })
    }

    /* Joins the header and every group text, then runs the formatter over
     * the whole buffer. With `skip_recoverable`, groups that failed with a
     * recoverable error are dropped (and reported) instead of failing the
     * pass; anything else still fails it. */
    pub fn assemble(self, formatter: &dyn Formatter, skip_recoverable: bool) -> GenResult<Assembled> {
        let mut source = emit_header(self.target, &self.package);
        let mut types = Vec::new();
        let mut skipped = Vec::new();

        for (type_name, result) in self.groups {
            match result {
                Ok(text) => {
                    source.push_str(&text);
                    types.push(type_name);
                }
                Err(err) if skip_recoverable && err.is_recoverable() => {
                    warn!(type_name = %type_name, error = %err, "skipping group");
                    skipped.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        if types.is_empty() {
            return Err(match skipped.into_iter().next() {
                Some(err) => err,
                None => GenError::invariant(&self.package, "pass contains no groups"),
            });
        }

        let source = formatter.format(source.as_bytes(), &types)?;
        info!(
            package = %self.package,
            formatter = formatter.name(),
            types = types.len(),
            skipped = skipped.len(),
            bytes = source.len(),
            "generation pass complete"
        );

        Ok(Assembled {
            source,
            types,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Passthrough;
    use stringer_types::{Declaration, IntegerKind};

    fn decl(name: &str, values: &[(&str, i64)]) -> EnumDecl {
        EnumDecl {
            name: name.to_string(),
            underlying: IntegerKind::Int,
            values: values
                .iter()
                .map(|(n, v)| Declaration::new(*n, *v))
                .collect(),
        }
    }

    #[test]
    fn test_outcome_keeps_discovery_order() {
        let generator = Generator::new(Target::Go, GenerationOptions::default());
        let decls = vec![
            decl("Zeta", &[("z", 0)]),
            decl("Alpha", &[("a", 0)]),
            decl("Mid", &[("m", 0)]),
        ];
        let outcome = generator.generate("p", &decls).unwrap();
        let names: Vec<&str> = outcome.groups.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_duplicate_type_names_rejected() {
        let generator = Generator::new(Target::Go, GenerationOptions::default());
        let decls = vec![decl("T", &[("a", 0)]), decl("T", &[("b", 1)])];
        let err = generator.generate("p", &decls).unwrap_err();
        assert!(matches!(err, GenError::DuplicateType { type_name } if type_name == "T"));
    }

    #[test]
    fn test_empty_group_fails_pass_unless_skipped() {
        let generator = Generator::new(Target::Go, GenerationOptions::default());
        let decls = vec![decl("Good", &[("a", 0)]), decl("Empty", &[])];

        let outcome = generator.generate("p", &decls).unwrap();
        assert_eq!(outcome.failed().count(), 1);
        let err = outcome.assemble(&Passthrough, false).unwrap_err();
        assert!(matches!(err, GenError::NoValues { .. }));

        let outcome = generator.generate("p", &decls).unwrap();
        let assembled = outcome.assemble(&Passthrough, true).unwrap();
        assert_eq!(assembled.types, vec!["Good".to_string()]);
        assert_eq!(assembled.skipped.len(), 1);
        let text = String::from_utf8(assembled.source).unwrap();
        assert!(text.contains("func (i Good) String() string"));
        assert!(!text.contains("Empty"));
    }

    #[test]
    fn test_all_groups_skipped_is_an_error() {
        let generator = Generator::new(Target::Go, GenerationOptions::default());
        let outcome = generator.generate("p", &[decl("Empty", &[])]).unwrap();
        let err = outcome.assemble(&Passthrough, true).unwrap_err();
        assert!(matches!(err, GenError::NoValues { type_name } if type_name == "Empty"));
    }
}
