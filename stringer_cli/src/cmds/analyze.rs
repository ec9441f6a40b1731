/* Analyze command - runs, name tables and emit plan per group */

use super::common::{load_declarations, resolve_options};
use anyhow::Context;
use std::path::PathBuf;
use stringer_gen::{EmitPlan, GroupPlan, NameTable};
use stringer_types::parse_int_literal;

/* Execute the analyze command */
pub fn run(
    files: Vec<PathBuf>,
    types: Vec<String>,
    print_plan: bool,
    probes: Vec<String>,
) -> anyhow::Result<()> {
    println!("Stringer Generator - Group Analysis Tool");
    println!("========================================\n");

    let (resolver, decls) = load_declarations(&files, &types, true)?;
    let options = resolve_options(resolver.options(), None, false);

    let probes = probes
        .iter()
        .map(|text| {
            parse_int_literal(text).with_context(|| format!("invalid --probe value '{}'", text))
        })
        .collect::<anyhow::Result<Vec<i128>>>()?;

    let mut failed = Vec::new();
    for decl in &decls {
        let source = resolver
            .source_of(&decl.name)
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        println!("[~] {} ({}) from {}", decl.name, decl.underlying, source);

        let plan = match GroupPlan::from_decl(decl, &options) {
            Ok(plan) => plan,
            Err(err) => {
                println!("  [✗] {}\n", err);
                failed.push(decl.name.clone());
                continue;
            }
        };

        print_group(&plan);

        if print_plan {
            let json = serde_json::to_string_pretty(&plan.plan)
                .context("failed to serialize emit plan")?;
            println!("  Plan JSON:\n{}", json);
        }

        if !probes.is_empty() {
            println!("  Probes:");
            for probe in &probes {
                if plan.group.kind.contains(*probe) {
                    println!("    {} -> {}", probe, plan.stringify(*probe));
                } else {
                    println!("    {} -> (not representable as {})", probe, plan.group.kind);
                }
            }
        }
        println!();
    }

    if !failed.is_empty() {
        anyhow::bail!("analysis failed for: {}", failed.join(", "));
    }

    println!("[✓] Analyzed {} group(s)", decls.len());
    Ok(())
}

fn print_group(plan: &GroupPlan) {
    println!("  Values: {}", plan.group.values.len());
    println!("  Runs: {}", plan.runs.len());
    for run in &plan.runs {
        let names: Vec<&str> = run.entries.iter().map(|v| v.name.as_str()).collect();
        println!("    [{}, {}] {}", run.lo, run.hi, names.join(", "));
    }
    println!("  Plan: {}", plan.plan.kind_name());

    match &plan.plan {
        EmitPlan::SingleRun { segment } => print_table("", &segment.table),
        EmitPlan::MultiRun { segments } => {
            for (k, segment) in segments.iter().enumerate() {
                print_table(&format!("_{}", k), &segment.table);
            }
        }
        EmitPlan::Map { values, table } => {
            print_table("", table);
            let keys: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            println!("    keys: {}", keys.join(", "));
        }
    }
}

fn print_table(suffix: &str, table: &NameTable) {
    println!("    name{}: {:?}", suffix, table.concatenated);
    let offsets: Vec<String> = table.offsets.iter().map(|o| o.to_string()).collect();
    println!(
        "    index{}: [{}] ({})",
        suffix,
        offsets.join(", "),
        table.index_width().rust_name()
    );
}
