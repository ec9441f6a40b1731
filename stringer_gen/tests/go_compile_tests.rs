/* Go Compile Tests
 *
 * Builds a small Go program around each generated group, vets and runs it,
 * and compares every printed answer with the plan interpreter and the
 * bitmask reference semantics. Skipped when `go` is not on PATH.
 */

use std::fs;
use std::process::Command;
use stringer_gen::bitmask;
use stringer_gen::codegen::{emit_group, emit_header, Target};
use stringer_gen::plan::GroupPlan;
use stringer_types::{Declaration, DeclaredValue, EnumDecl, GenerationOptions, IntegerKind};

fn decl(name: &str, kind: IntegerKind, values: &[(&str, i64)]) -> EnumDecl {
    EnumDecl {
        name: name.to_string(),
        underlying: kind,
        values: values
            .iter()
            .map(|(name, value)| Declaration::new(*name, *value))
            .collect(),
    }
}

fn numbered(name: &str, kind: IntegerKind, values: impl Iterator<Item = i64>) -> EnumDecl {
    EnumDecl {
        name: name.to_string(),
        underlying: kind,
        values: values
            .enumerate()
            .map(|(i, value)| Declaration::new(format!("v{}", i), value))
            .collect(),
    }
}

fn go_available() -> bool {
    Command::new("go")
        .arg("version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/* Every declared value and its neighbours, within the kind */
fn sample_values(plan: &GroupPlan) -> Vec<i128> {
    let kind = plan.group.kind;
    let mut samples: Vec<i128> = plan
        .group
        .values
        .iter()
        .flat_map(|v| [v.value - 1, v.value, v.value + 1])
        .filter(|v| kind.contains(*v))
        .collect();
    samples.sort_unstable();
    samples.dedup();
    samples
}

fn mask_operands(plan: &GroupPlan) -> Vec<i128> {
    plan.group.values.iter().take(8).map(|v| v.value).collect()
}

fn go_command(dir: &std::path::Path, args: &[&str]) -> Result<String, String> {
    let output = Command::new("go")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| format!("Failed to run go {}: {}", args.join(" "), e))?;
    if !output.status.success() {
        return Err(format!(
            "go {} failed:\n{}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/* Write a module with the generated file plus a main, vet it, run it */
fn vet_and_run(plan: &GroupPlan, test_name: &str) -> Result<String, String> {
    let type_name = plan.type_name();
    let native = plan.group.kind.go_name();
    let temp_dir = std::env::temp_dir().join("stringer_go_tests").join(test_name);
    fs::create_dir_all(&temp_dir).map_err(|e| format!("Failed to create temp dir: {}", e))?;

    let mut generated = emit_header(Target::Go, "main");
    generated.push_str(&emit_group(Target::Go, plan).map_err(|e| e.to_string())?);
    fs::write(temp_dir.join("generated.go"), &generated)
        .map_err(|e| format!("Failed to write generated file: {}", e))?;
    fs::write(temp_dir.join("go.mod"), "module stringertest\n\ngo 1.18\n")
        .map_err(|e| format!("Failed to write go.mod: {}", e))?;

    let mut main = format!(
        "package main\n\nimport \"fmt\"\n\ntype {t} {n}\n\nfunc main() {{\n",
        t = type_name,
        n = native
    );
    for sample in sample_values(plan) {
        main.push_str(&format!("\tfmt.Println({}({}).String())\n", type_name, sample));
    }
    let values = mask_operands(plan);
    for v in &values {
        for m in &values {
            /* Convert back to the underlying type so Println prints the number */
            main.push_str(&format!(
                "\t{{\n\t\tv, m := {t}({v}), {t}({m})\n\t\tfmt.Println(v.Has(m), {n}(v.Set(m)), {n}(v.Clear(m)), {n}(v.Toggle(m)))\n\t}}\n",
                t = type_name,
                n = native,
                v = v,
                m = m
            ));
        }
    }
    main.push_str("}\n");
    fs::write(temp_dir.join("main.go"), main)
        .map_err(|e| format!("Failed to write main file: {}", e))?;

    go_command(&temp_dir, &["vet", "."])
        .map_err(|e| format!("{}\n--- generated ---\n{}", e, generated))?;
    let stdout = go_command(&temp_dir, &["run", "."])
        .map_err(|e| format!("{}\n--- generated ---\n{}", e, generated))?;

    let _ = fs::remove_dir_all(&temp_dir);
    Ok(stdout)
}

/* Go formats undeclared values through int64, so unsigned values above
 * MaxInt64 print as their two's-complement negative. */
fn go_stringify(plan: &GroupPlan, value: i128) -> String {
    match plan.plan.lookup(value) {
        Some(name) => name.to_string(),
        None => format!("{}({})", plan.type_name(), value as i64),
    }
}

fn expected_output(plan: &GroupPlan) -> String {
    let kind = plan.group.kind;
    let mut out = String::new();
    for sample in sample_values(plan) {
        out.push_str(&go_stringify(plan, sample));
        out.push('\n');
    }
    let values = mask_operands(plan);
    for v in &values {
        for m in &values {
            out.push_str(&format!(
                "{} {} {} {}\n",
                bitmask::has(kind, *v, *m),
                bitmask::set(kind, *v, *m),
                bitmask::clear(kind, *v, *m),
                bitmask::toggle(kind, *v, *m)
            ));
        }
    }
    out
}

fn check_go(decl: EnumDecl, test_name: &str) {
    if !go_available() {
        eprintln!("go not found, skipping {}", test_name);
        return;
    }
    let plan = GroupPlan::from_decl(&decl, &GenerationOptions::default()).unwrap();
    match vet_and_run(&plan, test_name) {
        Ok(stdout) => assert_eq!(stdout, expected_output(&plan), "{}", test_name),
        Err(e) => panic!("{}: {}", test_name, e),
    }
}

#[test]
fn test_go_single_run() {
    check_go(
        decl("Letter", IntegerKind::Uint8, &[("a", 5), ("b", 6), ("c", 7)]),
        "single_run",
    );
    check_go(decl("Neg", IntegerKind::Int8, &[("neg2", -2), ("neg1", -1)]), "negative_start");
}

#[test]
fn test_go_multi_run() {
    check_go(
        decl(
            "Unum",
            IntegerKind::Uint,
            &[("m_2", 253), ("m_1", 254), ("m0", 0), ("m1", 1), ("m2", 2)],
        ),
        "unum",
    );
    check_go(
        decl("Dup", IntegerKind::Int, &[("a", 0), ("b", 1), ("b2", 1), ("c", 5)]),
        "duplicates",
    );
}

#[test]
fn test_go_widened_index() {
    check_go(numbered("Wide", IntegerKind::Int8, -65..=64), "wide_int8");
    check_go(numbered("Full", IntegerKind::Uint8, 0..=255), "full_uint8");
}

#[test]
fn test_go_map() {
    check_go(
        numbered("Sparse", IntegerKind::Int16, (0..14).map(|i| i * 7 - 40)),
        "sparse",
    );
}

#[test]
fn test_go_kind_minimum() {
    check_go(decl("Low", IntegerKind::Int8, &[("lo", -128), ("lo1", -127)]), "int8_min");
    check_go(
        decl("LowMulti", IntegerKind::Int8, &[("lo", -128), ("lo1", -127), ("z", 5)]),
        "int8_min_multi",
    );
    check_go(
        decl("Low16", IntegerKind::Int16, &[("lo", -32768), ("lo1", -32767), ("z", 0)]),
        "int16_min_multi",
    );
    check_go(
        decl("Low64", IntegerKind::Int64, &[("lo", i64::MIN), ("lo1", i64::MIN + 1)]),
        "int64_min",
    );
}

#[test]
fn test_go_kind_maximum() {
    check_go(decl("High", IntegerKind::Int8, &[("hi1", 126), ("hi", 127)]), "int8_max");
    check_go(decl("Byte", IntegerKind::Uint8, &[("b1", 254), ("b", 255)]), "uint8_max");

    let decl = EnumDecl {
        name: "Top".to_string(),
        underlying: IntegerKind::Uint64,
        values: vec![
            Declaration {
                name: "zero".to_string(),
                value: DeclaredValue::Unsigned(0),
                comment: None,
            },
            Declaration {
                name: "penultimate".to_string(),
                value: DeclaredValue::Unsigned(u64::MAX - 1),
                comment: None,
            },
            Declaration {
                name: "last".to_string(),
                value: DeclaredValue::Unsigned(u64::MAX),
                comment: None,
            },
        ],
    };
    check_go(decl, "top_uint64");
}
