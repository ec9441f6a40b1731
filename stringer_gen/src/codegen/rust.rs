use super::helpers::{join_offsets, rust_quote, screaming_snake};
use super::Backend;
use crate::bitmask::BitOp;
use crate::error::GenResult;
use crate::plan::{EmitPlan, GroupPlan, Segment};

/* Emits a flags trait plus `Display` for a tuple newtype over the declared
 * kind's native integer, i.e. `#[derive(Clone, Copy)] pub struct T(pub u64);`.
 * The output is meant to be `include!`d next to that definition. */
pub struct RustBackend;

impl Backend for RustBackend {
    fn emit_header(&self, package: &str, out: &mut String) {
        out.push_str("// Code generated by \"stringer-gen\"; DO NOT EDIT.\n");
        out.push_str(&format!("// Package: {}\n", package));
    }

    fn emit_group(&self, plan: &GroupPlan, out: &mut String) -> GenResult<()> {
        let type_name = plan.type_name();
        plan.plan.verify(type_name)?;
        let prefix = format!("_{}", screaming_snake(type_name));

        emit_trait(type_name, out);
        emit_tables(&prefix, &plan.plan, out);

        out.push_str(&format!("\nimpl {}Flags for {} {{\n", type_name, type_name));
        for op in BitOp::ALL {
            emit_bit_op(op, out);
            out.push('\n');
        }
        emit_name_fn(plan, &prefix, out);
        out.push_str("}\n");

        emit_display(type_name, out);
        Ok(())
    }
}

fn method(op: BitOp) -> String {
    op.method_name().to_ascii_lowercase()
}

fn emit_trait(type_name: &str, out: &mut String) {
    out.push_str(&format!("\npub trait {}Flags: Copy {{\n", type_name));
    for op in BitOp::ALL {
        let ret = if op.returns_flag() { "bool" } else { "Self" };
        out.push_str(&format!("    fn {}(self, m: Self) -> {};\n", method(op), ret));
    }
    out.push_str("    fn name(self) -> Option<&'static str>;\n");
    out.push_str("}\n");
}

fn emit_bit_op(op: BitOp, out: &mut String) {
    let (ret, body) = match op {
        BitOp::Has => ("bool", "self.0 & m.0 != 0"),
        BitOp::Set => ("Self", "Self(self.0 | m.0)"),
        BitOp::Clear => ("Self", "Self(self.0 & !m.0)"),
        BitOp::Toggle => ("Self", "Self(self.0 ^ m.0)"),
    };
    out.push_str(&format!(
        "    fn {}(self, m: Self) -> {} {{\n        {}\n    }}\n",
        method(op),
        ret,
        body
    ));
}

fn segment_suffix(plan: &EmitPlan, k: usize) -> String {
    match plan {
        EmitPlan::MultiRun { .. } => format!("_{}", k),
        _ => String::new(),
    }
}

fn emit_tables(prefix: &str, plan: &EmitPlan, out: &mut String) {
    out.push('\n');
    match plan {
        EmitPlan::SingleRun { segment } => emit_segment_tables(prefix, "", segment, out),
        EmitPlan::MultiRun { segments } => {
            for (k, segment) in segments.iter().enumerate() {
                emit_segment_tables(prefix, &segment_suffix(plan, k), segment, out);
            }
        }
        EmitPlan::Map { table, .. } => {
            out.push_str(&format!(
                "const {}_NAME: &str = {};\n",
                prefix,
                rust_quote(&table.concatenated)
            ));
        }
    }
}

fn emit_segment_tables(prefix: &str, suffix: &str, segment: &Segment, out: &mut String) {
    out.push_str(&format!(
        "const {}_NAME{}: &str = {};\n",
        prefix,
        suffix,
        rust_quote(&segment.table.concatenated)
    ));
    if !segment.is_single_value() {
        out.push_str(&format!(
            "const {}_INDEX{}: [{}; {}] = [{}];\n",
            prefix,
            suffix,
            segment.table.index_width().rust_name(),
            segment.table.offsets.len(),
            join_offsets(&segment.table.offsets)
        ));
    }
}

fn emit_name_fn(plan: &GroupPlan, prefix: &str, out: &mut String) {
    out.push_str("    fn name(self) -> Option<&'static str> {\n");
    out.push_str("        match self.0 {\n");
    match &plan.plan {
        EmitPlan::SingleRun { segment } => emit_segment_arm(prefix, "", segment, out),
        EmitPlan::MultiRun { segments } => {
            for (k, segment) in segments.iter().enumerate() {
                emit_segment_arm(prefix, &segment_suffix(&plan.plan, k), segment, out);
            }
        }
        EmitPlan::Map { values, table } => {
            for (i, value) in values.iter().enumerate() {
                out.push_str(&format!(
                    "            {} => Some(&{}_NAME[{}..{}]),\n",
                    value,
                    prefix,
                    table.offsets[i],
                    table.offsets[i + 1]
                ));
            }
        }
    }
    out.push_str("            _ => None,\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
}

fn emit_segment_arm(prefix: &str, suffix: &str, segment: &Segment, out: &mut String) {
    if segment.is_single_value() {
        out.push_str(&format!(
            "            {} => Some({}_NAME{}),\n",
            segment.lo, prefix, suffix
        ));
        return;
    }

    out.push_str(&format!("            {}..={} => {{\n", segment.lo, segment.hi));
    let index = if segment.lo == 0 {
        "self.0 as usize".to_string()
    } else {
        format!("self.0.abs_diff({}) as usize", segment.lo)
    };
    out.push_str(&format!("                let i = {};\n", index));
    out.push_str(&format!(
        "                Some(&{p}_NAME{s}[{p}_INDEX{s}[i] as usize..{p}_INDEX{s}[i + 1] as usize])\n",
        p = prefix,
        s = suffix
    ));
    out.push_str("            }\n");
}

fn emit_display(type_name: &str, out: &mut String) {
    out.push_str(&format!("\nimpl std::fmt::Display for {} {{\n", type_name));
    out.push_str("    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {\n");
    out.push_str(&format!(
        "        match {}Flags::name(*self) {{\n",
        type_name
    ));
    out.push_str("            Some(name) => f.write_str(name),\n");
    out.push_str(&format!(
        "            None => write!(f, \"{}({{}})\", self.0),\n",
        type_name
    ));
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");
}
