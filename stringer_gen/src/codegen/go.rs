use super::helpers::{add_compact, go_quote, join_offsets, minus, sub_assign};
use super::Backend;
use crate::bitmask::BitOp;
use crate::error::GenResult;
use crate::plan::{EmitPlan, GroupPlan, Segment};
use crate::table::NameTable;
use stringer_types::IntegerKind;

/* Emits Go methods on a named integer type. The text is already laid out the
 * way gofmt would print it, except map literals, whose values gofmt aligns. */
pub struct GoBackend;

impl Backend for GoBackend {
    fn emit_header(&self, package: &str, out: &mut String) {
        out.push_str("// Code generated by \"stringer-gen\"; DO NOT EDIT.\n\n");
        out.push_str(&format!("package {}\n\n", package));
        out.push_str("import \"strconv\"\n");
    }

    fn emit_group(&self, plan: &GroupPlan, out: &mut String) -> GenResult<()> {
        let type_name = plan.type_name();
        plan.plan.verify(type_name)?;
        emit_interface(type_name, out);
        for op in BitOp::ALL {
            emit_bit_op(type_name, op, out);
        }
        match &plan.plan {
            EmitPlan::SingleRun { segment } => {
                emit_one_run(type_name, plan.group.kind, segment, out)
            }
            EmitPlan::MultiRun { segments } => {
                emit_multiple_runs(type_name, plan.group.kind, segments, out)
            }
            EmitPlan::Map { values, table } => emit_map(type_name, values, table, out),
        }
        Ok(())
    }
}

fn emit_interface(type_name: &str, out: &mut String) {
    out.push_str(&format!("\ntype I{} interface {{\n", type_name));
    for op in BitOp::ALL {
        let ret = if op.returns_flag() { "bool" } else { type_name };
        out.push_str(&format!("\t{}(m {}) {}\n", op.method_name(), type_name, ret));
    }
    out.push_str("\tString() string\n");
    out.push_str("}\n");
}

fn emit_bit_op(type_name: &str, op: BitOp, out: &mut String) {
    let (ret, body) = match op {
        BitOp::Has => ("bool", "i&m != 0"),
        BitOp::Set => (type_name, "i | m"),
        BitOp::Clear => (type_name, "i &^ m"),
        BitOp::Toggle => (type_name, "i ^ m"),
    };
    out.push_str(&format!(
        "\nfunc (i {}) {}(m {}) {} {{\n\treturn {}\n}}\n",
        type_name,
        op.method_name(),
        type_name,
        ret,
        body
    ));
}

fn fallback(type_name: &str, value_expr: &str) -> String {
    format!(
        "\"{}(\" + strconv.FormatInt(int64({}), 10) + \")\"",
        type_name, value_expr
    )
}

/* `i -= lo` inside type T is safe while every index `0..width` fits in T */
fn offset_fits(kind: IntegerKind, segment: &Segment) -> bool {
    segment.lo.abs_diff(segment.hi) + 1 <= kind.max_value() as u128
}

fn emit_one_run(type_name: &str, kind: IntegerKind, segment: &Segment, out: &mut String) {
    out.push_str(&format!(
        "\nconst _{}_name = {}\n",
        type_name,
        go_quote(&segment.table.concatenated)
    ));
    out.push_str(&format!(
        "\nvar _{}_index = [...]{}{{{}}}\n",
        type_name,
        segment.table.index_width().go_name(),
        join_offsets(&segment.table.offsets)
    ));

    out.push_str(&format!("\nfunc (i {}) String() string {{\n", type_name));
    let slice = format!(
        "_{t}_name[_{t}_index[{{i}}]:_{t}_index[{{i}}+1]]",
        t = type_name
    );
    if offset_fits(kind, segment) {
        let less_than_zero = if kind.is_signed() { "i < 0 || " } else { "" };
        let value_expr = if segment.lo == 0 {
            "i".to_string()
        } else {
            out.push_str(&format!("\t{}\n", sub_assign("i", segment.lo)));
            add_compact("i", segment.lo)
        };
        out.push_str(&format!(
            "\tif {}i >= {}(len(_{}_index)-1) {{\n",
            less_than_zero, type_name, type_name
        ));
        out.push_str(&format!("\t\treturn {}\n", fallback(type_name, &value_expr)));
        out.push_str("\t}\n");
        out.push_str(&format!("\treturn {}\n", slice.replace("{i}", "i")));
    } else {
        out.push_str(&format!("\tidx := {}\n", minus("int64(i)", segment.lo)));
        out.push_str(&format!(
            "\tif idx < 0 || idx >= int64(len(_{}_index)-1) {{\n",
            type_name
        ));
        out.push_str(&format!("\t\treturn {}\n", fallback(type_name, "i")));
        out.push_str("\t}\n");
        out.push_str(&format!("\treturn {}\n", slice.replace("{i}", "idx")));
    }
    out.push_str("}\n");
}

fn emit_multiple_runs(type_name: &str, kind: IntegerKind, segments: &[Segment], out: &mut String) {
    out.push_str("\nconst (\n");
    for (k, segment) in segments.iter().enumerate() {
        out.push_str(&format!(
            "\t_{}_name_{} = {}\n",
            type_name,
            k,
            go_quote(&segment.table.concatenated)
        ));
    }
    out.push_str(")\n");

    let indexed: Vec<(usize, &Segment)> = segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| !segment.is_single_value())
        .collect();
    if !indexed.is_empty() {
        out.push_str("\nvar (\n");
        for (k, segment) in &indexed {
            out.push_str(&format!(
                "\t_{}_index_{} = [...]{}{{{}}}\n",
                type_name,
                k,
                segment.table.index_width().go_name(),
                join_offsets(&segment.table.offsets)
            ));
        }
        out.push_str(")\n");
    }

    out.push_str(&format!("\nfunc (i {}) String() string {{\n", type_name));
    out.push_str("\tswitch {\n");
    for (k, segment) in segments.iter().enumerate() {
        if segment.is_single_value() {
            out.push_str(&format!("\tcase i == {}:\n", segment.lo));
            out.push_str(&format!("\t\treturn _{}_name_{}\n", type_name, k));
            continue;
        }

        out.push_str(&format!(
            "\tcase {} <= i && i <= {}:\n",
            segment.lo, segment.hi
        ));
        let index = if offset_fits(kind, segment) {
            if segment.lo != 0 {
                out.push_str(&format!("\t\t{}\n", sub_assign("i", segment.lo)));
            }
            "i"
        } else {
            out.push_str(&format!("\t\tidx := {}\n", minus("int64(i)", segment.lo)));
            "idx"
        };
        out.push_str(&format!(
            "\t\treturn _{t}_name_{k}[_{t}_index_{k}[{i}]:_{t}_index_{k}[{i}+1]]\n",
            t = type_name,
            k = k,
            i = index
        ));
    }
    out.push_str("\tdefault:\n");
    out.push_str(&format!("\t\treturn {}\n", fallback(type_name, "i")));
    out.push_str("\t}\n");
    out.push_str("}\n");
}

fn emit_map(type_name: &str, values: &[i128], table: &NameTable, out: &mut String) {
    out.push_str(&format!(
        "\nconst _{}_name = {}\n",
        type_name,
        go_quote(&table.concatenated)
    ));

    out.push_str(&format!(
        "\nvar _{}_map = map[{}]string{{\n",
        type_name, type_name
    ));
    for (i, value) in values.iter().enumerate() {
        out.push_str(&format!(
            "\t{}: _{}_name[{}:{}],\n",
            value,
            type_name,
            table.offsets[i],
            table.offsets[i + 1]
        ));
    }
    out.push_str("}\n");

    out.push_str(&format!("\nfunc (i {}) String() string {{\n", type_name));
    out.push_str(&format!(
        "\tif str, ok := _{}_map[i]; ok {{\n\t\treturn str\n\t}}\n",
        type_name
    ));
    out.push_str(&format!("\treturn {}\n", fallback(type_name, "i")));
    out.push_str("}\n");
}
