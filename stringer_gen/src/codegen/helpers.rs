/* Helper utilities shared by the code generation backends */

/* Quote a string as a Go interpreted string literal */
pub fn go_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/* Quote a string as a Rust string literal */
pub fn rust_quote(text: &str) -> String {
    format!("{:?}", text)
}

/* `HTTPStatus` -> `HTTP_STATUS`, `Unum` -> `UNUM`, `pill_kind` -> `PILL_KIND` */
pub fn screaming_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(ch.to_uppercase());
    }
    out
}

/* Render `name -= lo`. `lo` is a value of the declared type, so it is kept
 * as written: `-lo` would overflow when `lo` is the type's minimum. */
pub fn sub_assign(name: &str, lo: i128) -> String {
    format!("{} -= {}", name, lo)
}

/* Render `name+lo`, compact as in a call argument. Same sign rule as above. */
pub fn add_compact(name: &str, lo: i128) -> String {
    format!("{}+{}", name, lo)
}

/* Render `expr - lo` over an int64 expression. A negative `lo` is folded into
 * an addition while its magnitude still fits int64. */
pub fn minus(expr: &str, lo: i128) -> String {
    if lo < 0 && lo.unsigned_abs() <= i64::MAX as u128 {
        format!("{} + {}", expr, lo.unsigned_abs())
    } else {
        format!("{} - {}", expr, lo)
    }
}

/* Comma-separated offsets as they appear inside an array literal */
pub fn join_offsets(offsets: &[usize]) -> String {
    offsets
        .iter()
        .map(|offset| offset.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
