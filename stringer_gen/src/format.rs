//! Formatting stage: runs after emission, over the fully assembled output.
//!
//! A formatter either returns canonical text or rejects the buffer. A
//! rejection always means the emitter produced something unparsable, so the
//! offending buffer travels with the error untouched.

use crate::codegen::Target;
use crate::error::{GenError, GenResult};
use serde_derive::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    /* `type_names` identifies the groups in `source` for error reporting */
    fn format(&self, source: &[u8], type_names: &[String]) -> GenResult<Vec<u8>>;
}

/// Which formatter the pass should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FormatterKind {
    /// Built-in syntax check and whitespace normalization.
    #[default]
    Builtin,
    /// Leave the emitted bytes untouched.
    None,
    /// Pipe through an external program such as `gofmt`.
    External,
}

pub fn formatter_for(
    kind: FormatterKind,
    target: Target,
    command: Option<Vec<String>>,
) -> Box<dyn Formatter> {
    match kind {
        FormatterKind::Builtin => Box::new(Canonical::for_target(target)),
        FormatterKind::None => Box::new(Passthrough),
        FormatterKind::External => {
            let command = command.unwrap_or_else(|| default_command(target));
            Box::new(External::new(command))
        }
    }
}

fn default_command(target: Target) -> Vec<String> {
    match target {
        Target::Go => vec!["gofmt".to_string()],
        Target::Rust => vec![
            "rustfmt".to_string(),
            "--emit".to_string(),
            "stdout".to_string(),
            "--edition".to_string(),
            "2021".to_string(),
        ],
    }
}

fn rejected(type_names: &[String], message: impl Into<String>, source: &[u8]) -> GenError {
    GenError::FormatterRejected {
        type_names: type_names.to_vec(),
        message: message.into(),
        buffer: source.to_vec(),
    }
}

/* ============================================================================
   Passthrough
   ============================================================================ */

pub struct Passthrough;

impl Formatter for Passthrough {
    fn name(&self) -> &str {
        "none"
    }

    fn format(&self, source: &[u8], _type_names: &[String]) -> GenResult<Vec<u8>> {
        Ok(source.to_vec())
    }
}

/* ============================================================================
   Built-in canonicalizer
   ============================================================================ */

/* Checks that brackets balance outside literals and comments, then strips
 * trailing whitespace, collapses blank-line runs to one blank line and ends
 * the text with a single newline. Idempotent on its own output.
 *
 * Rust output is also parsed with `syn`, so any syntax error is a rejection.
 * Go output gets the delimiter check only; use `--formatter external` (gofmt)
 * for a full Go parse. */
pub struct Canonical {
    target: Target,
}

impl Canonical {
    pub fn for_target(target: Target) -> Self {
        Self { target }
    }
}

impl Formatter for Canonical {
    fn name(&self) -> &str {
        "builtin"
    }

    fn format(&self, source: &[u8], type_names: &[String]) -> GenResult<Vec<u8>> {
        let text = std::str::from_utf8(source)
            .map_err(|e| rejected(type_names, format!("output is not UTF-8: {}", e), source))?;
        check_delimiters(text).map_err(|message| rejected(type_names, message, source))?;
        if self.target == Target::Rust {
            syn::parse_file(text).map_err(|e| {
                rejected(type_names, format!("not valid Rust: {}", e), source)
            })?;
        }
        Ok(normalize_whitespace(text).into_bytes())
    }
}

fn check_delimiters(text: &str) -> Result<(), String> {
    let chars: Vec<char> = text.chars().collect();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\n' => line += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start = line;
                i += 2;
                loop {
                    match chars.get(i) {
                        None => return Err(format!("unterminated comment starting on line {}", start)),
                        Some('*') if chars.get(i + 1) == Some(&'/') => {
                            i += 2;
                            break;
                        }
                        Some('\n') => line += 1,
                        Some(_) => {}
                    }
                    i += 1;
                }
                continue;
            }
            '"' | '`' => {
                let start = line;
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(format!("unterminated string starting on line {}", start)),
                        Some('\\') if ch == '"' => i += 1,
                        Some('\n') if ch == '"' => {
                            return Err(format!("newline in string literal on line {}", start))
                        }
                        Some('\n') => line += 1,
                        Some(c) if *c == ch => break,
                        Some(_) => {}
                    }
                    i += 1;
                }
            }
            '\'' => {
                /* rune/char literal, otherwise a lifetime */
                if chars.get(i + 1) == Some(&'\\') {
                    let mut j = i + 2;
                    while j < chars.len() && chars[j] != '\'' && chars[j] != '\n' {
                        j += 1;
                    }
                    if chars.get(j) != Some(&'\'') {
                        return Err(format!("unterminated character literal on line {}", line));
                    }
                    i = j;
                } else if chars.get(i + 2) == Some(&'\'') {
                    i += 2;
                }
            }
            '(' | '[' | '{' => stack.push((ch, line)),
            ')' | ']' | '}' => {
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        return Err(format!(
                            "line {}: '{}' closes '{}' opened on line {}",
                            line, ch, open, open_line
                        ))
                    }
                    None => return Err(format!("line {}: unmatched '{}'", line, ch)),
                }
            }
            _ => {}
        }
        i += 1;
    }

    match stack.pop() {
        Some((open, open_line)) => Err(format!("'{}' opened on line {} is never closed", open, open_line)),
        None => Ok(()),
    }
}

fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(trimmed);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/* ============================================================================
   External program
   ============================================================================ */

/* Pipes the buffer through a program on stdin/stdout, e.g. `gofmt` */
pub struct External {
    command: Vec<String>,
}

impl External {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or("")
    }
}

impl Formatter for External {
    fn name(&self) -> &str {
        self.program()
    }

    fn format(&self, source: &[u8], type_names: &[String]) -> GenResult<Vec<u8>> {
        let io_error = |source: std::io::Error| GenError::Io {
            program: self.program().to_string(),
            source,
        };

        let (program, args) = self.command.split_first().ok_or_else(|| {
            io_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty formatter command",
            ))
        })?;
        debug!(program = %program, bytes = source.len(), "running external formatter");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_error)?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            io_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "formatter stdin unavailable",
            ))
        })?;
        let input = source.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output().map_err(io_error)?;
        match writer.join() {
            Ok(result) => result.map_err(io_error)?,
            Err(_) => {
                return Err(io_error(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "formatter stdin writer panicked",
                )))
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(rejected(type_names, stderr.trim().to_string(), source));
        }
        Ok(output.stdout)
    }
}
