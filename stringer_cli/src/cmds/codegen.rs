/* Codegen command - generate accessor code from declaration files */

use super::common::{load_declarations, resolve_options};
use anyhow::Context;
use std::path::{Path, PathBuf};
use stringer_gen::{formatter_for, FormatterKind, GenError, Generator, Target};
use tracing::debug;

pub struct CodegenConfig {
  pub files: Vec<PathBuf>,
  pub types: Vec<String>,
  pub target: Target,
  pub output: Option<PathBuf>,
  pub trim_prefix: Option<String>,
  pub line_comment: bool,
  pub formatter: FormatterKind,
  pub formatter_cmd: Option<String>,
  pub skip_invalid: bool,
  pub verbose: bool,
}

/* Execute the codegen command */
pub fn run(config: CodegenConfig) -> anyhow::Result<()> {
  if config.verbose {
    println!("Stringer Generator - Code Generation Tool");
    println!("=========================================\n");
    println!("[~] Configuration:");
    println!("  Language: {:?}", config.target);
    println!("  Formatter: {:?}", config.formatter);
    println!("  Input files: {}", config.files.len());
    for file in &config.files {
      println!("    - {}", file.display());
    }
    println!();
  }

  let (resolver, decls) = load_declarations(&config.files, &config.types, config.verbose)?;
  let options = resolve_options(resolver.options(), config.trim_prefix.clone(), config.line_comment);
  let package = resolver
    .package()
    .context("no package declared in the given files")?
    .to_string();

  let output = match &config.output {
    Some(path) => path.clone(),
    None => default_output_path(&config.files[0], &decls[0].name, config.target),
  };

  if config.verbose {
    println!("[~] Options: trim-prefix='{}' line-comment={}", options.trim_prefix, options.line_comment);
    println!("[*] Generating {} group(s) for package '{}'...", decls.len(), package);
  }

  let generator = Generator::new(config.target, options);
  let outcome = generator.generate(&package, &decls)?;

  let command = config
    .formatter_cmd
    .as_deref()
    .map(|cmd| cmd.split_whitespace().map(str::to_string).collect::<Vec<_>>())
    .filter(|parts| !parts.is_empty());
  let formatter = formatter_for(config.formatter, config.target, command);

  let assembled = match outcome.assemble(formatter.as_ref(), config.skip_invalid) {
    Ok(assembled) => assembled,
    Err(GenError::FormatterRejected { type_names, message, buffer }) => {
      if config.verbose {
        eprintln!("[✗] Unformatted output:\n{}", String::from_utf8_lossy(&buffer));
      }
      anyhow::bail!(
        "formatter '{}' rejected generated code for {}: {}",
        formatter.name(),
        type_names.join(", "),
        message
      );
    }
    Err(err) => return Err(err.into()),
  };

  for skipped in &assembled.skipped {
    println!("[!] Skipped: {}", skipped);
  }

  if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  debug!(path = %output.display(), bytes = assembled.source.len(), "writing generated file");
  std::fs::write(&output, &assembled.source)
    .with_context(|| format!("failed to write {}", output.display()))?;

  println!(
    "[✓] Wrote {} ({} type(s): {})",
    output.display(),
    assembled.types.len(),
    assembled.types.join(", ")
  );

  Ok(())
}

/* `<dir of first file>/<lowercased first type>_string.<ext>` */
pub fn default_output_path(first_file: &Path, first_type: &str, target: Target) -> PathBuf {
  let dir = first_file.parent().unwrap_or_else(|| Path::new(""));
  dir.join(format!(
    "{}_string.{}",
    first_type.to_lowercase(),
    target.file_extension()
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_output_path() {
    assert_eq!(
      default_output_path(Path::new("defs/colors.yaml"), "PillKind", Target::Go),
      PathBuf::from("defs/pillkind_string.go")
    );
    assert_eq!(
      default_output_path(Path::new("colors.yaml"), "Unum", Target::Rust),
      PathBuf::from("unum_string.rs")
    );
  }
}
