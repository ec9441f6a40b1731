/* Common utilities shared between analyze and codegen commands */

use anyhow::Context;
use std::path::PathBuf;
use stringer_loader::DeclResolver;
use stringer_types::{EnumDecl, GenerationOptions};

/* Load every declaration file and pick the requested types in discovery order */
pub fn load_declarations(
  files: &[PathBuf],
  types: &[String],
  verbose: bool,
) -> anyhow::Result<(DeclResolver, Vec<EnumDecl>)> {
  let mut resolver = DeclResolver::new();

  if verbose {
    println!("[~] Loading declaration files...");
  }
  for file in files {
    resolver
      .load_file(file)
      .with_context(|| format!("failed to load {}", file.display()))?;
    if verbose {
      println!("    - {}", file.display());
    }
  }

  let selected = resolver.select(types)?;
  if selected.is_empty() {
    anyhow::bail!("no types declared in the given files");
  }

  if verbose {
    println!(
      "[~] Loaded {} type(s) from {} file(s), package '{}'",
      selected.len(),
      resolver.loaded_file_count(),
      resolver.package().unwrap_or_default()
    );
    for decl in &selected {
      println!("  - {} ({}, {} values)", decl.name, decl.underlying, decl.values.len());
    }
    println!();
  }

  Ok((resolver, selected))
}

/* Resolve naming options: command-line flag, then the files' `options:` block,
 * then defaults */
pub fn resolve_options(
  from_files: Option<&GenerationOptions>,
  trim_prefix: Option<String>,
  line_comment: bool,
) -> GenerationOptions {
  let base = from_files.cloned().unwrap_or_default();
  GenerationOptions {
    trim_prefix: trim_prefix.unwrap_or(base.trim_prefix),
    line_comment: line_comment || base.line_comment,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_flag_beats_file_options() {
    let file = GenerationOptions {
      trim_prefix: "File".to_string(),
      line_comment: false,
    };
    let options = resolve_options(Some(&file), Some("Flag".to_string()), true);
    assert_eq!(options.trim_prefix, "Flag");
    assert!(options.line_comment);
  }

  #[test]
  fn test_file_options_beat_defaults() {
    let file = GenerationOptions {
      trim_prefix: "File".to_string(),
      line_comment: true,
    };
    let options = resolve_options(Some(&file), None, false);
    assert_eq!(options, file);
    assert_eq!(resolve_options(None, None, false), GenerationOptions::default());
  }
}
