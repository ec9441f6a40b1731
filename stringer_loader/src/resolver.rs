use crate::file::DeclFile;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use stringer_types::{EnumDecl, GenerationOptions};
use tracing::debug;

/* A declared type together with the file it came from */
#[derive(Debug, Clone)]
struct LoadedDecl {
    decl: EnumDecl,
    source: PathBuf,
}

/* Merges declaration files of a single package, keeping types in discovery
 * order: file load order first, then declaration order within a file. */
#[derive(Debug, Default)]
pub struct DeclResolver {
    loaded_files: HashSet<PathBuf>,
    package: Option<String>,
    options: Option<(GenerationOptions, PathBuf)>,
    types: IndexMap<String, LoadedDecl>,
}

impl DeclResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /* Load a declaration file from disk. Loading the same file twice is a no-op. */
    pub fn load_file(&mut self, file_path: &Path) -> anyhow::Result<()> {
        let canonical_path = file_path.canonicalize().map_err(|e| {
            anyhow::anyhow!("cannot open declaration file {}: {}", file_path.display(), e)
        })?;

        if self.loaded_files.contains(&canonical_path) {
            debug!(path = %file_path.display(), "skipping already loaded file");
            return Ok(());
        }

        let file = DeclFile::from_path(file_path)?;
        self.add_file(file, file_path)?;
        self.loaded_files.insert(canonical_path);
        Ok(())
    }

    /* Merge an already parsed file. `source` is only used for diagnostics. */
    pub fn add_file(&mut self, file: DeclFile, source: &Path) -> anyhow::Result<()> {
        debug!(
            path = %source.display(),
            package = %file.package,
            types = file.types.len(),
            "loading declaration file"
        );

        match &self.package {
            Some(package) if *package != file.package => {
                anyhow::bail!(
                    "{} declares package '{}' but previously loaded files declare '{}'",
                    source.display(),
                    file.package,
                    package
                );
            }
            Some(_) => {}
            None => self.package = Some(file.package.clone()),
        }

        if let Some(options) = file.options {
            match &self.options {
                Some((existing, first)) if *existing != options => {
                    anyhow::bail!(
                        "{} sets generation options that conflict with {}",
                        source.display(),
                        first.display()
                    );
                }
                Some(_) => {}
                None => self.options = Some((options, source.to_path_buf())),
            }
        }

        for decl in file.types {
            if let Some(existing) = self.types.get(&decl.name) {
                anyhow::bail!(
                    "type '{}' declared in {} is already declared in {}",
                    decl.name,
                    source.display(),
                    existing.source.display()
                );
            }
            self.types.insert(
                decl.name.clone(),
                LoadedDecl {
                    decl,
                    source: source.to_path_buf(),
                },
            );
        }

        Ok(())
    }

    pub fn loaded_file_count(&self) -> usize {
        self.loaded_files.len()
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /* Options recorded in the loaded files, if any file set them */
    pub fn options(&self) -> Option<&GenerationOptions> {
        self.options.as_ref().map(|(options, _)| options)
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    pub fn get_type(&self, name: &str) -> Option<&EnumDecl> {
        self.types.get(name).map(|loaded| &loaded.decl)
    }

    pub fn source_of(&self, name: &str) -> Option<&Path> {
        self.types.get(name).map(|loaded| loaded.source.as_path())
    }

    /* All declared types in discovery order */
    pub fn all_types(&self) -> Vec<EnumDecl> {
        self.types.values().map(|loaded| loaded.decl.clone()).collect()
    }

    /* The requested types in discovery order (not request order). An empty
     * request selects everything. */
    pub fn select(&self, names: &[String]) -> anyhow::Result<Vec<EnumDecl>> {
        if names.is_empty() {
            return Ok(self.all_types());
        }

        for name in names {
            if !self.types.contains_key(name) {
                anyhow::bail!(
                    "type '{}' is not declared in any loaded file (known: {})",
                    name,
                    self.type_names().join(", ")
                );
            }
        }

        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        Ok(self
            .types
            .values()
            .filter(|loaded| wanted.contains(loaded.decl.name.as_str()))
            .map(|loaded| loaded.decl.clone())
            .collect())
    }
}
