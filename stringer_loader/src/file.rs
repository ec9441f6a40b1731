use anyhow::Context;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;
use stringer_types::{EnumDecl, GenerationOptions};

/* ============================================================================
   Declaration File
   ============================================================================ */

/* On-disk encoding of a declaration file */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /* `.json` files are JSON, everything else is read as YAML */
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }
}

/* One declaration file: a package and the integer types declared in it */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct DeclFile {
    /* Package the generated code belongs to */
    pub package: String,

    /* Naming options recorded alongside the declarations */
    #[serde(default)]
    pub options: Option<GenerationOptions>,

    /* Declared types, in declaration order */
    #[serde(default)]
    pub types: Vec<EnumDecl>,
}

impl DeclFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            options: None,
            types: Vec::new(),
        }
    }

    pub fn add_type(&mut self, decl: EnumDecl) {
        self.types.push(decl);
    }

    pub fn parse(contents: &str, format: FileFormat) -> anyhow::Result<Self> {
        let file = match format {
            FileFormat::Yaml => serde_yml::from_str(contents).context("invalid YAML declaration file")?,
            FileFormat::Json => serde_json::from_str(contents).context("invalid JSON declaration file")?,
        };
        Ok(file)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents, FileFormat::from_path(path))
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringer_types::{DeclaredValue, IntegerKind};

    const UNUM: &str = r#"
package: test
types:
  - name: Unum
    underlying: uint
    values:
      - { name: m_2, value: 253 }
      - { name: m_1, value: 254 }
      - { name: m0, value: 0 }
      - { name: m1, value: 1, comment: "one" }
      - { name: m2, value: "0x2" }
"#;

    #[test]
    fn test_parse_yaml() {
        let file = DeclFile::parse(UNUM, FileFormat::Yaml).unwrap();
        assert_eq!(file.package, "test");
        assert!(file.options.is_none());
        assert_eq!(file.types.len(), 1);

        let unum = &file.types[0];
        assert_eq!(unum.name, "Unum");
        assert_eq!(unum.underlying, IntegerKind::Uint);
        assert_eq!(unum.values.len(), 5);
        assert_eq!(unum.values[0].value, DeclaredValue::Signed(253));
        assert_eq!(unum.values[3].comment.as_deref(), Some("one"));
        assert_eq!(unum.values[4].value.resolve(), Ok(2));
    }

    #[test]
    fn test_parse_json_with_options() {
        let json = r#"{
            "package": "colors",
            "options": { "trim-prefix": "Color", "line-comment": true },
            "types": [
                { "name": "Color", "underlying": "int8",
                  "values": [ { "name": "ColorRed", "value": -1 } ] }
            ]
        }"#;
        let file = DeclFile::parse(json, FileFormat::Json).unwrap();
        let options = file.options.unwrap();
        assert_eq!(options.trim_prefix, "Color");
        assert!(options.line_comment);
        assert_eq!(file.types[0].underlying, IntegerKind::Int8);
        assert_eq!(file.types[0].values[0].value, DeclaredValue::Signed(-1));
    }

    #[test]
    fn test_unknown_underlying_kind_is_rejected() {
        let yaml = "package: p\ntypes:\n  - name: F\n    underlying: float64\n";
        assert!(DeclFile::parse(yaml, FileFormat::Yaml).is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a/b.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a/b.JSON")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a/b.yaml")), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("a/b")), FileFormat::Yaml);
    }
}
