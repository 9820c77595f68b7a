use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::ManifestError;

pub const MANIFEST_FILE: &str = "go.mod";

/// Declared root identifier of the module, read once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn module_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*module[ \t]+"?([^\s"]+)"?[ \t]*(?://.*)?\r?$"#)
            .expect("module regex")
    })
}

/// First `module <name>` declaration in go.mod text.
pub fn parse_module_name(text: &str) -> Option<ModuleName> {
    module_line()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| ModuleName::new(m.as_str()))
}

pub fn read_module_name(path: &Path) -> Result<ModuleName, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::Missing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_module_name(&text).ok_or_else(|| ManifestError::NoModuleDeclaration(path.to_path_buf()))
}
