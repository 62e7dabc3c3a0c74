//! Literal placeholder substitution over a fixed set of template files.
//!
//! A [`TemplateProcessor`] holds a source root, a destination root, a list of
//! `(template, output)` pairs and a table of named substitutions. Placeholders
//! are plain tokens (e.g. `ARCH_NAME`), not a template language: there is no
//! escaping, no conditionals and no recursion.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// No dependencies, so Display/Error are written out by hand.
#[derive(Debug)]
pub enum Error {
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
    CreateDir { path: PathBuf, source: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read { path, source } => {
                write!(f, "failed to read template {}: {}", path.display(), source)
            }
            Error::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Error::CreateDir { path, source } => {
                write!(f, "failed to create directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { source, .. }
            | Error::Write { source, .. }
            | Error::CreateDir { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Create `path` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace every registered token in `text` with its value.
///
/// Single left-to-right pass: at each position the longest matching token
/// wins, and substituted text is not scanned again.
pub fn render(text: &str, substitutions: &BTreeMap<String, String>) -> String {
    let mut tokens: Vec<(&str, &str)> = substitutions
        .iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'scan: while let Some(c) = rest.chars().next() {
        for (name, value) in &tokens {
            if rest.starts_with(name) {
                out.push_str(value);
                rest = &rest[name.len()..];
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[derive(Debug, Clone)]
struct Template {
    source: PathBuf,
    output: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateProcessor {
    source_root: PathBuf,
    destination_root: PathBuf,
    templates: Vec<Template>,
    substitutions: BTreeMap<String, String>,
}

impl TemplateProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that relative template names are resolved against.
    pub fn set_source_root(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.source_root = path.into();
        self
    }

    /// Directory that relative output paths are resolved against.
    pub fn set_destination_root(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.destination_root = path.into();
        self
    }

    pub fn add_template(
        &mut self,
        template: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> &mut Self {
        self.templates.push(Template {
            source: template.into(),
            output: output.into(),
        });
        self
    }

    /// Register `name -> value`. Re-registering a name replaces its value.
    pub fn add_substitution(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.substitutions.insert(name.into(), value.into());
        self
    }

    pub fn render(&self, text: &str) -> String {
        render(text, &self.substitutions)
    }

    /// Render every registered template to its output path, creating parent
    /// directories as needed. Returns the written paths in registration order.
    pub fn process_all(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.templates.len());
        for template in &self.templates {
            let source = self.source_root.join(&template.source);
            let output = self.destination_root.join(&template.output);

            let text = fs::read_to_string(&source).map_err(|e| Error::Read {
                path: source.clone(),
                source: e,
            })?;

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    ensure_dir(parent)?;
                }
            }

            fs::write(&output, self.render(&text)).map_err(|e| Error::Write {
                path: output.clone(),
                source: e,
            })?;
            written.push(output);
        }
        Ok(written)
    }
}
