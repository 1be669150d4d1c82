use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::processor::ast::Action;

/// Everything one parse call produces.
///
/// Built fresh per parse and only read afterwards; writers never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCode {
    pub events: Vec<Event>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
    /// Sorted, deduplicated component names.
    pub components: Vec<String>,
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
}

impl ParsedCode {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Looks up a procedure declaration by name.
    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }
}

/// `On Button1.Click do` and its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub component: String,
    pub event: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Global `Define <name> as <value>` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One problem with one source line (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

// ─────────────────────────────────────────────────────
// Extensions
// ─────────────────────────────────────────────────────

/// A non-core component kind, optionally shipping its `.aix` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    pub name: String,
    pub version: String,
    pub uuid: String,
    pub payload: Option<ExtensionPayload>,
}

impl ExtensionDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            uuid: uuid.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: ExtensionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Describes an uploaded `.aix` file: the file stem names the
    /// extension, the version is `1` and the identifier is
    /// `com.extension.<lowercase stem>`.
    pub fn from_aix_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let name = file_name.strip_suffix(".aix")?;
        if name.is_empty() {
            return None;
        }
        Some(
            Self::new(name, "1", format!("com.extension.{}", name.to_lowercase()))
                .with_payload(ExtensionPayload::file(path)),
        )
    }
}

/// Bytes to place under `assets/<file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPayload {
    pub file_name: String,
    pub source: PayloadSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Bytes(Vec<u8>),
    File(PathBuf),
}

impl ExtensionPayload {
    pub fn bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            source: PayloadSource::Bytes(bytes),
        }
    }

    pub fn file(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            file_name,
            source: PayloadSource::File(path.to_path_buf()),
        }
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            PayloadSource::Bytes(bytes) => Ok(bytes.clone()),
            PayloadSource::File(path) => std::fs::read(path),
        }
    }
}
