//! Document configuration from a TOML file
//!
//! A [`DocumentConfig`] describes the same preamble as [`DocumentBuilder`] in
//! a file that can be kept next to the program generating the document:
//!
//! ```toml
//! class = "article"
//! title = "Quarterly Report"
//! author = "Data Team"
//! date = "today"
//! title_page = true
//!
//! [[packages]]
//! name = "geometry"
//! extra = "margin=1in"
//!
//! [[commands]]
//! name = "R"
//! arity = 0
//! body = "\\mathbb{R}"
//!
//! [[lengths]]
//! name = "parindent"
//! value = "0pt"
//! ```

use crate::builder::DocumentBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Date value that selects the current local date
pub const TODAY: &str = "today";

fn default_class() -> String {
    "article".to_string()
}

/// Preamble configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Document class name (article, report or book)
    #[serde(default = "default_class")]
    pub class: String,

    pub title: Option<String>,

    pub author: Option<String>,

    /// Literal date text, or `"today"` for the current date in long form
    pub date: Option<String>,

    /// Emit `\maketitle` at the start of the body
    #[serde(default)]
    pub title_page: bool,

    #[serde(default)]
    pub packages: Vec<PackageConfig>,

    #[serde(default)]
    pub commands: Vec<CommandConfig>,

    #[serde(default)]
    pub lengths: Vec<LengthConfig>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            class: default_class(),
            title: None,
            author: None,
            date: None,
            title_page: false,
            packages: Vec::new(),
            commands: Vec::new(),
            lengths: Vec::new(),
        }
    }
}

/// Package entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    pub name: String,
    pub extra: Option<String>,
}

/// Custom command entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub name: String,
    #[serde(default)]
    pub arity: u8,
    pub body: String,
}

/// Length entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthConfig {
    pub name: String,
    pub value: String,
}

impl DocumentConfig {
    /// Read a preamble description from a TOML file
    ///
    /// Missing optional keys fall back to an untitled article.
    ///
    /// # Parameters
    /// * `path` - TOML file describing class, metadata, packages and macros
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocumentConfigError> {
        let text = fs::read_to_string(&path).map_err(DocumentConfigError::IoError)?;
        toml::from_str(&text).map_err(DocumentConfigError::ParseError)
    }

    /// Write this preamble description as TOML, replacing any existing file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentConfigError> {
        let text = toml::to_string_pretty(self).map_err(DocumentConfigError::SerializeError)?;
        fs::write(&path, text).map_err(DocumentConfigError::IoError)
    }

    /// Convert into a builder
    ///
    /// The class name is not checked here; an unknown class is reported by
    /// [`DocumentBuilder::build`].
    pub fn into_builder(self) -> DocumentBuilder {
        let mut builder = DocumentBuilder::new()
            .class_name(&self.class)
            .title_page(self.title_page);

        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        if let Some(author) = self.author {
            builder = builder.author(author);
        }
        builder = match self.date {
            Some(date) if date.trim().eq_ignore_ascii_case(TODAY) => builder.date_today(),
            Some(date) => builder.date(date),
            None => builder,
        };

        for package in self.packages {
            builder = match package.extra {
                Some(extra) => builder.package_with(package.name, extra),
                None => builder.package(package.name),
            };
        }
        for length in self.lengths {
            builder = builder.length(&length.name, length.value);
        }
        for command in self.commands {
            builder = builder.command(&command.name, command.arity, command.body);
        }

        builder
    }
}

/// Failure reading or writing a preamble file
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum DocumentConfigError {
    /// The preamble file could not be read or written
    IoError(std::io::Error),

    /// The file is not a valid preamble description
    ParseError(toml::de::Error),

    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for DocumentConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error on preamble file: {}", e),
            Self::ParseError(e) => write!(f, "invalid preamble TOML: {}", e),
            Self::SerializeError(e) => write!(f, "cannot encode preamble as TOML: {}", e),
        }
    }
}

impl std::error::Error for DocumentConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentConfigError::IoError(e) => Some(e),
            DocumentConfigError::ParseError(e) => Some(e),
            DocumentConfigError::SerializeError(e) => Some(e),
        }
    }
}
