//! Document metadata builder
//!
//! [`DocumentBuilder`] collects preamble settings fluently and is consumed by
//! [`DocumentBuilder::build`], which emits the preamble and returns a
//! [`DocumentWriter`] positioned at the start of the document body.
//!
//! Emission order:
//! 1. `\documentclass{...}`
//! 2. packages, then lengths, in insertion order
//! 3. blank line
//! 4. `\title`, `\author`, `\date` (each only when set)
//! 5. `\begin{document}`
//! 6. custom command definitions
//! 7. `\maketitle` when the title page is enabled
//! 8. blank line
//!
//! Custom commands are defined inside the document environment so that they
//! exist before any body content uses them.

use crate::level::NestingLevel;
use crate::writer::DocumentWriter;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that prevent a document from being built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The document class is not one of article, report or book
    #[error("unknown document class '{0}' (expected article, report or book)")]
    UnknownClass(String),
}

/// Supported document classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentClass {
    #[default]
    Article,
    Report,
    Book,
}

impl DocumentClass {
    /// Level the first section of a document of this class opens at
    pub fn start_level(self) -> NestingLevel {
        match self {
            Self::Book => NestingLevel::Chapter,
            Self::Article | Self::Report => NestingLevel::Section,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Report => "report",
            Self::Book => "book",
        }
    }
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentClass {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "report" => Ok(Self::Report),
            "book" => Ok(Self::Book),
            _ => Err(BuildError::UnknownClass(s.to_string())),
        }
    }
}

/// Value of the `\date` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentDate {
    /// Emitted verbatim
    Literal(String),
    /// The host's current local date in long form, resolved at build time
    Today,
}

impl DocumentDate {
    /// Text placed inside `\date{...}`
    pub fn render(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Today => format_long_date(chrono::Local::now().date_naive()),
        }
    }
}

/// Long-form calendar date, e.g. `October 16, 2026`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// A `\usepackage` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Extra bracket group emitted after the package name
    pub extra: Option<String>,
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\usepackage{{{}}}", self.name)?;
        if let Some(extra) = &self.extra {
            write!(f, "[{}]", extra)?;
        }
        Ok(())
    }
}

/// A `\newcommand` definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCommand {
    /// Command name without the leading backslash
    pub name: String,
    /// Number of parameters; 0 defines a plain alias
    pub arity: u8,
    pub body: String,
}

impl fmt::Display for CustomCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arity == 0 {
            write!(f, "\\newcommand{{\\{}}}{{{}}}", self.name, self.body)
        } else {
            write!(
                f,
                "\\newcommand{{\\{}}}[{}]{{{}}}",
                self.name, self.arity, self.body
            )
        }
    }
}

/// A `\setlength` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Length {
    /// Length register name without the leading backslash
    pub name: String,
    pub value: String,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\setlength{{\\{}}}{{{}}}", self.name, self.value)
    }
}

fn control_word(name: &str) -> String {
    name.trim_start_matches('\\').to_string()
}

/// Fluent preamble configuration
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    /// Unparsed class names are kept until `build` so the error surfaces there
    class: Result<DocumentClass, String>,
    title: Option<String>,
    author: Option<String>,
    date: Option<DocumentDate>,
    title_page: bool,
    packages: Vec<Package>,
    commands: Vec<CustomCommand>,
    lengths: Vec<Length>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            class: Ok(DocumentClass::default()),
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

impl DocumentBuilder {
    /// Builder for an article with no metadata
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: DocumentClass) -> Self {
        self.class = Ok(class);
        self
    }

    /// Set the class by name; an unknown name fails at [`DocumentBuilder::build`]
    pub fn class_name(mut self, name: &str) -> Self {
        self.class = name.parse::<DocumentClass>().map_err(|_| name.to_string());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Use `date` verbatim in `\date{...}`
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(DocumentDate::Literal(date.into()));
        self
    }

    /// Use today's date in long form
    pub fn date_today(mut self) -> Self {
        self.date = Some(DocumentDate::Today);
        self
    }

    /// Emit `\maketitle` after the custom commands
    pub fn title_page(mut self, enabled: bool) -> Self {
        self.title_page = enabled;
        self
    }

    pub fn package(self, name: impl Into<String>) -> Self {
        self.push_package(name.into(), None)
    }

    /// Package with an extra bracket group: `\usepackage{name}[extra]`
    pub fn package_with(self, name: impl Into<String>, extra: impl Into<String>) -> Self {
        self.push_package(name.into(), Some(extra.into()))
    }

    fn push_package(mut self, name: String, extra: Option<String>) -> Self {
        self.packages.push(Package { name, extra });
        self
    }

    /// Define `\name` taking `arity` parameters
    pub fn command(mut self, name: &str, arity: u8, body: impl Into<String>) -> Self {
        self.commands.push(CustomCommand {
            name: control_word(name),
            arity,
            body: body.into(),
        });
        self
    }

    /// Define `\name` as a parameterless alias for `body`
    pub fn alias(self, name: &str, body: impl Into<String>) -> Self {
        self.command(name, 0, body)
    }

    pub fn length(mut self, name: &str, value: impl Into<String>) -> Self {
        self.lengths.push(Length {
            name: control_word(name),
            value: value.into(),
        });
        self
    }

    /// Emit the preamble and hand over the writer for the document body
    ///
    /// # Returns
    /// * `Ok(DocumentWriter)` - Writer at the class starting level, preamble written
    /// * `Err(BuildError::UnknownClass)` - The class name was not recognized
    pub fn build(self) -> Result<DocumentWriter, BuildError> {
        let class = self.class.map_err(BuildError::UnknownClass)?;
        let mut writer = DocumentWriter::new(class.start_level());

        writer.write_line(&format!("\\documentclass{{{}}}", class));
        for package in &self.packages {
            writer.write_line(&package.to_string());
        }
        for length in &self.lengths {
            writer.write_line(&length.to_string());
        }
        writer.blank_line();

        if let Some(title) = self.title.as_deref() {
            writer.command("title", Some(title), None, None);
        }
        if let Some(author) = self.author.as_deref() {
            writer.command("author", Some(author), None, None);
        }
        if let Some(date) = &self.date {
            writer.command("date", Some(date.render().as_str()), None, None);
        }

        writer.write_line("\\begin{document}");
        for command in &self.commands {
            writer.write_line(&command.to_string());
        }
        if self.title_page {
            writer.write_line("\\maketitle");
        }
        writer.blank_line();

        log::debug!(
            "Built {} preamble with {} package(s) and {} command(s)",
            class,
            self.packages.len(),
            self.commands.len()
        );
        Ok(writer)
    }
}
