//! Document writer
//!
//! [`DocumentWriter`] is the single text emitter for a document body. It
//! combines a [`TextSink`] with a [`LevelTracker`] and adds scoped constructs:
//! sections, environments, lists and tables.
//!
//! Every opening operation comes in two forms:
//! - a scoped form (`section`, `environment`, `itemize`, `table`, ...) that
//!   returns a [`ScopeHandle`] which closes the construct when dropped or
//!   explicitly closed
//! - a manual `begin_*` / `end_*` pair for callers that cannot keep a handle
//!   alive across the region
//!
//! Both forms register the construct on an internal stack. Closing a construct
//! first closes whatever was opened inside it and is still open. When the
//! document is finalized, anything left on the stack is closed innermost first,
//! so a forgotten `end_*` call still yields balanced output.

use crate::format::escape;
use crate::level::{LevelError, LevelTracker, NestingLevel};
use crate::scope::ScopeHandle;
use crate::sink::{Bookmark, SinkError, TextSink};
use itertools::Itertools;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker appended exactly once when the document is rendered
pub const END_DOCUMENT: &str = "\\end{document}";

/// Errors raised by the document writer
#[derive(Error, Debug)]
pub enum WriterError {
    #[error("failed to write {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV table {path}: {source}", path = .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Layout of a floating `table` environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Column specification passed to `tabular` (e.g. `r|r|r`)
    pub columns: String,
    /// Float placement specifier
    pub layout: String,
    /// Unnumbered caption emitted as `\caption*{...}`
    pub caption: Option<String>,
    pub label: Option<String>,
    /// Emit `\centering` inside the float
    pub centered: bool,
}

impl TableOptions {
    /// Options for `columns` with placement `h`, centered, no caption or label
    pub fn new(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            layout: "h".to_string(),
            caption: None,
            label: None,
            centered: true,
        }
    }

    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }
}

/// Identity of a tracked open construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScopeId(u64);

/// What has to be emitted to close a construct
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScopeKind {
    Section,
    Environment(String),
    Table {
        caption: Option<String>,
        label: Option<String>,
    },
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section => write!(f, "section"),
            Self::Environment(name) => write!(f, "environment '{}'", name),
            Self::Table { .. } => write!(f, "table"),
        }
    }
}

#[derive(Debug)]
struct OpenScope {
    id: ScopeId,
    kind: ScopeKind,
}

/// Stateful LaTeX body writer
#[derive(Debug)]
pub struct DocumentWriter {
    sink: TextSink,
    level: LevelTracker,
    /// Safety net: constructs still open, innermost last
    open: Vec<OpenScope>,
    next_id: u64,
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new(NestingLevel::Section)
    }
}

impl DocumentWriter {
    /// Create an empty writer whose first section opens at `start`
    pub fn new(start: NestingLevel) -> Self {
        Self {
            sink: TextSink::new(),
            level: LevelTracker::new(start),
            open: Vec::new(),
            next_id: 0,
        }
    }

    // ---- plain text ----

    pub fn write(&mut self, text: &str) -> &mut Self {
        self.sink.append(text);
        self
    }

    pub fn write_line(&mut self, text: &str) -> &mut Self {
        self.sink.append_line(text);
        self
    }

    /// Write `c` repeated `count` times
    pub fn write_char(&mut self, c: char, count: usize) -> &mut Self {
        self.sink.append_char(c, count);
        self
    }

    pub fn blank_line(&mut self) -> &mut Self {
        self.sink.append_line("");
        self
    }

    /// Emit `\name{arg}[opt]{arg2}` on its own line
    ///
    /// Each group is omitted when its value is `None`; `opt` and `arg2` are
    /// only emitted when `arg` is present.
    pub fn command(
        &mut self,
        name: &str,
        arg: Option<&str>,
        opt: Option<&str>,
        arg2: Option<&str>,
    ) -> &mut Self {
        let mut line = format!("\\{}", name);
        if let Some(arg) = arg {
            line.push_str(&format!("{{{}}}", arg));
            if let Some(opt) = opt {
                line.push_str(&format!("[{}]", opt));
            }
            if let Some(arg2) = arg2 {
                line.push_str(&format!("{{{}}}", arg2));
            }
        }
        self.sink.append_line(&line);
        self
    }

    pub fn label(&mut self, name: &str) -> &mut Self {
        self.command("label", Some(name), None, None)
    }

    pub fn new_page(&mut self) -> &mut Self {
        self.command("newpage", None, None, None)
    }

    // ---- bookmarks ----

    /// Bookmark the current end of the output
    pub fn bookmark(&self) -> Bookmark {
        self.sink.bookmark()
    }

    /// Insert `text` at an earlier bookmark, shifting everything after it
    pub fn insert_at(&mut self, bookmark: Bookmark, text: &str) -> Result<(), WriterError> {
        self.sink.insert_at(bookmark, text)?;
        Ok(())
    }

    // ---- sections ----

    /// Open a section at the current level and return the command used
    ///
    /// Nesting deeper than `\subparagraph` keeps emitting `\subparagraph`.
    pub fn begin_section(&mut self, title: &str) -> &'static str {
        self.open_section(title).1
    }

    /// Close the most recently opened section
    ///
    /// Environments and tables opened inside the section are closed first.
    ///
    /// # Returns
    /// * `Ok(())` - Moved one level up
    /// * `Err(WriterError::Level)` - No section is open above the chapter level
    pub fn end_section(&mut self) -> Result<(), WriterError> {
        self.level.ascend()?;
        if let Some(pos) = self
            .open
            .iter()
            .rposition(|scope| scope.kind == ScopeKind::Section)
        {
            self.close_newer_than(pos);
            self.open.remove(pos);
        }
        Ok(())
    }

    /// Open a section that closes when the returned handle is closed or dropped
    pub fn section(&mut self, title: &str) -> ScopeHandle<'_, Self, impl FnOnce(&mut Self)> {
        let (id, _) = self.open_section(title);
        self.scoped(id)
    }

    fn open_section(&mut self, title: &str) -> (ScopeId, &'static str) {
        let level = self.level.descend();
        let name = level.command_name();

        self.sink.ensure_newline();
        if level.is_run_in() {
            self.sink.append_line(&format!("\\{}{{{}}} \\hfill", name, title));
            self.sink.append_line("");
        } else {
            self.sink.append_line(&format!("\\{}{{{}}}", name, title));
        }

        log::debug!("Opened {} '{}' (depth {})", name, title, self.level.depth());
        (self.push_scope(ScopeKind::Section), name)
    }

    // ---- environments ----

    /// Emit `\begin{name}args` and track the environment as open
    pub fn begin_environment(&mut self, name: &str, args: Option<&str>) -> &mut Self {
        self.open_environment(name, args);
        self
    }

    /// Emit `\end{name}`, closing the innermost open environment of that name
    ///
    /// Anything opened inside that environment and still open is closed first.
    pub fn end_environment(&mut self, name: &str) -> &mut Self {
        match self
            .open
            .iter()
            .rposition(|scope| matches!(&scope.kind, ScopeKind::Environment(n) if n == name))
        {
            Some(pos) => {
                self.close_newer_than(pos);
                self.open.remove(pos);
            }
            None => log::warn!("Ending environment '{}' that is not open", name),
        }
        self.emit_end_environment(name);
        self
    }

    /// Open an environment that closes when the returned handle is closed or dropped
    pub fn environment(
        &mut self,
        name: &str,
        args: Option<&str>,
    ) -> ScopeHandle<'_, Self, impl FnOnce(&mut Self)> {
        let id = self.open_environment(name, args);
        self.scoped(id)
    }

    pub fn itemize(&mut self) -> ScopeHandle<'_, Self, impl FnOnce(&mut Self)> {
        self.environment("itemize", None)
    }

    pub fn enumerate(&mut self) -> ScopeHandle<'_, Self, impl FnOnce(&mut Self)> {
        self.environment("enumerate", None)
    }

    /// Emit `\item text` without a trailing newline
    pub fn item(&mut self, text: &str) -> &mut Self {
        self.sink.append(&format!("\\item {}", text));
        self
    }

    fn open_environment(&mut self, name: &str, args: Option<&str>) -> ScopeId {
        self.sink.ensure_newline();
        self.sink.append_line(&format!("\\begin{{{}}}{}", name, args.unwrap_or_default()));
        log::debug!("Opened environment '{}'", name);
        self.push_scope(ScopeKind::Environment(name.to_string()))
    }

    fn emit_end_environment(&mut self, name: &str) {
        self.sink.ensure_newline();
        self.sink.append_line(&format!("\\end{{{}}}", name));
    }

    // ---- tables ----

    /// Open a floating table with a `tabular` inside it
    pub fn begin_table(&mut self, options: TableOptions) -> &mut Self {
        self.open_table(options);
        self
    }

    /// Close the innermost open table, and anything still open inside it
    pub fn end_table(&mut self) -> &mut Self {
        let pos = self
            .open
            .iter()
            .rposition(|scope| matches!(scope.kind, ScopeKind::Table { .. }));
        if let Some(pos) = pos {
            self.close_newer_than(pos);
        }
        match pos.map(|pos| self.open.remove(pos).kind) {
            Some(ScopeKind::Table { caption, label }) => {
                self.emit_end_table(caption.as_deref(), label.as_deref());
            }
            _ => {
                log::warn!("Ending a table that is not open");
                self.emit_end_table(None, None);
            }
        }
        self
    }

    /// Open a table that closes when the returned handle is closed or dropped
    pub fn table(&mut self, options: TableOptions) -> ScopeHandle<'_, Self, impl FnOnce(&mut Self)> {
        let id = self.open_table(options);
        self.scoped(id)
    }

    /// Write one table row: values joined by `&`, terminated by `\\`
    pub fn write_row<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let row = values.into_iter().join(" & ");
        self.sink.append_line(&format!("{} \\\\", row));
        self
    }

    pub fn top_rule(&mut self) -> &mut Self {
        self.sink.append_line("\\toprule");
        self
    }

    pub fn mid_rule(&mut self) -> &mut Self {
        self.sink.append_line("\\midrule");
        self
    }

    pub fn bottom_rule(&mut self) -> &mut Self {
        self.sink.append_line("\\bottomrule");
        self
    }

    pub fn h_line(&mut self) -> &mut Self {
        self.sink.append_line("\\hline");
        self
    }

    /// Write the rows of a CSV file
    ///
    /// The header record becomes the first row, followed by `\midrule` and one
    /// row per record. Cells are escaped, so `&` or `%` in the data stays text.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of data rows written
    /// * `Err(WriterError::Csv)` - Error reading or parsing the file
    pub fn write_csv(&mut self, path: impl AsRef<Path>) -> Result<usize, WriterError> {
        let path = path.as_ref();
        let csv_error = |source: csv::Error| WriterError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
        let headers = reader.headers().map_err(csv_error)?.clone();
        if !headers.is_empty() {
            self.write_row(headers.iter().map(escape));
            self.mid_rule();
        }

        let mut rows = 0;
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            self.write_row(record.iter().map(escape));
            rows += 1;
        }

        log::debug!("Wrote {} CSV rows from {}", rows, path.display());
        Ok(rows)
    }

    fn open_table(&mut self, options: TableOptions) -> ScopeId {
        self.sink.ensure_newline();
        self.sink.append_line(&format!("\\begin{{table}}[{}]", options.layout));
        if options.centered {
            self.sink.append_line("\\centering");
        }
        self.sink.append_line(&format!("\\begin{{tabular}}{{{}}}", options.columns));
        log::debug!("Opened table with columns '{}'", options.columns);
        self.push_scope(ScopeKind::Table {
            caption: options.caption,
            label: options.label,
        })
    }

    fn emit_end_table(&mut self, caption: Option<&str>, label: Option<&str>) {
        self.sink.ensure_newline();
        self.sink.append_line("\\end{tabular}");
        if let Some(caption) = caption {
            self.sink.append_line(&format!("\\caption*{{{}}}", caption));
        }
        if let Some(label) = label {
            self.sink.append_line(&format!("\\label{{{}}}", label));
        }
        self.sink.append_line("\\end{table}");
    }

    // ---- scope bookkeeping ----

    fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        self.open.push(OpenScope { id, kind });
        id
    }

    fn scoped(&mut self, id: ScopeId) -> ScopeHandle<'_, Self, impl FnOnce(&mut Self)> {
        ScopeHandle::new(self, move |writer: &mut DocumentWriter| {
            writer.close_scope(id)
        })
    }

    /// Close a tracked scope; a scope already closed manually is skipped
    fn close_scope(&mut self, id: ScopeId) {
        let Some(pos) = self.open.iter().rposition(|scope| scope.id == id) else {
            log::debug!("Scope {:?} was already closed", id);
            return;
        };

        self.close_newer_than(pos);
        let scope = self.open.remove(pos);
        self.run_close(scope.kind);
    }

    /// Close every construct opened after the one at `pos`, innermost first
    fn close_newer_than(&mut self, pos: usize) {
        let newer = self.open.split_off(pos + 1);
        if newer.is_empty() {
            return;
        }
        log::warn!(
            "Closing {} construct(s) left open inside {}",
            newer.len(),
            self.open[pos].kind
        );
        for scope in newer.into_iter().rev() {
            self.run_close(scope.kind);
        }
    }

    fn run_close(&mut self, kind: ScopeKind) {
        log::debug!("Closing {}", kind);
        match kind {
            ScopeKind::Section => {
                if let Err(e) = self.level.ascend() {
                    log::warn!("Ignoring section close: {}", e);
                }
            }
            ScopeKind::Environment(name) => self.emit_end_environment(&name),
            ScopeKind::Table { caption, label } => {
                self.emit_end_table(caption.as_deref(), label.as_deref());
            }
        }
    }

    // ---- inspection ----

    /// Level the next section will open at
    pub fn current_level(&self) -> NestingLevel {
        self.level.current()
    }

    /// Raw section depth (0 = chapter), which may exceed the deepest level
    pub fn depth(&self) -> usize {
        self.level.depth()
    }

    /// Number of tracked constructs that are still open
    pub fn open_scope_count(&self) -> usize {
        self.open.len()
    }

    /// Text written so far, without finalization
    pub fn text(&self) -> &str {
        self.sink.as_str()
    }

    // ---- finalization ----

    /// Finalize the document
    ///
    /// Closes every construct still open, innermost first, then appends
    /// `\end{document}`.
    pub fn render(mut self) -> String {
        while let Some(scope) = self.open.pop() {
            log::warn!("Force-closing {} left open at render", scope.kind);
            self.run_close(scope.kind);
        }
        self.sink.ensure_newline();
        self.sink.append_line(END_DOCUMENT);
        self.sink.into_string()
    }

    /// Render the document and write it to `path`
    ///
    /// # Returns
    /// * `Ok(String)` - The rendered text that was written
    /// * `Err(WriterError::Io)` - The write failed; nothing is retried
    pub fn write_to_file(self, path: impl AsRef<Path>) -> Result<String, WriterError> {
        let path = path.as_ref();
        let text = self.render();
        fs::write(path, &text).map_err(|source| WriterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_scope_emits_and_restores_level() {
        let mut doc = DocumentWriter::new(NestingLevel::Section);
        {
            let mut intro = doc.section("Intro");
            assert_eq!(intro.current_level(), NestingLevel::Subsection);
            intro.write_line("Body.");
            {
                let mut detail = intro.section("Detail");
                detail.write_line("More.");
            }
            assert_eq!(intro.current_level(), NestingLevel::Subsection);
        }
        assert_eq!(doc.current_level(), NestingLevel::Section);
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(
            doc.text(),
            "\\section{Intro}\nBody.\n\\subsection{Detail}\nMore.\n"
        );
    }

    #[test]
    fn test_run_in_levels_get_hfill_and_blank_line() {
        let mut doc = DocumentWriter::new(NestingLevel::Paragraph);
        assert_eq!(doc.begin_section("P"), "paragraph");
        assert_eq!(doc.begin_section("SP"), "subparagraph");
        assert_eq!(
            doc.text(),
            "\\paragraph{P} \\hfill\n\n\\subparagraph{SP} \\hfill\n\n"
        );
    }

    #[test]
    fn test_deep_nesting_clamps_to_subparagraph() {
        let mut doc = DocumentWriter::new(NestingLevel::Section);
        let names: Vec<_> = (0..10)
            .map(|i| doc.begin_section(&format!("L{}", i)))
            .collect();
        assert_eq!(
            &names[..5],
            &["section", "subsection", "subsubsection", "paragraph", "subparagraph"]
        );
        assert!(names[5..].iter().all(|n| *n == "subparagraph"));
        assert!(doc.text().contains("\\subparagraph{L9} \\hfill"));

        for _ in 0..10 {
            doc.end_section().unwrap();
        }
        assert_eq!(doc.current_level(), NestingLevel::Section);
        assert_eq!(doc.open_scope_count(), 0);
    }

    #[test]
    fn test_end_section_underflow_is_an_error() {
        let mut doc = DocumentWriter::new(NestingLevel::Chapter);
        let err = doc.end_section().unwrap_err();
        assert!(matches!(err, WriterError::Level(LevelError::Underflow)));
        assert_eq!(doc.depth(), 0);
    }

    #[test]
    fn test_manual_end_inside_section_scope_is_not_doubled() {
        let mut doc = DocumentWriter::new(NestingLevel::Section);
        {
            let mut scope = doc.section("A");
            scope.end_section().unwrap();
        }
        assert_eq!(doc.current_level(), NestingLevel::Section);
    }

    #[test]
    fn test_environment_end_adds_missing_newline() {
        let mut doc = DocumentWriter::default();
        {
            let mut align = doc.environment("align*", None);
            align.write("a &= b");
        }
        {
            let mut cols = doc.environment("multicols", Some("{2}"));
            cols.write_line("text");
        }
        assert_eq!(
            doc.text(),
            "\\begin{align*}\na &= b\n\\end{align*}\n\\begin{multicols}{2}\ntext\n\\end{multicols}\n"
        );
    }

    #[test]
    fn test_itemize_items() {
        let mut doc = DocumentWriter::default();
        {
            let mut list = doc.itemize();
            list.item("one").write_line("");
            list.item("two");
        }
        assert_eq!(
            doc.text(),
            "\\begin{itemize}\n\\item one\n\\item two\n\\end{itemize}\n"
        );
    }

    #[test]
    fn test_manual_environment_pair() {
        let mut doc = DocumentWriter::default();
        doc.begin_environment("center", None);
        assert_eq!(doc.open_scope_count(), 1);
        doc.write_line("x").end_environment("center");
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(doc.text(), "\\begin{center}\nx\n\\end{center}\n");
    }

    #[test]
    fn test_table_scope_output_order() {
        let mut doc = DocumentWriter::default();
        {
            let mut table = doc.table(TableOptions::new("r|r|r").caption("Cap").label("tbl"));
            table.write_row(["1", "2", "3"]);
        }
        assert_eq!(
            doc.text(),
            "\\begin{table}[h]\n\\centering\n\\begin{tabular}{r|r|r}\n1 & 2 & 3 \\\\\n\\end{tabular}\n\\caption*{Cap}\n\\label{tbl}\n\\end{table}\n"
        );
    }

    #[test]
    fn test_table_without_centering_or_caption() {
        let mut doc = DocumentWriter::default();
        doc.begin_table(TableOptions::new("ll").layout("htbp").centered(false));
        doc.top_rule().write_row([1, 2]).bottom_rule().h_line();
        doc.end_table();
        assert_eq!(
            doc.text(),
            "\\begin{table}[htbp]\n\\begin{tabular}{ll}\n\\toprule\n1 & 2 \\\\\n\\bottomrule\n\\hline\n\\end{tabular}\n\\end{table}\n"
        );
    }

    #[test]
    fn test_command_groups() {
        let mut doc = DocumentWriter::default();
        doc.command("newpage", None, Some("ignored"), Some("ignored"));
        doc.command("textbf", Some("x"), None, None);
        doc.command("foo", Some("a"), Some("b"), Some("c"));
        doc.command("bar", Some("a"), None, Some("c"));
        doc.label("sec:intro");
        assert_eq!(
            doc.text(),
            "\\newpage\n\\textbf{x}\n\\foo{a}[b]{c}\n\\bar{a}{c}\n\\label{sec:intro}\n"
        );
    }

    #[test]
    fn test_render_closes_leftovers_innermost_first() {
        let mut doc = DocumentWriter::default();
        doc.begin_section("S");
        doc.begin_environment("itemize", None).item("a");
        doc.begin_table(TableOptions::new("ll").caption("C"));
        doc.write_row(["x", "y"]);

        let out = doc.render();
        assert_eq!(
            out,
            "\\section{S}\n\\begin{itemize}\n\\item a\n\\begin{table}[h]\n\\centering\n\\begin{tabular}{ll}\nx & y \\\\\n\\end{tabular}\n\\caption*{C}\n\\end{table}\n\\end{itemize}\n\\end{document}\n"
        );
    }

    #[test]
    fn test_scoped_environment_closes_manual_inner_first() {
        let mut doc = DocumentWriter::default();
        {
            let mut center = doc.environment("center", None);
            center.begin_environment("itemize", None).item("x");
        }
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(
            doc.render(),
            "\\begin{center}\n\\begin{itemize}\n\\item x\n\\end{itemize}\n\\end{center}\n\\end{document}\n"
        );
    }

    #[test]
    fn test_scoped_table_closes_manual_inner_first() {
        let mut doc = DocumentWriter::default();
        {
            let mut table = doc.table(TableOptions::new("l"));
            table.begin_environment("minipage", Some("{1in}"));
        }
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(
            doc.render(),
            "\\begin{table}[h]\n\\centering\n\\begin{tabular}{l}\n\\begin{minipage}{1in}\n\\end{minipage}\n\\end{tabular}\n\\end{table}\n\\end{document}\n"
        );
    }

    #[test]
    fn test_manual_end_environment_closes_inner_first() {
        let mut doc = DocumentWriter::default();
        doc.begin_environment("outer", None);
        doc.begin_environment("inner", None);
        doc.end_environment("outer");
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(
            doc.text(),
            "\\begin{outer}\n\\begin{inner}\n\\end{inner}\n\\end{outer}\n"
        );
    }

    #[test]
    fn test_manual_end_table_closes_inner_first() {
        let mut doc = DocumentWriter::default();
        doc.begin_table(TableOptions::new("l").centered(false));
        doc.begin_environment("minipage", Some("{1in}"));
        doc.end_table();
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(
            doc.text(),
            "\\begin{table}[h]\n\\begin{tabular}{l}\n\\begin{minipage}{1in}\n\\end{minipage}\n\\end{tabular}\n\\end{table}\n"
        );
    }

    #[test]
    fn test_end_section_closes_environments_inside_it() {
        let mut doc = DocumentWriter::default();
        doc.begin_section("S");
        doc.begin_environment("quote", None);
        doc.end_section().unwrap();
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(doc.current_level(), NestingLevel::Section);
        assert_eq!(doc.text(), "\\section{S}\n\\begin{quote}\n\\end{quote}\n");
    }

    #[test]
    fn test_section_scope_closes_inner_sections_and_environments() {
        let mut doc = DocumentWriter::default();
        {
            let mut outer = doc.section("Outer");
            outer.begin_section("Inner");
            outer.begin_environment("quote", None);
        }
        assert_eq!(doc.open_scope_count(), 0);
        assert_eq!(doc.current_level(), NestingLevel::Section);
        assert!(doc.text().ends_with("\\begin{quote}\n\\end{quote}\n"));
    }

    #[test]
    fn test_render_closes_leaked_handle() {
        let mut doc = DocumentWriter::default();
        std::mem::forget(doc.itemize());
        let out = doc.render();
        assert!(out.ends_with("\\begin{itemize}\n\\end{itemize}\n\\end{document}\n"));
    }

    #[test]
    fn test_render_empty_document() {
        let out = DocumentWriter::default().render();
        assert_eq!(out, "\\end{document}\n");
        assert_eq!(out.matches(END_DOCUMENT).count(), 1);
    }

    #[test]
    fn test_insert_at_bookmark() {
        let mut doc = DocumentWriter::default();
        let mark = doc.bookmark();
        doc.write_line("body");
        doc.insert_at(mark, "\\maketitle\n").unwrap();
        assert_eq!(doc.text(), "\\maketitle\nbody\n");

        let err = doc.insert_at(Bookmark::at(999), "x").unwrap_err();
        assert!(matches!(
            err,
            WriterError::Sink(SinkError::BookmarkOutOfRange { position: 999, .. })
        ));
    }

    #[test]
    fn test_explicit_close_then_drop() {
        let mut doc = DocumentWriter::default();
        {
            let mut env = doc.environment("quote", None);
            env.write_line("q");
            env.close();
            env.close();
            env.write_line("after");
        }
        assert_eq!(doc.text(), "\\begin{quote}\nq\n\\end{quote}\nafter\n");
    }
}
