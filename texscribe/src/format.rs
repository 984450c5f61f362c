//! String formatting helpers
//!
//! Stateless transforms that produce inline LaTeX fragments. They are
//! available as free functions and through the [`TexStrExt`] extension trait.

/// Wrap `value` in inline math delimiters: `$value$`
pub fn math(value: &str) -> String {
    format!("${}$", value)
}

/// Wrap `value` in display math delimiters: `\[ value \]`
pub fn display_math(value: &str) -> String {
    format!("\\[ {} \\]", value)
}

/// Reference command for `label`: `\ref{label}`
pub fn reference(label: &str) -> String {
    format!("\\ref{{{}}}", label)
}

/// Escape characters that have special meaning in LaTeX text mode
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(ch),
        }
    }
    out
}

/// Extension methods for building LaTeX fragments from string slices
pub trait TexStrExt {
    fn math(&self) -> String;
    fn display_math(&self) -> String;
    fn reference(&self) -> String;
    fn tex_escape(&self) -> String;
}

impl TexStrExt for str {
    fn math(&self) -> String {
        math(self)
    }

    fn display_math(&self) -> String {
        display_math(self)
    }

    fn reference(&self) -> String {
        reference(self)
    }

    fn tex_escape(&self) -> String {
        escape(self)
    }
}
