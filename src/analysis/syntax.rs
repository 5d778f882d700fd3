//! Comment syntax per language family
//!
//! A read-only table keyed by a normalized language label. Labels that do
//! not belong to a known family fall back to C-style comments.

/// Comment markers for one language family.
///
/// `multi_end[i]` closes a span opened by `multi_start[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub single: &'static [&'static str],
    pub multi_start: &'static [&'static str],
    pub multi_end: &'static [&'static str],
}

impl CommentSyntax {
    /// Start/end marker pairs in registry order.
    pub fn multi_pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.multi_start
            .iter()
            .copied()
            .zip(self.multi_end.iter().copied())
    }
}

const C_STYLE: CommentSyntax = CommentSyntax {
    single: &["//"],
    multi_start: &["/*"],
    multi_end: &["*/"],
};

const PYTHON: CommentSyntax = CommentSyntax {
    single: &["#"],
    multi_start: &["\"\"\"", "'''"],
    multi_end: &["\"\"\"", "'''"],
};

const RUBY: CommentSyntax = CommentSyntax {
    single: &["#"],
    multi_start: &["=begin"],
    multi_end: &["=end"],
};

const MARKUP: CommentSyntax = CommentSyntax {
    single: &[],
    multi_start: &["<!--"],
    multi_end: &["-->"],
};

const SHELL: CommentSyntax = CommentSyntax {
    single: &["#"],
    multi_start: &[],
    multi_end: &[],
};

const SQL: CommentSyntax = CommentSyntax {
    single: &["--"],
    multi_start: &["/*"],
    multi_end: &["*/"],
};

const LUA: CommentSyntax = CommentSyntax {
    single: &["--"],
    multi_start: &["--[["],
    multi_end: &["]]"],
};

/// Look up the comment syntax for a language label (case-insensitive).
pub fn comment_syntax(language: &str) -> &'static CommentSyntax {
    match language.to_lowercase().as_str() {
        "python" => &PYTHON,
        "ruby" => &RUBY,
        "html" | "xml" | "markdown" => &MARKUP,
        "shell" | "bash" | "yaml" | "dockerfile" => &SHELL,
        "sql" => &SQL,
        "lua" => &LUA,
        _ => &C_STYLE,
    }
}
