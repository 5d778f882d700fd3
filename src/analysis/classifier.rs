//! Line classifier
//!
//! Decides, line by line, whether a line is code, comment or blank using
//! only the comment markers from [`super::syntax`]. This is a heuristic and
//! not a lexer:
//!
//! - Markers inside string literals count as real comment delimiters.
//! - Whether a multi-line comment stays open is decided by comparing the
//!   first positions of the start and end markers on the opening line, so
//!   `/* a */ code /* b` is treated as closed.
//! - Nested multi-line comments are not tracked.

use super::syntax::{comment_syntax, CommentSyntax};
use super::trim_line;
use crate::models::ParseResult;

/// Carried between lines: the end marker of the open multi-line comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    #[default]
    Code,
    InComment(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Code,
    Comment,
    Blank,
}

/// Classify every line of `content` for the given language label.
///
/// `total` is the number of `\n`-separated segments, so a trailing newline
/// adds one blank line and empty content counts as a single blank line.
pub fn classify(content: &str, language: &str) -> ParseResult {
    let syntax = comment_syntax(language);
    let mut result = ParseResult::default();
    let mut state = State::default();

    for line in content.split('\n') {
        let (kind, next) = classify_line(trim_line(line), state, syntax);
        state = next;
        match kind {
            LineKind::Code => result.code += 1,
            LineKind::Comment => result.comments += 1,
            LineKind::Blank => result.blank += 1,
        }
        result.total += 1;
    }

    result
}

fn classify_line(
    trimmed: &str,
    state: State,
    syntax: &'static CommentSyntax,
) -> (LineKind, State) {
    if trimmed.is_empty() {
        return (LineKind::Blank, state);
    }

    if let State::InComment(end) = state {
        let next = if trimmed.contains(end) {
            State::Code
        } else {
            state
        };
        return (LineKind::Comment, next);
    }

    if syntax.single.iter().any(|marker| trimmed.starts_with(marker)) {
        return (LineKind::Comment, State::Code);
    }

    for (start, end) in syntax.multi_pairs() {
        let Some(start_at) = trimmed.find(start) else {
            continue;
        };
        // The end marker may share characters with the start marker
        // (Python's `"""`), so its first occurrence can be the opener itself.
        let stays_open = match trimmed.find(end) {
            None => true,
            Some(end_at) => start_at > end_at,
        };
        let next = if stays_open {
            State::InComment(end)
        } else {
            State::Code
        };
        return (LineKind::Comment, next);
    }

    (LineKind::Code, State::Code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(content: &str, language: &str) -> (usize, usize, usize, usize) {
        let r = classify(content, language);
        (r.code, r.comments, r.blank, r.total)
    }

    #[test]
    fn test_empty_content_is_one_blank_line() {
        assert_eq!(counts("", "Rust"), (0, 0, 1, 1));
    }

    #[test]
    fn test_c_style_mixed_file() {
        let content = "// hello\ncode();\n\n/* multi\nline */\nmore();";
        assert_eq!(counts(content, "JavaScript"), (2, 3, 1, 6));
    }

    #[test]
    fn test_python_docstring_spanning_lines() {
        // Line 1 holds only the opener; line 2 holds the closer, which is
        // also a start marker, so it is counted as a comment too.
        let content = "\"\"\"doc\nstring\"\"\"\nx = 1";
        assert_eq!(counts(content, "Python"), (1, 2, 0, 3));
    }

    #[test]
    fn test_trailing_newline_counts_as_blank_segment() {
        assert_eq!(counts("fn main() {}\n", "Rust"), (1, 0, 1, 2));
    }

    #[test]
    fn test_single_line_block_comment_does_not_open_span() {
        let content = "/* one liner */\ncode();";
        assert_eq!(counts(content, "C"), (1, 1, 0, 2));
    }

    #[test]
    fn test_inline_block_comment_after_code_opens_span() {
        let content = "x = 1; /* start\nstill comment\nend */\ny = 2;";
        assert_eq!(counts(content, "C"), (1, 3, 0, 4));
    }

    #[test]
    fn test_end_before_start_keeps_span_open() {
        // `*/` precedes `/*` on the line, so the heuristic treats it as open.
        let content = "*/ x /* open\ninside\n*/\ncode();";
        assert_eq!(counts(content, "C"), (1, 3, 0, 4));
    }

    #[test]
    fn test_same_line_open_close_then_reopen_is_treated_as_closed() {
        let content = "/* a */ code /* b\nnext();";
        assert_eq!(counts(content, "C"), (1, 1, 0, 2));
    }

    #[test]
    fn test_markers_inside_strings_are_not_special_cased() {
        let content = "let url = \"http://example.com\";\nlet s = \"/* not a comment\";\ncode();";
        // Line 1 is code: it contains `//` but does not start with it.
        // Line 2 opens a span that swallows line 3.
        assert_eq!(counts(content, "Rust"), (1, 2, 0, 3));
    }

    #[test]
    fn test_shell_has_no_multiline() {
        let content = "#!/bin/bash\n# comment\necho hi\n\n/* not special */";
        assert_eq!(counts(content, "Shell"), (2, 2, 1, 5));
    }

    #[test]
    fn test_markup_comments() {
        let content = "# Title\n<!-- note -->\n<!--\nhidden\n-->\ntext";
        // Markdown has no single-line marker, so `# Title` is code.
        assert_eq!(counts(content, "Markdown"), (2, 4, 0, 6));
    }

    #[test]
    fn test_ruby_begin_end() {
        let content = "=begin\ndocs\n=end\nputs 1\n# note";
        assert_eq!(counts(content, "Ruby"), (1, 4, 0, 5));
    }

    #[test]
    fn test_lua_block_opener_hits_single_line_marker_first() {
        // `--[[` starts with `--`, so the single-line rule wins and the block
        // body is counted as code.
        let content = "--[[ block\nstill\n]]\nprint(1)\n-- line";
        assert_eq!(counts(content, "Lua"), (3, 2, 0, 5));
    }

    #[test]
    fn test_sql_comments() {
        let content = "-- header\nSELECT 1;\n/* a\nb */";
        assert_eq!(counts(content, "SQL"), (1, 3, 0, 4));
    }

    #[test]
    fn test_blank_lines_inside_comment_stay_blank() {
        let content = "/*\n\n*/";
        assert_eq!(counts(content, "C"), (0, 2, 1, 3));
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        let content = "// c\r\ncode();\r\n\r\n";
        assert_eq!(counts(content, "C"), (1, 1, 2, 4));
    }

    #[test]
    fn test_bom_prefixed_first_line() {
        assert_eq!(counts("\u{feff}// header\ncode();", "C#"), (1, 1, 0, 2));
        assert_eq!(counts("\u{feff}", "JavaScript"), (0, 0, 1, 1));
    }

    #[test]
    fn test_sum_of_kinds_equals_total() {
        let samples = [
            ("", "Rust"),
            ("a\n\n// b\n/* c\n d */\n", "Go"),
            ("'''x\ny'''\n\n#z", "Python"),
            ("<!-- a\nb -->", "HTML"),
        ];
        for (content, lang) in samples {
            let r = classify(content, lang);
            assert_eq!(r.code + r.comments + r.blank, r.total, "{lang}: {content:?}");
            assert_eq!(r.total, content.split('\n').count());
        }
    }
}
