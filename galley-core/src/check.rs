//! Markup checking: the validations that gate a build.
//!
//! The markdown parser itself never rejects input (an unterminated fence just
//! swallows the rest of the file), so the problems a build must refuse to
//! ship are caught here, before any page is rendered.

use crate::frontmatter::{body_line_offset, parse_frontmatter, FrontmatterError};
use crate::models::{Diagnostic, DiagnosticSeverity, Document};

/// Run every per-document check across the tree.
pub fn check_documents(documents: &[Document]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for doc in documents {
        diagnostics.extend(check_document(doc));
    }
    diagnostics
}

/// Check a single document: frontmatter, dates, code fences.
pub fn check_document(doc: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    match parse_frontmatter(&doc.text) {
        Ok((frontmatter, body)) => {
            if let Some(date) = &frontmatter.date {
                if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                    diagnostics.push(Diagnostic::warning(
                        "date.invalid",
                        format!("date '{}' is not in %Y-%m-%d form and will be ignored", date),
                        &doc.source_path,
                        None,
                    ));
                }
            }

            let offset = body_line_offset(&doc.text);
            diagnostics.extend(scan_fences(&body, offset, &doc.source_path));
        }
        Err(FrontmatterError::YamlError(err)) => {
            // serde_yaml reports lines relative to the YAML block; the
            // opening "---" sits on file line 1
            let line = err.location().map(|loc| loc.line() + 1);
            diagnostics.push(Diagnostic::error(
                "frontmatter.invalid",
                format!("invalid frontmatter YAML: {}", err),
                &doc.source_path,
                line,
            ));
        }
    }

    diagnostics
}

/// Whether any diagnostic is severe enough to fail a build.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics
        .iter()
        .any(|d| d.severity == DiagnosticSeverity::Error)
}

struct OpenFence {
    marker: char,
    len: usize,
    /// One-based line in the source file, frontmatter included
    line: usize,
}

/// Scan a markdown body for fenced code blocks left open at end of file.
///
/// Line-based CommonMark subset: an opener is three or more backticks or
/// tildes indented at most three spaces (backtick info strings may not
/// contain a backtick); the closer repeats the same character at least the
/// opener's length with nothing but whitespace after it.
fn scan_fences(body: &str, line_offset: usize, path: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut open: Option<OpenFence> = None;

    for (idx, raw_line) in body.lines().enumerate() {
        let file_line = line_offset + idx + 1;

        let Some(line) = strip_fence_indent(raw_line) else {
            // Four or more spaces of indent: indented code, never a fence
            continue;
        };

        match &open {
            None => {
                if let Some((marker, len, info)) = parse_fence_opener(line) {
                    if marker == '~' || !info.contains('`') {
                        open = Some(OpenFence {
                            marker,
                            len,
                            line: file_line,
                        });
                    }
                }
            }
            Some(fence) => {
                if is_fence_closer(line, fence.marker, fence.len) {
                    open = None;
                }
            }
        }
    }

    if let Some(fence) = open {
        diagnostics.push(Diagnostic::error(
            "fence.unterminated",
            format!(
                "code fence ({}) opened here is never closed",
                String::from(fence.marker).repeat(fence.len)
            ),
            path,
            Some(fence.line),
        ));
    }

    diagnostics
}

/// Strip up to three leading spaces; a deeper indent disqualifies the line.
fn strip_fence_indent(line: &str) -> Option<&str> {
    let mut spaces = 0;
    for c in line.chars() {
        match c {
            ' ' if spaces < 3 => spaces += 1,
            ' ' | '\t' => return None,
            _ => break,
        }
    }
    Some(&line[spaces..])
}

fn parse_fence_opener(line: &str) -> Option<(char, usize, &str)> {
    let marker = match line.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return None,
    };
    let len = line.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    Some((marker, len, &line[len..]))
}

fn is_fence_closer(line: &str, marker: char, open_len: usize) -> bool {
    let len = line.chars().take_while(|&c| c == marker).count();
    len >= open_len && line[len..].trim().is_empty()
}
