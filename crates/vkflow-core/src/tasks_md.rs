//! Extraction of task records from a change's `tasks.md`.
//!
//! Two layouts are recognised:
//!
//! - `## Task: <title>` sections, where everything up to the next such
//!   heading is the task description.
//! - Unchecked checkbox items (`- [ ] title`), used only when the document
//!   has no `## Task:` headings at all.
//!
//! Fenced code blocks never contribute structure. A heading or checkbox
//! inside a fence is plain text, but the fence itself is kept verbatim in
//! whatever description contains it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
}

impl TaskRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

static HEADING_RE: OnceLock<Regex> = OnceLock::new();
static CHECKBOX_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| Regex::new(r"^##[ \t]+Task:(?:[ \t]+(.*))?$").unwrap())
}

fn checkbox_re() -> &'static Regex {
    CHECKBOX_RE.get_or_init(|| Regex::new(r"^\s*[-*]\s+\[\s\]\s+(.+)$").unwrap())
}

/// Parse `document` into task records, in document order.
///
/// An empty result means the document has nothing importable; deciding
/// whether that is an error is up to the caller.
pub fn extract(document: &str) -> Vec<TaskRecord> {
    let text = normalize_newlines(document);
    let lines: Vec<&str> = text.split('\n').collect();
    let structural = structural_lines(&lines);

    let headings: Vec<(usize, String)> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| structural[*i])
        .filter_map(|(i, line)| heading_title(line).map(|title| (i, title)))
        .collect();

    if !headings.is_empty() {
        return sections(&lines, &structural, &headings);
    }

    checkbox_items(&lines, &structural)
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn heading_title(line: &str) -> Option<String> {
    let caps = heading_re().captures(line)?;
    Some(
        caps.get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    )
}

fn sections(lines: &[&str], structural: &[bool], headings: &[(usize, String)]) -> Vec<TaskRecord> {
    headings
        .iter()
        .enumerate()
        .map(|(k, (start, title))| {
            let end = headings.get(k + 1).map(|(i, _)| *i).unwrap_or(lines.len());
            let description = section_body(lines, structural, start + 1, end);
            TaskRecord::new(title.clone(), description)
        })
        .collect()
}

/// Body of a section spanning `lines[from..to]`, without trailing `---`
/// separators and trimmed of surrounding whitespace.
fn section_body(lines: &[&str], structural: &[bool], from: usize, to: usize) -> String {
    let mut first = from;
    while first < to && lines[first].trim().is_empty() {
        first += 1;
    }

    let mut last = to;
    while last > first {
        let idx = last - 1;
        let line = lines[idx];
        if line.trim().is_empty() || (structural[idx] && is_thematic_break(line)) {
            last -= 1;
        } else {
            break;
        }
    }

    lines[first..last].join("\n").trim().to_string()
}

fn is_thematic_break(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(marker) = trimmed.chars().next() else {
        return false;
    };
    if !matches!(marker, '-' | '*' | '_') {
        return false;
    }
    let mut count = 0;
    for c in trimmed.chars() {
        if c == marker {
            count += 1;
        } else if !c.is_whitespace() {
            return false;
        }
    }
    count >= 3
}

fn checkbox_items(lines: &[&str], structural: &[bool]) -> Vec<TaskRecord> {
    lines
        .iter()
        .enumerate()
        .filter(|(i, _)| structural[*i])
        .filter_map(|(_, line)| checkbox_re().captures(line))
        .filter_map(|caps| caps.get(1).map(|m| TaskRecord::new(m.as_str().trim(), "")))
        .collect()
}

// ---------------------------------------------------------------------------
// Fence tracking
// ---------------------------------------------------------------------------

struct Fence {
    marker: char,
    len: usize,
}

/// A run of three or more backticks or tildes at the start of a line,
/// returned with the text that follows it.
fn fence_run(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }
    Some((marker, len, &trimmed[len..]))
}

/// For each line, whether it may carry document structure: false for fence
/// delimiters and everything between them.
fn structural_lines(lines: &[&str]) -> Vec<bool> {
    let mut open: Option<Fence> = None;
    let mut flags = Vec::with_capacity(lines.len());

    for line in lines {
        match &open {
            None => match fence_run(line) {
                Some((marker, len, _)) => {
                    open = Some(Fence { marker, len });
                    flags.push(false);
                }
                None => flags.push(true),
            },
            Some(fence) => {
                if let Some((marker, len, rest)) = fence_run(line) {
                    if marker == fence.marker && len >= fence.len && rest.trim().is_empty() {
                        open = None;
                    }
                }
                flags.push(false);
            }
        }
    }

    flags
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
