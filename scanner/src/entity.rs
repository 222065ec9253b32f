//! Fact extraction from source comments using pattern matching.
//!
//! Pulls to-do items, notes, decisions and warnings out of line comments,
//! plus short docstrings and doc comments as descriptions.

use recall_protocol::{Entities, EntityCategory};
use regex_lite::Regex;
use tracing::warn;

use crate::config::FileKind;

/// Blocks this long or longer are treated as boilerplate and ignored.
const MAX_DESCRIPTION_CHARS: usize = 200;

/// Single-line markers introduced by `//` or `#`.
const MARKER_PATTERNS: &[(&str, EntityCategory)] = &[
    (r"(?i)(?://|#)\s*TODO[:\s]+(.+?)(?:\n|$)", EntityCategory::Todo),
    (r"(?i)(?://|#)\s*NOTE[:\s]+(.+?)(?:\n|$)", EntityCategory::Note),
    (
        r"(?i)(?://|#)\s*(?:FIXME|WARN(?:ING)?)[:\s]+(.+?)(?:\n|$)",
        EntityCategory::Warning,
    ),
    (
        r"(?i)(?://|#)\s*DECISION[:\s]+(.+?)(?:\n|$)",
        EntityCategory::Decision,
    ),
];

const DOCSTRING_PATTERN: &str = r#""""([^"]+)""""#;
const DOC_COMMENT_PATTERN: &str = r"/\*\*\s*\n?\s*\*?\s*([^*]+)\s*\*/";

/// Entity extractor using pattern matching.
///
/// Patterns are compiled once; a pattern that fails to compile is logged and
/// skipped rather than failing construction.
pub struct EntityExtractor {
    markers: Vec<(Regex, EntityCategory)>,
    docstring: Option<Regex>,
    doc_comment: Option<Regex>,
}

impl EntityExtractor {
    /// Create a new entity extractor.
    pub fn new() -> Self {
        let markers = MARKER_PATTERNS
            .iter()
            .filter_map(|(pattern, category)| compile(pattern).map(|re| (re, *category)))
            .collect();

        Self {
            markers,
            docstring: compile(DOCSTRING_PATTERN),
            doc_comment: compile(DOC_COMMENT_PATTERN),
        }
    }

    /// Extract facts from the text of one file.
    ///
    /// Every match is kept, duplicates included, in order of appearance.
    pub fn extract(&self, content: &str, kind: FileKind) -> Entities {
        let mut entities = Entities::default();

        for (re, category) in &self.markers {
            for cap in re.captures_iter(content) {
                if let Some(text) = cap.get(1) {
                    entities.push(*category, text.as_str().trim());
                }
            }
        }

        match kind {
            FileKind::Python => self.extract_docstrings(content, &mut entities),
            FileKind::Script => self.extract_doc_comments(content, &mut entities),
            FileKind::Other => {}
        }

        entities
    }

    fn extract_docstrings(&self, content: &str, entities: &mut Entities) {
        let Some(re) = &self.docstring else {
            return;
        };

        for cap in re.captures_iter(content) {
            let Some(block) = cap.get(1).and_then(|m| short_block(m.as_str())) else {
                continue;
            };
            let first = block.lines().next().unwrap_or_default().trim_end();
            if !first.is_empty() {
                entities.push(EntityCategory::Description, first);
            }
        }
    }

    fn extract_doc_comments(&self, content: &str, entities: &mut Entities) {
        let Some(re) = &self.doc_comment else {
            return;
        };

        for cap in re.captures_iter(content) {
            let Some(block) = cap.get(1).and_then(|m| short_block(m.as_str())) else {
                continue;
            };
            let first = block.lines().next().unwrap_or_default().trim();
            // Tag-only comments such as `/** @type {Foo} */` carry no prose.
            if !first.is_empty() && !first.starts_with('@') {
                entities.push(EntityCategory::Description, first);
            }
        }
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// The trimmed block, if it is short enough to be a description.
fn short_block(raw: &str) -> Option<&str> {
    let block = raw.trim();
    (block.chars().count() < MAX_DESCRIPTION_CHARS).then_some(block)
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping invalid entity pattern {pattern:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_markers() {
        let extractor = EntityExtractor::new();
        let content = "\
// TODO: add pagination
# note: cache is per-process
// FIXME broken on windows
x = 1  # todo: add pagination
// WARNING: slow path
// Decision: use BM25 over embeddings
";
        let entities = extractor.extract(content, FileKind::Other);

        assert_eq!(entities.todos, vec!["add pagination", "add pagination"]);
        assert_eq!(entities.notes, vec!["cache is per-process"]);
        assert_eq!(entities.warnings, vec!["broken on windows", "slow path"]);
        assert_eq!(entities.decisions, vec!["use BM25 over embeddings"]);
        assert!(entities.descriptions.is_empty());
    }

    #[test]
    fn test_python_docstrings() {
        let extractor = EntityExtractor::new();
        let long = "x".repeat(250);
        let content = format!(
            "\"\"\"Load user sessions.\n\nMore detail here.\n\"\"\"\n\ndef f():\n    \"\"\"{long}\"\"\"\n"
        );
        let entities = extractor.extract(&content, FileKind::Python);

        assert_eq!(entities.descriptions, vec!["Load user sessions."]);
    }

    #[test]
    fn test_script_doc_comments() {
        let extractor = EntityExtractor::new();
        let content = "\
/**
 * Fetches the current user.
 */
export function getUser() {}

/** @deprecated */
export function old() {}
";
        let entities = extractor.extract(content, FileKind::Script);

        assert_eq!(entities.descriptions, vec!["Fetches the current user."]);
    }

    #[test]
    fn test_doc_comments_ignored_for_other_kinds() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("/** Styles for the header */", FileKind::Other);
        assert!(entities.is_empty());
    }
}
