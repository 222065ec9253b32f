//! Function, class and import extraction.
//!
//! Python is parsed with tree-sitter. JavaScript and TypeScript go through
//! pattern heuristics that miss methods, default-exported arrows and
//! multi-line imports, and may report components as functions too. Imports
//! found by the heuristics are the raw specifier (`./lib/db`, `react-dom`),
//! whereas Python imports are reduced to their top-level module.

use std::collections::VecDeque;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

use crate::config::FileKind;

const FUNCTION_PATTERNS: &[&str] = &[
    r"(?:export\s+)?(?:async\s+)?function\s+(\w+)",
    r"(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s*)?\([^)]*\)\s*=>",
];
const COMPONENT_PATTERN: &str = r"(?:export\s+)?(?:default\s+)?(?:const|function)\s+([A-Z]\w+)";
const IMPORT_PATTERN: &str = r#"import\s+.*?from\s+['"]([^'"]+)['"]"#;

/// A named definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,

    /// 1-based source line, or 0 when found by a heuristic.
    pub line: usize,
}

impl Symbol {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// Definitions and imports found in one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeStructure {
    pub functions: Vec<Symbol>,
    pub classes: Vec<Symbol>,
    pub imports: Vec<String>,
}

impl CodeStructure {
    /// Function names in extraction order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|s| s.name.as_str())
    }

    /// Class names in extraction order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|s| s.name.as_str())
    }
}

/// Extracts [`CodeStructure`] from file text.
pub struct StructureExtractor {
    functions: Vec<Regex>,
    components: Option<Regex>,
    imports: Option<Regex>,
}

impl StructureExtractor {
    pub fn new() -> Self {
        Self {
            functions: FUNCTION_PATTERNS.iter().filter_map(|p| compile(p)).collect(),
            components: compile(COMPONENT_PATTERN),
            imports: compile(IMPORT_PATTERN),
        }
    }

    /// Extract structure according to the file kind.
    ///
    /// Never fails: unparsable Python and unsupported kinds yield an empty
    /// structure.
    pub fn extract(&self, content: &str, kind: FileKind) -> CodeStructure {
        match kind {
            FileKind::Python => extract_python(content),
            FileKind::Script => self.extract_script(content),
            FileKind::Other => CodeStructure::default(),
        }
    }

    fn extract_script(&self, content: &str) -> CodeStructure {
        let mut structure = CodeStructure::default();

        for re in &self.functions {
            structure.functions.extend(captures(re, content));
        }
        if let Some(re) = &self.components {
            structure.classes.extend(captures(re, content));
        }
        if let Some(re) = &self.imports {
            structure
                .imports
                .extend(captures(re, content).map(|symbol| symbol.name));
        }

        structure
    }
}

impl Default for StructureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn captures<'a>(re: &'a Regex, content: &'a str) -> impl Iterator<Item = Symbol> + 'a {
    re.captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| Symbol::new(m.as_str(), 0)))
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping invalid structure pattern {pattern:?}: {e}");
            None
        }
    }
}

/// Walk the syntax tree breadth-first, so outer definitions come before the
/// ones nested inside them.
fn extract_python(content: &str) -> CodeStructure {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
        warn!("Failed to load Python grammar: {e}");
        return CodeStructure::default();
    }
    let Some(tree) = parser.parse(content, None) else {
        debug!("Python parse returned no tree");
        return CodeStructure::default();
    };

    let root = tree.root_node();
    if root.has_error() {
        debug!("Python source has syntax errors; skipping structure");
        return CodeStructure::default();
    }

    let source = content.as_bytes();
    let mut structure = CodeStructure::default();
    let mut queue = VecDeque::from([root]);

    while let Some(node) = queue.pop_front() {
        match node.kind() {
            "function_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    structure.functions.push(Symbol::new(name, line_of(node)));
                }
            }
            "class_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    structure.classes.push(Symbol::new(name, line_of(node)));
                }
            }
            "import_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let dotted = if name.kind() == "aliased_import" {
                        name.child_by_field_name("name")
                    } else {
                        Some(name)
                    };
                    if let Some(text) = dotted.and_then(|n| n.utf8_text(source).ok()) {
                        structure.imports.push(top_level(text));
                    }
                }
            }
            "import_from_statement" => {
                if let Some(module) = from_module(node, source) {
                    structure.imports.push(top_level(module));
                }
            }
            "future_import_statement" => structure.imports.push("__future__".to_string()),
            _ => {}
        }

        let mut cursor = node.walk();
        queue.extend(node.named_children(&mut cursor));
    }

    structure
}

/// Module of a `from … import …` statement. A bare relative import
/// (`from . import x`) names no module.
fn from_module<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    let module = node.child_by_field_name("module_name")?;
    let dotted = if module.kind() == "relative_import" {
        let mut cursor = module.walk();
        let found = module
            .named_children(&mut cursor)
            .find(|child| child.kind() == "dotted_name");
        found?
    } else {
        module
    };
    dotted.utf8_text(source).ok()
}

fn field_text<'a>(node: Node, field: &str, source: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name(field)?.utf8_text(source).ok()
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn top_level(module: &str) -> String {
    module.split('.').next().unwrap_or(module).trim().to_string()
}
