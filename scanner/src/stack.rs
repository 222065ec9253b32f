//! Technology stack detection.
//!
//! Detection is substring matching against one lower-cased rendering of the
//! whole import set, so an import such as `nextra` also reads as `next`.
//! That imprecision is accepted.

use std::collections::{BTreeMap, BTreeSet};

use recall_protocol::{FileRecord, Stack};

/// Infer the stack from project-wide imports, extension counts and files.
pub fn detect_stack(
    imports: &BTreeSet<String>,
    by_extension: &BTreeMap<String, usize>,
    files: &[FileRecord],
) -> Stack {
    let rendered = imports
        .iter()
        .map(|import| import.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");
    let mentions = |needle: &str| rendered.contains(needle);
    let any_path = |needle: &str| {
        files
            .iter()
            .any(|file| file.path.to_lowercase().contains(needle))
    };

    let mut stack = Stack::default();

    if mentions("react") || any_path(".tsx") {
        stack.frontend = Some("React".to_string());

        if mentions("next") || any_path("pages/") {
            stack.framework = Some("Next.js".to_string());
        }
        if mentions("tailwindcss") || any_path("tailwind") {
            stack.styling = Some("Tailwind CSS".to_string());
        }
    }

    if mentions("express") {
        stack.backend = Some("Express".to_string());
    }
    if mentions("supabase") {
        stack.database = Some("Supabase".to_string());
    }
    if mentions("prisma") {
        stack.orm = Some("Prisma".to_string());
    }

    let count = |ext: &str| by_extension.get(ext).copied().unwrap_or(0);
    if count(".ts") + count(".tsx") > 0 {
        stack.language = Some("TypeScript".to_string());
    } else if count(".py") > 0 {
        stack.language = Some("Python".to_string());
    }

    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn extensions(items: &[(&str, usize)]) -> BTreeMap<String, usize> {
        items.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    fn file(path: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            lines: 1,
            functions: Vec::new(),
            classes: Vec::new(),
            purpose: "Code".to_string(),
        }
    }

    #[test]
    fn test_next_app_with_supabase() {
        let imports = set(&["react", "next/router", "@supabase/supabase-js", "tailwindcss"]);
        let stack = detect_stack(
            &imports,
            &extensions(&[(".tsx", 3), (".ts", 1)]),
            &[file("pages/index.tsx")],
        );

        assert_eq!(
            stack.entries(),
            vec![
                ("frontend", "React"),
                ("framework", "Next.js"),
                ("database", "Supabase"),
                ("styling", "Tailwind CSS"),
                ("language", "TypeScript"),
            ]
        );
    }

    #[test]
    fn test_styling_requires_frontend() {
        let stack = detect_stack(
            &set(&["tailwindcss", "express", "prisma"]),
            &extensions(&[(".js", 2)]),
            &[file("server.js")],
        );

        assert_eq!(stack.styling, None);
        assert_eq!(stack.backend.as_deref(), Some("Express"));
        assert_eq!(stack.orm.as_deref(), Some("Prisma"));
        assert_eq!(stack.language, None);
    }

    #[test]
    fn test_python_language() {
        let stack = detect_stack(&set(&["os"]), &extensions(&[(".py", 4)]), &[file("main.py")]);
        assert_eq!(stack.language.as_deref(), Some("Python"));
        assert!(stack.frontend.is_none());
    }
}
