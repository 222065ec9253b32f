//! Detected technology stack.

use serde::{Deserialize, Serialize};

/// Detected technologies by category.
///
/// A category that was not detected is absent from the serialized form
/// rather than written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Stack {
    /// Detected `(category, technology)` pairs in detection order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("frontend", &self.frontend),
            ("framework", &self.framework),
            ("backend", &self.backend),
            ("database", &self.database),
            ("orm", &self.orm),
            ("styling", &self.styling),
            ("language", &self.language),
        ]
        .into_iter()
        .filter_map(|(category, value)| value.as_deref().map(|v| (category, v)))
        .collect()
    }

    /// Whether nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_undetected_categories_are_omitted() {
        let stack = Stack {
            frontend: Some("React".to_string()),
            language: Some("TypeScript".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&stack).unwrap();
        assert_eq!(json, r#"{"frontend":"React","language":"TypeScript"}"#);
        assert_eq!(
            stack.entries(),
            vec![("frontend", "React"), ("language", "TypeScript")]
        );
    }
}
