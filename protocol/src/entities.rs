//! Facts extracted from source comments.

use serde::{Deserialize, Serialize};

/// Category of an extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// `TODO` markers.
    Todo,
    /// `NOTE` markers.
    Note,
    /// `DECISION` markers.
    Decision,
    /// `FIXME` and `WARN`/`WARNING` markers.
    Warning,
    /// Short doc comments and docstrings.
    Description,
}

impl EntityCategory {
    /// All categories in display order.
    pub const ALL: [EntityCategory; 5] = [
        Self::Todo,
        Self::Note,
        Self::Decision,
        Self::Warning,
        Self::Description,
    ];

    /// Get a display name for this category.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Todo => "TODOs",
            Self::Note => "Notes",
            Self::Decision => "Decisions",
            Self::Warning => "Warnings",
            Self::Description => "Descriptions",
        }
    }
}

/// Extracted facts for one file, grouped by category.
///
/// Each list keeps the order in which the facts appear in the file, and
/// repeated identical facts are kept as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub todos: Vec<String>,

    #[serde(default)]
    pub notes: Vec<String>,

    #[serde(default)]
    pub decisions: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,

    #[serde(default)]
    pub descriptions: Vec<String>,
}

impl Entities {
    /// Facts recorded under `category`.
    pub fn get(&self, category: EntityCategory) -> &[String] {
        match category {
            EntityCategory::Todo => &self.todos,
            EntityCategory::Note => &self.notes,
            EntityCategory::Decision => &self.decisions,
            EntityCategory::Warning => &self.warnings,
            EntityCategory::Description => &self.descriptions,
        }
    }

    /// Record a fact under `category`.
    pub fn push(&mut self, category: EntityCategory, fact: impl Into<String>) {
        let list = match category {
            EntityCategory::Todo => &mut self.todos,
            EntityCategory::Note => &mut self.notes,
            EntityCategory::Decision => &mut self.decisions,
            EntityCategory::Warning => &mut self.warnings,
            EntityCategory::Description => &mut self.descriptions,
        };
        list.push(fact.into());
    }

    /// Total number of facts across all categories.
    pub fn len(&self) -> usize {
        EntityCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// Whether every category is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_and_count() {
        let mut entities = Entities::default();
        assert!(entities.is_empty());

        entities.push(EntityCategory::Todo, "add pagination");
        entities.push(EntityCategory::Todo, "add pagination");
        entities.push(EntityCategory::Warning, "slow path");

        assert_eq!(entities.todos, vec!["add pagination", "add pagination"]);
        assert_eq!(entities.get(EntityCategory::Warning), ["slow path"]);
        assert_eq!(entities.len(), 3);
    }

    #[test]
    fn test_missing_categories_deserialize_empty() {
        let entities: Entities = serde_json::from_str(r#"{"todos": ["x"]}"#).unwrap();
        assert_eq!(entities.todos, vec!["x"]);
        assert!(entities.descriptions.is_empty());
    }
}
