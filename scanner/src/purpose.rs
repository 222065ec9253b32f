//! Path-based purpose labels.

use regex_lite::Regex;
use tracing::warn;

use crate::structure::Symbol;

/// Ordered `(pattern, label)` rules tested against the lower-cased path.
/// The first match wins, so more specific rules come first.
const PURPOSE_RULES: &[(&str, &str)] = &[
    (r"pages/api/", "API endpoint"),
    (r"/api/", "API endpoint"),
    (r"auth|login|signup|signin", "Authentication"),
    (r"hooks?/", "React hook"),
    (r"context/", "Context provider"),
    (r"store/", "State management"),
    (r"lib/", "Core library"),
    (r"services?/", "Service layer"),
    (r"utils?/", "Utility functions"),
    (r"helpers?/", "Helper functions"),
    (r"types?/", "Type definitions"),
    (r"components?/", "UI component"),
    (r"pages?/", "Page/Route"),
    (r"styles?/|\.css$|\.scss$", "Styles"),
    (r"config", "Configuration"),
    (r"middleware", "Middleware"),
    (r"test|spec", "Tests"),
];

/// Label for files that define capitalized classes but match no rule.
pub const COMPONENT: &str = "Component";

/// Label for everything else.
pub const CODE: &str = "Code";

/// Maps a file to a short purpose label.
pub struct PurposeClassifier {
    rules: Vec<(Regex, &'static str)>,
}

impl PurposeClassifier {
    pub fn new() -> Self {
        let rules = PURPOSE_RULES
            .iter()
            .filter_map(|(pattern, label)| match Regex::new(pattern) {
                Ok(re) => Some((re, *label)),
                Err(e) => {
                    warn!("Skipping invalid purpose pattern {pattern:?}: {e}");
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// Classify `path` (relative, slash-separated) given its class names.
    ///
    /// Always returns a label.
    pub fn classify(&self, path: &str, classes: &[Symbol]) -> &'static str {
        let path = path.to_lowercase();

        if let Some((_, label)) = self.rules.iter().find(|(re, _)| re.is_match(&path)) {
            return *label;
        }

        let has_component = classes
            .iter()
            .any(|class| class.name.chars().next().is_some_and(char::is_uppercase));
        if has_component { COMPONENT } else { CODE }
    }
}

impl Default for PurposeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_matching_rule_wins() {
        let classifier = PurposeClassifier::new();

        assert_eq!(classifier.classify("src/api/users.ts", &[]), "API endpoint");
        assert_eq!(classifier.classify("pages/api/login.ts", &[]), "API endpoint");
        assert_eq!(classifier.classify("src/pages/Login.tsx", &[]), "Authentication");
        assert_eq!(classifier.classify("src/Pages/Home.tsx", &[]), "Page/Route");
        assert_eq!(classifier.classify("styles/main.css", &[]), "Styles");
        assert_eq!(classifier.classify("theme.scss", &[]), "Styles");
        assert_eq!(classifier.classify("tests/test_scan.py", &[]), "Tests");
    }

    #[test]
    fn test_fallback_labels() {
        let classifier = PurposeClassifier::new();

        let widget = [Symbol::new("Widget", 3)];
        let private = [Symbol::new("_private", 3)];

        assert_eq!(classifier.classify("main.py", &widget), COMPONENT);
        assert_eq!(classifier.classify("main.py", &private), CODE);
        assert_eq!(classifier.classify("main.py", &[]), CODE);
    }
}
