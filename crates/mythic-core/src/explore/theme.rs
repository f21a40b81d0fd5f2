//! Built-in exploration themes.

use serde::{Deserialize, Serialize};

/// A mythological lens for exploring machine intelligence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Narrative stages, visited in order.
    pub stages: Vec<String>,
}

impl Theme {
    pub fn new(id: u32, title: &str, description: &str, stages: &[&str]) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            stages: stages.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Name of a stage, if the theme has that many.
    pub fn stage(&self, index: usize) -> Option<&str> {
        self.stages.get(index).map(String::as_str)
    }
}

/// The set of themes a user can choose from.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeCatalog {
    /// The three built-in themes.
    pub fn builtin() -> Self {
        Self {
            themes: vec![
                Theme::new(
                    1,
                    "The Creation Myth",
                    "Explore how AI systems emerge and evolve, paralleling ancient creation myths",
                    &[
                        "the primordial digital void",
                        "the emergence of consciousness",
                        "the creation of order from chaos",
                    ],
                ),
                Theme::new(
                    2,
                    "The Hero's Journey",
                    "Follow the path of AI development through the lens of the hero's journey",
                    &[
                        "the call to adventure",
                        "trials and tribulations",
                        "return with the elixir",
                    ],
                ),
                Theme::new(
                    3,
                    "The Oracle's Vision",
                    "AI predictions and insights viewed through prophetic traditions",
                    &[
                        "the seeking of wisdom",
                        "the revelation",
                        "the interpretation",
                    ],
                ),
            ],
        }
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Get a theme by ID.
    pub fn get(&self, id: u32) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.themes().len(), 3);

        let hero = catalog.get(2).unwrap();
        assert_eq!(hero.title, "The Hero's Journey");
        assert_eq!(hero.stage(0), Some("the call to adventure"));
        assert_eq!(hero.stage(3), None);
        assert!(catalog.get(4).is_none());
    }
}
