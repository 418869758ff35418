use serde::{Deserialize, Serialize};

pub const ALL_CATEGORIES: &str = "All";

/// A writing prompt used to seed a new story. Reference data only, never
/// persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub category: String,
    pub title: String,
    pub description: String,
}

impl Prompt {
    /// Initial `(title, content)` for a new story started from this prompt.
    pub fn seed_draft(&self) -> (String, String) {
        (
            self.title.clone(),
            format!("Prompt: {}\n\n", self.description),
        )
    }

    pub fn matches_category(&self, filter: &str) -> bool {
        filter == ALL_CATEGORIES || self.category == filter
    }
}
