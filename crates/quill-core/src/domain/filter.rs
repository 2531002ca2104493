use super::Post;

/// Keyword filter for listing posts.
///
/// A post matches when the term occurs, ignoring case, inside its title,
/// content, category or any single tag. An empty term matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    term: Option<String>,
}

impl PostFilter {
    /// No filtering.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from an optional search term. Blank terms are dropped.
    pub fn from_term(term: Option<&str>) -> Self {
        Self {
            term: term.filter(|t| !t.is_empty()).map(str::to_lowercase),
        }
    }

    /// The lowercased search term, if any.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn matches(&self, post: &Post) -> bool {
        let Some(term) = self.term() else {
            return true;
        };
        let hit = |text: &str| text.to_lowercase().contains(term);

        hit(&post.title)
            || hit(&post.content)
            || hit(&post.category)
            || post.tags.iter().any(|tag| hit(tag))
    }
}
