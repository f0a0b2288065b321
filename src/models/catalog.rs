use serde::{Deserialize, Serialize};

/// A single movie in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Position in the catalog, also the row/column in the similarity matrix
    pub index: usize,
    /// Display title, used as the lookup key
    pub title: String,
    /// Upstream identifier, when the artifact carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<i64>,
}

/// Ordered, immutable collection of movies
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from `(title, movie_id)` pairs, assigning indices in order
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<i64>)>,
    {
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(index, (title, movie_id))| CatalogEntry {
                index,
                title,
                movie_id,
            })
            .collect();
        Self { entries }
    }

    /// Builds a catalog from bare titles
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(titles.into_iter().map(|t| (t.into(), None)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Resolves a title to its index by exact match.
    ///
    /// Duplicate titles resolve to the lowest index.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.title == title)
    }

    /// Case-insensitive substring filter over titles, in catalog order
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |e| needle.is_empty() || e.title.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_order() {
        let catalog = Catalog::from_titles(["Avatar", "Titanic", "Alien"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2).unwrap().title, "Alien");
        assert_eq!(catalog.get(2).unwrap().index, 2);
    }

    #[test]
    fn test_duplicate_title_resolves_to_first() {
        let catalog = Catalog::from_titles(["Heat", "Up", "Heat"]);
        assert_eq!(catalog.position("Heat"), Some(0));
        assert_eq!(catalog.position("heat"), None);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::from_titles(["The Dark Knight", "Dark City", "Up"]);
        let found: Vec<&str> = catalog.search("dark").map(|e| e.title.as_str()).collect();
        assert_eq!(found, vec!["The Dark Knight", "Dark City"]);
        assert_eq!(catalog.search("  ").count(), 3);
    }
}
