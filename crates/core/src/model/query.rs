use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::course::{Course, Level};

/// Wildcard-aware filter value. `All` matches every course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet<T> {
    All,
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Facet::All
    }
}

impl<T: PartialEq> Facet<T> {
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> Facet<T> {
    /// Parse a facet, treating `"All"` (any case) and blank input as the wildcard.
    ///
    /// # Errors
    ///
    /// Propagates the parse error of `T` for any other value.
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Facet::All);
        }
        trimmed.parse().map(Facet::Only)
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Title, ascending.
    #[default]
    Title,
    /// Price, cheapest first.
    Price,
    /// Rating, best first.
    Rating,
    /// Enrolled students, most popular first.
    Students,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
            SortKey::Students => "students",
        }
    }

    /// Parse a sort key; anything unrecognised sorts by title.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "price" => SortKey::Price,
            "rating" => SortKey::Rating,
            "students" => SortKey::Students,
            _ => SortKey::Title,
        }
    }

    /// Compare two courses under this key.
    #[must_use]
    pub fn compare(self, a: &Course, b: &Course) -> Ordering {
        match self {
            SortKey::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
            SortKey::Price => a.price().cmp(&b.price()),
            SortKey::Rating => b.rating().value().total_cmp(&a.rating().value()),
            SortKey::Students => b.students_enrolled().cmp(&a.students_enrolled()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub search_term: String,
    pub category: Facet<String>,
    pub level: Facet<Level>,
    pub sort: SortKey,
}

impl CatalogQuery {
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Facet::Only(category.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Facet::Only(level);
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// True when the course passes the search, category and level predicates.
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        let needle = self.search_term.to_lowercase();
        let matches_search = needle.is_empty()
            || course.title().to_lowercase().contains(&needle)
            || course.description().to_lowercase().contains(&needle)
            || course.instructor().to_lowercase().contains(&needle);

        matches_search
            && self.category.matches(&course.category().to_string())
            && self.level.matches(&course.level())
    }
}
