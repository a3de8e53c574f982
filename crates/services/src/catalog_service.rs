use std::sync::Arc;

use prep_core::Catalog;
use prep_core::model::{CatalogQuery, Course, Learner};

use crate::course_view::CourseDetail;
use crate::dashboard::Dashboard;

/// Read-only access to the course catalog and the views derived from it.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<Catalog>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn seeded() -> Self {
        Self::new(Arc::new(Catalog::seeded()))
    }

    #[must_use]
    pub fn list(&self) -> &[Course] {
        self.catalog.list()
    }

    /// Fetch a course by ID.
    ///
    /// Returns `None` when the course does not exist.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Course> {
        self.catalog.find_by_id(id)
    }

    #[must_use]
    pub fn filter_and_sort(&self, query: &CatalogQuery) -> Vec<&Course> {
        let found = self.catalog.filter_and_sort(query);
        tracing::debug!(
            search = %query.search_term,
            sort = %query.sort,
            matches = found.len(),
            "catalog query"
        );
        found
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    #[must_use]
    pub fn levels(&self) -> Vec<&'static str> {
        self.catalog.levels()
    }

    #[must_use]
    pub fn course_detail(&self, id: &str, viewer: Option<&Learner>) -> Option<CourseDetail<'_>> {
        CourseDetail::build(&self.catalog, id, viewer)
    }

    #[must_use]
    pub fn dashboard(&self, learner: &Learner) -> Dashboard<'_> {
        Dashboard::build(learner, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::SortKey;

    #[test]
    fn delegates_queries_to_catalog() {
        let service = CatalogService::seeded();
        assert_eq!(service.list().len(), 6);
        assert!(service.find_by_id("6").is_some());
        assert!(service.find_by_id("x").is_none());

        let found =
            service.filter_and_sort(&CatalogQuery::search("biology").sorted_by(SortKey::Rating));
        let ids: Vec<_> = found.iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, vec!["5", "3"]);
    }

    #[test]
    fn clones_share_catalog() {
        let service = CatalogService::seeded();
        let other = service.clone();
        assert!(std::ptr::eq(service.list(), other.list()));
    }
}
