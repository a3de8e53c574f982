use prep_core::Catalog;
use prep_core::model::{Course, Learner, Progress};

/// One enrolled course joined with the learner's progress on it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrolledCourse<'a> {
    pub course: &'a Course,
    pub progress: Progress,
}

impl EnrolledCourse<'_> {
    #[must_use]
    pub fn completed_lessons(&self) -> usize {
        self.progress.completed_lessons(self.course.lessons().len())
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.course.lessons().len()
    }
}

/// Learner overview derived from the session and the catalog.
///
/// Recomputed on every call; enrolled ids missing from the catalog are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    enrolled: Vec<EnrolledCourse<'a>>,
}

impl<'a> Dashboard<'a> {
    #[must_use]
    pub fn build(learner: &Learner, catalog: &'a Catalog) -> Self {
        let enrolled = catalog
            .list()
            .iter()
            .filter(|course| learner.is_enrolled(course.id().as_str()))
            .map(|course| EnrolledCourse {
                course,
                progress: learner.progress_for(course.id().as_str()),
            })
            .collect();
        Self { enrolled }
    }

    /// Enrolled courses in catalog order.
    #[must_use]
    pub fn enrolled(&self) -> &[EnrolledCourse<'a>] {
        &self.enrolled
    }

    /// Mean progress over enrolled courses, rounded half up; 0 when empty.
    #[must_use]
    pub fn average_progress(&self) -> u8 {
        let count = self.enrolled.len();
        if count == 0 {
            return 0;
        }
        let sum: usize = self
            .enrolled
            .iter()
            .map(|e| usize::from(e.progress.percent()))
            .sum();
        let rounded = (2 * sum + count) / (2 * count);
        u8::try_from(rounded).unwrap_or(100)
    }

    #[must_use]
    pub fn completed(&self) -> Vec<&EnrolledCourse<'a>> {
        self.enrolled
            .iter()
            .filter(|e| e.progress.is_complete())
            .collect()
    }

    #[must_use]
    pub fn in_progress(&self) -> Vec<&EnrolledCourse<'a>> {
        self.enrolled
            .iter()
            .filter(|e| e.progress.is_started() && !e.progress.is_complete())
            .collect()
    }

    /// Lessons across every enrolled course.
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.enrolled.iter().map(EnrolledCourse::total_lessons).sum()
    }
}
