use prep_core::Catalog;
use prep_core::model::{Course, Learner, Lesson, Progress};

/// Markup applied to the sale price to show the struck-through list price, in percent.
pub const LIST_PRICE_MARKUP: u64 = 130;

/// A lesson row on the course page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonView<'a> {
    pub lesson: &'a Lesson,
    pub completed: bool,
}

/// Course page model: the course plus the viewer's enrollment state.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetail<'a> {
    pub course: &'a Course,
    /// `Some` when the viewer is signed in and enrolled.
    pub progress: Option<Progress>,
    pub lessons: Vec<LessonView<'a>>,
}

impl<'a> CourseDetail<'a> {
    /// Build the page for `course_id`; `None` renders as "Course Not Found".
    ///
    /// Lesson completion is derived from progress: the first
    /// `floor(progress% * lessons)` lessons count as done.
    #[must_use]
    pub fn build(catalog: &'a Catalog, course_id: &str, viewer: Option<&Learner>) -> Option<Self> {
        let course = catalog.find_by_id(course_id)?;
        let progress = viewer
            .filter(|learner| learner.is_enrolled(course_id))
            .map(|learner| learner.progress_for(course_id));

        let done = progress.map_or(0, |p| p.completed_lessons(course.lessons().len()));
        let lessons = course
            .lessons()
            .iter()
            .enumerate()
            .map(|(idx, lesson)| LessonView {
                lesson,
                completed: idx < done,
            })
            .collect();

        Some(Self {
            course,
            progress,
            lessons,
        })
    }

    #[must_use]
    pub fn is_enrolled(&self) -> bool {
        self.progress.is_some()
    }

    /// Pre-discount price shown beside the sale price, rounded half up.
    #[must_use]
    pub fn list_price(&self) -> u64 {
        (u64::from(self.course.price()) * LIST_PRICE_MARKUP + 50) / 100
    }
}
