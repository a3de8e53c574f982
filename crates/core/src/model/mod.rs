mod course;
mod ids;
mod learner;
mod query;

pub use ids::{CourseId, LearnerId, LessonId, ParseIdError};

pub use course::{
    Course, CourseDraft, CourseError, Lesson, LessonKind, Level, ParseLessonKindError,
    ParseLevelError, Rating,
};
pub use learner::{Learner, LearnerError, Progress};
pub use query::{CatalogQuery, Facet, SortKey};
