use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::{CourseId, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course id cannot be empty")]
    EmptyId,

    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("rating must be within 0..=5, got {provided}")]
    InvalidRating { provided: f32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown level: {0}")]
pub struct ParseLevelError(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lesson type: {0}")]
pub struct ParseLessonKindError(String);

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Difficulty level advertised for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Level::Beginner),
            "Intermediate" => Ok(Level::Intermediate),
            "Advanced" => Ok(Level::Advanced),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonKind {
    Video,
    Text,
    Quiz,
}

impl LessonKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LessonKind::Video => "video",
            LessonKind::Text => "text",
            LessonKind::Quiz => "quiz",
        }
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonKind {
    type Err = ParseLessonKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(LessonKind::Video),
            "text" => Ok(LessonKind::Text),
            "quiz" => Ok(LessonKind::Quiz),
            other => Err(ParseLessonKindError(other.to_string())),
        }
    }
}

/// A single unit of course content. Owned by its course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    duration: String,
    kind: LessonKind,
}

impl Lesson {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        duration: impl Into<String>,
        kind: LessonKind,
    ) -> Self {
        Self {
            id: LessonId::new(id),
            title: title.into(),
            duration: duration.into(),
            kind,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        self.kind
    }
}

//
// ─── RATING ────────────────────────────────────────────────────────────────────
//

/// Average learner rating, bounded to `0.0..=5.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f32);

impl Rating {
    pub const MAX: f32 = 5.0;

    /// # Errors
    ///
    /// Returns `CourseError::InvalidRating` for non-finite or out-of-range values.
    pub fn new(value: f32) -> Result<Self, CourseError> {
        if !value.is_finite() || !(0.0..=Self::MAX).contains(&value) {
            return Err(CourseError::InvalidRating { provided: value });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Builder-style input for [`Course::new`].
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub duration: String,
    pub level: Level,
    pub instructor: String,
    pub rating: f32,
    pub students_enrolled: u32,
    pub price: u32,
    pub image: String,
    pub category: String,
    pub lessons: Vec<Lesson>,
    pub tags: Vec<String>,
}

/// A catalog entry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    long_description: String,
    duration: String,
    level: Level,
    instructor: String,
    rating: Rating,
    students_enrolled: u32,
    price: u32,
    image: String,
    category: String,
    lessons: Vec<Lesson>,
    tags: Vec<String>,
}

impl Course {
    /// Validate a draft into a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the id or title is blank or the rating is out of range.
    pub fn new(draft: CourseDraft) -> Result<Self, CourseError> {
        if draft.id.trim().is_empty() {
            return Err(CourseError::EmptyId);
        }
        if draft.title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        let rating = Rating::new(draft.rating)?;

        Ok(Self {
            id: CourseId::new(draft.id),
            title: draft.title,
            description: draft.description,
            long_description: draft.long_description,
            duration: draft.duration,
            level: draft.level,
            instructor: draft.instructor,
            rating,
            students_enrolled: draft.students_enrolled,
            price: draft.price,
            image: draft.image,
            category: draft.category,
            lessons: draft.lessons,
            tags: draft.tags,
        })
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    #[must_use]
    pub fn students_enrolled(&self) -> u32 {
        self.students_enrolled
    }

    #[must_use]
    pub fn price(&self) -> u32 {
        self.price
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CourseDraft {
        CourseDraft {
            id: "9".into(),
            title: "Genetics Crash Course".into(),
            description: "Mendel to molecular".into(),
            long_description: String::new(),
            duration: "10 hours".into(),
            level: Level::Beginner,
            instructor: "Dr. Test".into(),
            rating: 4.5,
            students_enrolled: 10,
            price: 999,
            image: String::new(),
            category: "Biology".into(),
            lessons: vec![Lesson::new("9-1", "Intro", "20 min", LessonKind::Video)],
            tags: vec!["NEET".into()],
        }
    }

    #[test]
    fn builds_valid_course() {
        let course = Course::new(draft()).unwrap();
        assert_eq!(course.id().as_str(), "9");
        assert_eq!(course.lessons().len(), 1);
        assert_eq!(course.lessons()[0].kind(), LessonKind::Video);
    }

    #[test]
    fn rejects_blank_title() {
        let mut d = draft();
        d.title = "  ".into();
        assert_eq!(Course::new(d).unwrap_err(), CourseError::EmptyTitle);
    }

    #[test]
    fn rejects_rating_above_five() {
        let mut d = draft();
        d.rating = 5.1;
        assert!(matches!(
            Course::new(d).unwrap_err(),
            CourseError::InvalidRating { .. }
        ));
    }

    #[test]
    fn rejects_nan_rating() {
        assert!(Rating::new(f32::NAN).is_err());
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
    }

    #[test]
    fn level_parses_display_names() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        assert!("beginner".parse::<Level>().is_err());
    }

    #[test]
    fn lesson_kind_parses_lowercase() {
        assert_eq!("quiz".parse::<LessonKind>().unwrap(), LessonKind::Quiz);
        assert!("podcast".parse::<LessonKind>().is_err());
    }
}
