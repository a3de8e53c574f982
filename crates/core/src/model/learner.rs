use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::model::ids::{CourseId, LearnerId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LearnerError {
    #[error("progress must be within 0..=100, got {provided}")]
    ProgressOutOfRange { provided: i64 },

    #[error("course {0} is enrolled more than once")]
    DuplicateEnrollment(CourseId),

    #[error("progress recorded for course {0} which is not enrolled")]
    OrphanProgress(CourseId),
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Completion percentage for one enrolled course, always within `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    /// Clamp an arbitrary value into range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Accept a stored value only if it is already in range.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::ProgressOutOfRange` for values outside `0..=100`.
    pub fn try_from_persisted(value: i64) -> Result<Self, LearnerError> {
        if (0..=100).contains(&value) {
            Ok(Self::clamped(value))
        } else {
            Err(LearnerError::ProgressOutOfRange { provided: value })
        }
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= 100
    }

    #[must_use]
    pub fn is_started(self) -> bool {
        self.0 > 0
    }

    /// Step forward, saturating at 100.
    #[must_use]
    pub fn advanced_by(self, step: u8) -> Self {
        Self::clamped(i64::from(self.0) + i64::from(step))
    }

    /// Number of lessons considered done out of `lesson_count`, rounded down.
    #[must_use]
    pub fn completed_lessons(self, lesson_count: usize) -> usize {
        lesson_count * usize::from(self.0) / 100
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//
// ─── LEARNER ───────────────────────────────────────────────────────────────────
//

/// The signed-in learner: identity, enrollments and per-course progress.
///
/// Courses are referenced by id only; a reference to a course missing from the
/// catalog is legal and is resolved as "not found" by readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learner {
    id: LearnerId,
    name: String,
    email: String,
    enrolled: Vec<CourseId>,
    progress: BTreeMap<CourseId, Progress>,
}

impl Learner {
    /// A learner with no enrollments.
    #[must_use]
    pub fn new(id: LearnerId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            enrolled: Vec::new(),
            progress: BTreeMap::new(),
        }
    }

    /// Rehydrate a learner from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::DuplicateEnrollment` if a course id repeats, or
    /// `LearnerError::OrphanProgress` if progress exists for a course that is not enrolled.
    pub fn from_persisted(
        id: LearnerId,
        name: String,
        email: String,
        enrolled: Vec<CourseId>,
        progress: BTreeMap<CourseId, Progress>,
    ) -> Result<Self, LearnerError> {
        for (idx, course_id) in enrolled.iter().enumerate() {
            if enrolled[..idx].contains(course_id) {
                return Err(LearnerError::DuplicateEnrollment(course_id.clone()));
            }
        }
        if let Some(orphan) = progress.keys().find(|key| !enrolled.contains(*key)) {
            return Err(LearnerError::OrphanProgress(orphan.clone()));
        }

        Ok(Self {
            id,
            name,
            email,
            enrolled,
            progress,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LearnerId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Enrolled course ids in enrollment order.
    #[must_use]
    pub fn enrolled(&self) -> &[CourseId] {
        &self.enrolled
    }

    #[must_use]
    pub fn progress(&self) -> &BTreeMap<CourseId, Progress> {
        &self.progress
    }

    #[must_use]
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled.iter().any(|id| id.as_str() == course_id)
    }

    /// Progress for a course, zero when nothing is recorded.
    #[must_use]
    pub fn progress_for(&self, course_id: &str) -> Progress {
        self.progress.get(course_id).copied().unwrap_or_default()
    }

    /// Enroll in a course. Returns `false` if already enrolled.
    pub fn enroll(&mut self, course_id: CourseId) -> bool {
        if self.is_enrolled(course_id.as_str()) {
            return false;
        }
        self.progress.insert(course_id.clone(), Progress::ZERO);
        self.enrolled.push(course_id);
        true
    }

    /// Record progress for an enrolled course. Returns `false` and leaves the
    /// learner untouched when the course is not enrolled.
    pub fn set_progress(&mut self, course_id: &CourseId, progress: Progress) -> bool {
        if !self.is_enrolled(course_id.as_str()) {
            return false;
        }
        self.progress.insert(course_id.clone(), progress);
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn learner() -> Learner {
        Learner::new(LearnerId::new("7"), "A", "a@x.com")
    }

    #[test]
    fn clamps_progress_values() {
        assert_eq!(Progress::clamped(-10).percent(), 0);
        assert_eq!(Progress::clamped(150).percent(), 100);
        assert_eq!(Progress::clamped(42).percent(), 42);
    }

    #[test]
    fn persisted_progress_must_be_in_range() {
        assert!(Progress::try_from_persisted(101).is_err());
        assert!(Progress::try_from_persisted(-1).is_err());
        assert_eq!(Progress::try_from_persisted(100).unwrap(), Progress::COMPLETE);
    }

    #[test]
    fn advance_saturates() {
        assert_eq!(Progress::clamped(95).advanced_by(10), Progress::COMPLETE);
        assert_eq!(Progress::clamped(45).advanced_by(10).percent(), 55);
    }

    #[test]
    fn completed_lessons_rounds_down() {
        assert_eq!(Progress::clamped(45).completed_lessons(5), 2);
        assert_eq!(Progress::clamped(100).completed_lessons(4), 4);
        assert_eq!(Progress::ZERO.completed_lessons(4), 0);
    }

    #[test]
    fn enroll_is_idempotent() {
        let mut once = learner();
        assert!(once.enroll(CourseId::new("3")));

        let mut twice = learner();
        twice.enroll(CourseId::new("3"));
        assert!(!twice.enroll(CourseId::new("3")));

        assert_eq!(once, twice);
        assert_eq!(twice.enrolled(), &[CourseId::new("3")]);
        assert_eq!(twice.progress_for("3"), Progress::ZERO);
    }

    #[test]
    fn set_progress_requires_enrollment() {
        let mut learner = learner();
        assert!(!learner.set_progress(&CourseId::new("5"), Progress::clamped(30)));
        assert!(learner.progress().is_empty());
    }

    #[test]
    fn from_persisted_rejects_orphan_progress() {
        let mut progress = BTreeMap::new();
        progress.insert(CourseId::new("2"), Progress::clamped(10));
        let err = Learner::from_persisted(
            LearnerId::new("1"),
            "n".into(),
            "e".into(),
            vec![CourseId::new("1")],
            progress,
        )
        .unwrap_err();
        assert_eq!(err, LearnerError::OrphanProgress(CourseId::new("2")));
    }

    #[test]
    fn from_persisted_rejects_duplicates() {
        let err = Learner::from_persisted(
            LearnerId::new("1"),
            "n".into(),
            "e".into(),
            vec![CourseId::new("1"), CourseId::new("1")],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, LearnerError::DuplicateEnrollment(_)));
    }
}
