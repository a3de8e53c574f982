//! Text encoding of the persisted learner session.
//!
//! The layout is a single JSON object:
//! `{"id","name","email","enrolledCourses":[..],"progress":{"<course>":<int>}}`.

use std::collections::BTreeMap;

use prep_core::model::{CourseId, Learner, LearnerId, Progress};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Persisted shape for a learner.
///
/// Mirrors the domain `Learner` so the codec can validate without leaking
/// serialization concerns into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LearnerRecord {
    pub id: LearnerId,
    pub name: String,
    pub email: String,
    pub enrolled_courses: Vec<CourseId>,
    pub progress: BTreeMap<CourseId, i64>,
}

impl LearnerRecord {
    #[must_use]
    pub fn from_learner(learner: &Learner) -> Self {
        Self {
            id: learner.id().clone(),
            name: learner.name().to_owned(),
            email: learner.email().to_owned(),
            enrolled_courses: learner.enrolled().to_vec(),
            progress: learner
                .progress()
                .iter()
                .map(|(id, p)| (id.clone(), i64::from(p.percent())))
                .collect(),
        }
    }

    /// Convert the record back into a domain `Learner`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if progress is out of range, an
    /// enrollment repeats, or progress refers to a course that is not enrolled.
    pub fn into_learner(self) -> Result<Learner, StorageError> {
        let progress = self
            .progress
            .into_iter()
            .map(|(id, value)| {
                Progress::try_from_persisted(value)
                    .map(|p| (id, p))
                    .map_err(ser)
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Learner::from_persisted(
            self.id,
            self.name,
            self.email,
            self.enrolled_courses,
            progress,
        )
        .map_err(ser)
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Serialize a learner to its persisted text form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if JSON encoding fails.
pub fn encode(learner: &Learner) -> Result<String, StorageError> {
    serde_json::to_string(&LearnerRecord::from_learner(learner)).map_err(ser)
}

/// Parse and validate persisted text into a learner.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for invalid JSON, an unexpected shape,
/// or values that violate learner invariants.
pub fn decode(raw: &str) -> Result<Learner, StorageError> {
    let record: LearnerRecord = serde_json::from_str(raw).map_err(ser)?;
    record.into_learner()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Learner {
        let mut learner = Learner::new(LearnerId::new("1"), "John Doe", "j@x.com");
        learner.enroll(CourseId::new("1"));
        learner.enroll(CourseId::new("2"));
        learner.set_progress(&CourseId::new("1"), Progress::clamped(45));
        learner
    }

    #[test]
    fn encodes_camel_case_layout() {
        let json: serde_json::Value = serde_json::from_str(&encode(&sample()).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "name": "John Doe",
                "email": "j@x.com",
                "enrolledCourses": ["1", "2"],
                "progress": { "1": 45, "2": 0 }
            })
        );
    }

    #[test]
    fn decodes_persisted_layout() {
        let raw = concat!(
            r#"{"id":"1","name":"John Doe","email":"j@x.com","#,
            r#""enrolledCourses":["1","2"],"progress":{"1":45,"2":20}}"#
        );
        let learner = decode(raw).unwrap();
        assert_eq!(learner.enrolled().len(), 2);
        assert_eq!(learner.progress_for("2").percent(), 20);
    }

    #[test]
    fn keeps_enrollment_order() {
        let decoded = decode(&encode(&sample()).unwrap()).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(decode("{not json"), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn rejects_missing_fields() {
        let raw = r#"{"id":"1","name":"A","email":"a@x.com"}"#;
        assert!(matches!(decode(raw), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn rejects_wrong_types() {
        let raw = r#"{"id":1,"name":"A","email":"a@x.com","enrolledCourses":[],"progress":{}}"#;
        assert!(decode(raw).is_err());
        let raw = r#"{"id":"1","name":"A","email":"a@x.com","enrolledCourses":[],"progress":{"1":"half"}}"#;
        assert!(decode(raw).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let raw = r#"{"id":"1","name":"A","email":"a@x.com","enrolledCourses":[],"progress":{},"role":"admin"}"#;
        assert!(decode(raw).is_err());
    }

    #[test]
    fn rejects_out_of_range_progress() {
        let raw = r#"{"id":"1","name":"A","email":"a@x.com","enrolledCourses":["1"],"progress":{"1":140}}"#;
        assert!(decode(raw).is_err());
    }

    #[test]
    fn rejects_orphan_progress() {
        let raw = r#"{"id":"1","name":"A","email":"a@x.com","enrolledCourses":[],"progress":{"3":10}}"#;
        assert!(decode(raw).is_err());
    }
}
