use thiserror::Error;

use crate::model::{
    CatalogQuery, Course, CourseDraft, CourseError, CourseId, Lesson, LessonKind, Level,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate course id: {0}")]
    DuplicateId(CourseId),

    #[error(transparent)]
    Course(#[from] CourseError),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Wildcard entry shown first in category and level pickers.
pub const ALL_FACET: &str = "All";

/// Fixed, ordered set of courses. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two courses share an id.
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        for (idx, course) in courses.iter().enumerate() {
            if courses[..idx].iter().any(|c| c.id() == course.id()) {
                return Err(CatalogError::DuplicateId(course.id().clone()));
            }
        }
        Ok(Self { courses })
    }

    /// The built-in NEET course catalog.
    ///
    /// # Panics
    ///
    /// Panics if the built-in course data fails validation.
    #[must_use]
    pub fn seeded() -> Self {
        let courses = seed_courses().expect("built-in courses should be valid");
        Self::new(courses).expect("built-in course ids should be unique")
    }

    /// All courses in catalog order.
    #[must_use]
    pub fn list(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a course; `None` when the id is unknown.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id().as_str() == id)
    }

    /// Courses matching `query`, ordered by its sort key.
    ///
    /// The sort is stable, so courses with equal keys keep catalog order.
    #[must_use]
    pub fn filter_and_sort(&self, query: &CatalogQuery) -> Vec<&Course> {
        let mut matched: Vec<&Course> = self.courses.iter().filter(|c| query.matches(c)).collect();
        matched.sort_by(|a, b| query.sort.compare(a, b));
        matched
    }

    /// `"All"` followed by each distinct category in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut out = vec![ALL_FACET];
        for course in &self.courses {
            if !out[1..].contains(&course.category()) {
                out.push(course.category());
            }
        }
        out
    }

    /// `"All"` followed by every level.
    #[must_use]
    pub fn levels(&self) -> Vec<&'static str> {
        std::iter::once(ALL_FACET)
            .chain(Level::ALL.iter().map(|l| l.as_str()))
            .collect()
    }
}

//
// ─── SEED DATA ─────────────────────────────────────────────────────────────────
//

fn lessons(rows: &[(&str, &str, &str, LessonKind)]) -> Vec<Lesson> {
    rows.iter()
        .map(|(id, title, duration, kind)| Lesson::new(*id, *title, *duration, *kind))
        .collect()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| (*t).to_string()).collect()
}

#[allow(clippy::too_many_lines)]
fn seed_courses() -> Result<Vec<Course>, CourseError> {
    use LessonKind::{Quiz, Text, Video};

    let drafts = vec![
        CourseDraft {
            id: "1".into(),
            title: "Physics for NEET - Complete Course".into(),
            description: "Master Physics concepts for NEET with comprehensive theory and practice"
                .into(),
            long_description: "This comprehensive Physics course covers all topics required for NEET examination. From basic mechanics to complex electromagnetic theory, every concept is explained with real-world examples and solved problems. The course includes 150+ video lectures, practice questions, and mock tests.".into(),
            duration: "120 hours".into(),
            level: Level::Intermediate,
            instructor: "Dr. Rajesh Kumar".into(),
            rating: 4.8,
            students_enrolled: 12_500,
            price: 2999,
            image: "https://images.pexels.com/photos/256262/pexels-photo-256262.jpeg?auto=compress&cs=tinysrgb&w=400".into(),
            category: "Physics".into(),
            lessons: lessons(&[
                ("1-1", "Introduction to Mechanics", "45 min", Video),
                ("1-2", "Laws of Motion", "60 min", Video),
                ("1-3", "Work, Energy & Power", "55 min", Video),
                ("1-4", "Practice Quiz - Mechanics", "30 min", Quiz),
                ("1-5", "Gravitation", "50 min", Video),
            ]),
            tags: tags(&["NEET", "Physics", "Medical Entrance", "Complete Course"]),
        },
        CourseDraft {
            id: "2".into(),
            title: "Chemistry for NEET - Organic Chemistry".into(),
            description: "Master Organic Chemistry with systematic approach and problem-solving techniques".into(),
            long_description: "Dive deep into Organic Chemistry with this specialized course designed for NEET aspirants. Learn reaction mechanisms, nomenclature, and solve complex problems with step-by-step guidance. Includes 100+ reactions, practice problems, and revision notes.".into(),
            duration: "80 hours".into(),
            level: Level::Advanced,
            instructor: "Dr. Priya Sharma".into(),
            rating: 4.9,
            students_enrolled: 8_900,
            price: 2499,
            image: "https://images.pexels.com/photos/2280549/pexels-photo-2280549.jpeg?auto=compress&cs=tinysrgb&w=400".into(),
            category: "Chemistry".into(),
            lessons: lessons(&[
                ("2-1", "Basic Concepts of Organic Chemistry", "40 min", Video),
                ("2-2", "Hydrocarbons", "65 min", Video),
                ("2-3", "Haloalkanes and Haloarenes", "70 min", Video),
                ("2-4", "Practice Problems", "45 min", Text),
            ]),
            tags: tags(&["NEET", "Organic Chemistry", "Reactions", "Problem Solving"]),
        },
        CourseDraft {
            id: "3".into(),
            title: "Biology for NEET - Plant Kingdom".into(),
            description: "Comprehensive study of Plant Kingdom with detailed classification and examples".into(),
            long_description: "Explore the fascinating world of plants with this detailed course on Plant Kingdom. Perfect for NEET preparation, this course covers classification, morphology, anatomy, and physiology of plants with beautiful illustrations and diagrams.".into(),
            duration: "60 hours".into(),
            level: Level::Beginner,
            instructor: "Dr. Anjali Verma".into(),
            rating: 4.7,
            students_enrolled: 15_200,
            price: 1999,
            image: "https://images.pexels.com/photos/1153213/pexels-photo-1153213.jpeg?auto=compress&cs=tinysrgb&w=400".into(),
            category: "Biology".into(),
            lessons: lessons(&[
                ("3-1", "Introduction to Plant Kingdom", "35 min", Video),
                ("3-2", "Algae", "45 min", Video),
                ("3-3", "Bryophytes", "40 min", Video),
                ("3-4", "Plant Classification Quiz", "25 min", Quiz),
            ]),
            tags: tags(&["NEET", "Biology", "Plant Kingdom", "Classification"]),
        },
        CourseDraft {
            id: "4".into(),
            title: "NEET Mock Test Series 2024".into(),
            description: "Complete mock test series with detailed analysis and performance tracking".into(),
            long_description: "Prepare for NEET 2024 with our comprehensive mock test series. Includes 50+ full-length tests, chapter-wise tests, and detailed performance analysis. Each test is designed to match the latest NEET pattern and difficulty level.".into(),
            duration: "40 hours".into(),
            level: Level::Intermediate,
            instructor: "NEET Expert Team".into(),
            rating: 4.6,
            students_enrolled: 25_000,
            price: 1499,
            image: "https://images.pexels.com/photos/5428833/pexels-photo-5428833.jpeg?auto=compress&cs=tinysrgb&w=400".into(),
            category: "Test Series".into(),
            lessons: lessons(&[
                ("4-1", "Full Length Test 1", "180 min", Quiz),
                ("4-2", "Physics Chapter Test 1", "60 min", Quiz),
                ("4-3", "Chemistry Chapter Test 1", "60 min", Quiz),
                ("4-4", "Biology Chapter Test 1", "60 min", Quiz),
            ]),
            tags: tags(&["NEET", "Mock Tests", "2024", "Practice"]),
        },
        CourseDraft {
            id: "5".into(),
            title: "Human Anatomy & Physiology".into(),
            description: "Detailed study of human body systems for NEET Biology preparation".into(),
            long_description: "Master human anatomy and physiology with this comprehensive course. Covers all body systems with 3D models, animations, and clinical correlations. Essential for NEET Biology preparation with high-yield topics and mnemonics.".into(),
            duration: "90 hours".into(),
            level: Level::Intermediate,
            instructor: "Dr. Suresh Gupta".into(),
            rating: 4.8,
            students_enrolled: 9_800,
            price: 2799,
            image: "https://images.pexels.com/photos/40568/medical-appointment-doctor-healthcare-40568.jpeg?auto=compress&cs=tinysrgb&w=400".into(),
            category: "Biology".into(),
            lessons: lessons(&[
                ("5-1", "Introduction to Human Body", "30 min", Video),
                ("5-2", "Digestive System", "75 min", Video),
                ("5-3", "Respiratory System", "65 min", Video),
                ("5-4", "Circulatory System", "80 min", Video),
            ]),
            tags: tags(&["NEET", "Human Biology", "Anatomy", "Physiology"]),
        },
        CourseDraft {
            id: "6".into(),
            title: "Inorganic Chemistry Mastery".into(),
            description: "Complete inorganic chemistry course with periodic trends and reactions".into(),
            long_description: "Master inorganic chemistry with systematic study of periodic table, chemical bonding, and important reactions. This course focuses on high-yield topics for NEET with memory techniques and problem-solving strategies.".into(),
            duration: "70 hours".into(),
            level: Level::Intermediate,
            instructor: "Dr. Vikram Singh".into(),
            rating: 4.7,
            students_enrolled: 11_200,
            price: 2299,
            image: "https://images.pexels.com/photos/2280571/pexels-photo-2280571.jpeg?auto=compress&cs=tinysrgb&w=400".into(),
            category: "Chemistry".into(),
            lessons: lessons(&[
                ("6-1", "Periodic Table and Properties", "55 min", Video),
                ("6-2", "Chemical Bonding", "70 min", Video),
                ("6-3", "Coordination Compounds", "60 min", Video),
                ("6-4", "Practice Test", "40 min", Quiz),
            ]),
            tags: tags(&["NEET", "Inorganic Chemistry", "Periodic Table", "Chemical Bonding"]),
        },
    ];

    drafts.into_iter().map(Course::new).collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
