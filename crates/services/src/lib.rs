#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod config;
pub mod contact_service;
pub mod course_view;
pub mod dashboard;
pub mod error;
pub mod session_service;

pub use prep_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use config::AppConfig;
pub use contact_service::{ContactKind, ContactMessage, ContactReceipt, ContactService};
pub use course_view::{CourseDetail, LessonView};
pub use dashboard::{Dashboard, EnrolledCourse};
pub use error::{AppServicesError, ConfigError, ContactError, SessionError};
pub use session_service::{EnrollOutcome, ProgressOutcome, SessionService};
