use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::Clock;
use crate::error::ContactError;

/// Inquiry categories offered on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactKind {
    #[default]
    General,
    Technical,
    Billing,
    Course,
    Feedback,
}

impl ContactKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContactKind::General => "general",
            ContactKind::Technical => "technical",
            ContactKind::Billing => "billing",
            ContactKind::Course => "course",
            ContactKind::Feedback => "feedback",
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactKind {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(ContactKind::General),
            "technical" => Ok(ContactKind::Technical),
            "billing" => Ok(ContactKind::Billing),
            "course" => Ok(ContactKind::Course),
            "feedback" => Ok(ContactKind::Feedback),
            other => Err(ContactError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub kind: ContactKind,
}

impl ContactMessage {
    fn validate(&self) -> Result<(), ContactError> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ContactError::EmptyField(field));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReceipt {
    pub kind: ContactKind,
    pub received_at: DateTime<Utc>,
}

/// Accepts contact form submissions. Unrelated to the session or catalog.
#[derive(Clone)]
pub struct ContactService {
    clock: Clock,
    latency: Duration,
}

impl ContactService {
    #[must_use]
    pub fn new(clock: Clock, latency: Duration) -> Self {
        Self { clock, latency }
    }

    /// Submit a message; resolves after the simulated delivery delay.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::EmptyField` if a required field is blank.
    pub async fn submit(&self, message: ContactMessage) -> Result<ContactReceipt, ContactError> {
        message.validate()?;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        tracing::info!(
            kind = %message.kind,
            email = %message.email,
            subject = %message.subject,
            "contact message received"
        );
        Ok(ContactReceipt {
            kind: message.kind,
            received_at: self.clock.now(),
        })
    }
}
