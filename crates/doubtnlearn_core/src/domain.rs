//! crates/doubtnlearn_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Users
//=========================================================================================

/// The role a user signed up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Student,
    Mentor,
    Faculty,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Student => "Student",
            AccountType::Mentor => "Mentor",
            AccountType::Faculty => "Faculty",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown account type: {0}")]
pub struct UnknownAccountType(pub String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(AccountType::Student),
            "mentor" => Ok(AccountType::Mentor),
            "faculty" => Ok(AccountType::Faculty),
            _ => Err(UnknownAccountType(s.to_string())),
        }
    }
}

/// A registered user. `password_hash` never holds the plaintext secret.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub phone: String,
    pub password_hash: String,
    pub domain: String,
    pub account_type: AccountType,
}

/// A user about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub phone: String,
    pub password_hash: String,
    pub domain: String,
    pub account_type: AccountType,
}

//=========================================================================================
// Doubts and Booked Sessions
//=========================================================================================

/// A question submitted by a user, optionally with an attached image.
#[derive(Debug, Clone)]
pub struct Doubt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doubt_text: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDoubt {
    pub user_id: Uuid,
    pub doubt_text: String,
    pub image_path: Option<String>,
}

/// A request to schedule a mentoring session.
#[derive(Debug, Clone)]
pub struct BookedSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub preferred_time: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct NewBookedSession {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub preferred_time: DateTime<Utc>,
    pub message: String,
}

//=========================================================================================
// Browser Login Sessions
//=========================================================================================

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: Uuid,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            user_id: self.user_id,
            name: self.name.clone(),
        }
    }
}

/// Who is behind an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub name: String,
}

//=========================================================================================
// Dashboard
//=========================================================================================

#[derive(Debug, Clone)]
pub struct DashboardUser {
    pub name: String,
    pub email: String,
}

/// Everything the dashboard page shows for one user.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub user: DashboardUser,
    pub doubts: Vec<Doubt>,
    pub bookasessions: Vec<BookedSession>,
}

//=========================================================================================
// Input Normalization
//=========================================================================================

/// Login key normalization: lowercase and trimmed.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

const LOCAL_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a preferred session time.
///
/// Accepts RFC 3339 timestamps, `datetime-local` form values and bare dates.
/// Values without an offset are taken as UTC.
pub fn parse_preferred_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in LOCAL_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
