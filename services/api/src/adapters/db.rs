//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use doubtnlearn_core::domain::{
    AccountType, BookedSession, Doubt, NewBookedSession, NewDoubt, NewUser, User,
};
use doubtnlearn_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps a sqlx error, keeping unique violations distinguishable.
fn map_write_error(e: sqlx::Error) -> PortError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            PortError::DuplicateKey(db_err.message().to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn map_read_error(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const USER_COLUMNS: &str =
    "id, name, email, age, phone, password_hash, domain, account_type";
const DOUBT_COLUMNS: &str = "id, user_id, doubt_text, image_path, created_at";
const BOOKED_SESSION_COLUMNS: &str =
    "id, user_id, name, email, phone, subject, preferred_time, message";

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    age: Option<i32>,
    phone: String,
    password_hash: String,
    domain: String,
    account_type: String,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        let account_type = self
            .account_type
            .parse::<AccountType>()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            age: self.age,
            phone: self.phone,
            password_hash: self.password_hash,
            domain: self.domain,
            account_type,
        })
    }
}

#[derive(FromRow)]
struct DoubtRecord {
    id: Uuid,
    user_id: Uuid,
    doubt_text: String,
    image_path: Option<String>,
    created_at: DateTime<Utc>,
}
impl DoubtRecord {
    fn to_domain(self) -> Doubt {
        Doubt {
            id: self.id,
            user_id: self.user_id,
            doubt_text: self.doubt_text,
            image_path: self.image_path,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct BookedSessionRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    email: String,
    phone: String,
    subject: String,
    preferred_time: DateTime<Utc>,
    message: String,
}
impl BookedSessionRecord {
    fn to_domain(self) -> BookedSession {
        BookedSession {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            preferred_time: self.preferred_time,
            message: self.message,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?;

        record.map(UserRecord::to_domain).transpose()
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?;

        record.map(UserRecord::to_domain).transpose()
    }

    async fn insert_user(&self, user: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, name, email, age, phone, password_hash, domain, account_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.domain)
        .bind(user.account_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        record.to_domain()
    }

    async fn insert_doubt(&self, doubt: NewDoubt) -> PortResult<Doubt> {
        let record = sqlx::query_as::<_, DoubtRecord>(&format!(
            "INSERT INTO doubts (id, user_id, doubt_text, image_path) \
             VALUES ($1, $2, $3, $4) RETURNING {DOUBT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(doubt.user_id)
        .bind(&doubt.doubt_text)
        .bind(&doubt.image_path)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(record.to_domain())
    }

    async fn find_doubts_by_user(&self, user_id: Uuid) -> PortResult<Vec<Doubt>> {
        let records = sqlx::query_as::<_, DoubtRecord>(&format!(
            "SELECT {DOUBT_COLUMNS} FROM doubts WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)?;

        let doubts = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(doubts)
    }

    async fn insert_booked_session(&self, session: NewBookedSession) -> PortResult<BookedSession> {
        let record = sqlx::query_as::<_, BookedSessionRecord>(&format!(
            "INSERT INTO booked_sessions (id, user_id, name, email, phone, subject, preferred_time, message) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {BOOKED_SESSION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(session.user_id)
        .bind(&session.name)
        .bind(&session.email)
        .bind(&session.phone)
        .bind(&session.subject)
        .bind(session.preferred_time)
        .bind(&session.message)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(record.to_domain())
    }

    async fn find_booked_sessions_by_user(&self, user_id: Uuid) -> PortResult<Vec<BookedSession>> {
        let records = sqlx::query_as::<_, BookedSessionRecord>(&format!(
            "SELECT {BOOKED_SESSION_COLUMNS} FROM booked_sessions WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)?;

        let sessions = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(sessions)
    }
}
