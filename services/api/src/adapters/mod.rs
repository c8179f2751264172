pub mod db;
pub mod hasher;
pub mod memory_db;
pub mod sessions;
pub mod uploads;
pub mod views;

pub use db::DbAdapter;
pub use hasher::Argon2Hasher;
pub use memory_db::InMemoryDb;
pub use sessions::InMemorySessionStore;
pub use uploads::DiskUploadStore;
pub use views::HtmlDashboardRenderer;
