pub mod domain;
pub mod ports;

pub use domain::{
    normalize_email, parse_preferred_time, AccountType, AuthSession, BookedSession,
    DashboardUser, DashboardView, Doubt, NewBookedSession, NewDoubt, NewUser, SessionIdentity,
    User,
};
pub use ports::{
    CredentialHasher, DashboardRenderer, DatabaseService, PortError, PortResult, SessionStore,
    UploadStore,
};
