// Service exports
pub mod profiles;
pub mod sessions;

pub use profiles::{ProfileSource, ProfileSourceError, DatasetFormat};
pub use sessions::{SessionStore, SessionError, SessionStats, SharedController};
