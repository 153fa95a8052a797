//! Brewdesk core types: the persisted session and the stores that hold it

pub mod error;
pub mod session;
pub mod store;

pub use error::{CoreError, CoreResult};
pub use session::{Session, SessionKey, SessionStore, TokenPair};
pub use store::{FileSessionStore, MemorySessionStore};
