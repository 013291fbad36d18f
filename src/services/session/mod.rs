#[cfg(test)]
pub mod memory;
pub mod store;
pub mod valkey;

pub use store::{SessionStore, SessionStoreError};
pub use valkey::ValkeySessionStore;
