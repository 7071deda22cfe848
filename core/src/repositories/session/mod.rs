//! Session store contract

pub mod store;

pub use store::{SessionMutator, SessionStore};
