//! Route handlers

pub mod registration;

pub use registration::AppState;
