//! Value objects

pub mod phone_number;
pub mod transport;

pub use phone_number::PhoneNumber;
pub use transport::{ClientType, MessageTransport};
