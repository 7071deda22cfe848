//! Sender selection strategy

pub mod strategy;

pub use strategy::{ConfiguredSelectionStrategy, SenderSelectionStrategy};
