//! Verification code senders
//!
//! A sender is a plug-in that knows how to deliver a verification code via
//! one upstream provider and to check submitted codes against whatever it
//! stored for the session. Two families exist: provided-code senders
//! generate the code locally and store it as the session payload; delegated
//! senders let the upstream own the code and store its session handle
//! instead.

pub mod body_provider;
pub mod code_generator;
pub mod last_digits;
pub mod registry;
pub mod traits;

pub use body_provider::VerificationSmsBodyProvider;
pub use code_generator::{VerificationCodeGenerator, CODE_LENGTH};
pub use last_digits::LastDigitsVerificationCodeSender;
pub use registry::SenderRegistry;
pub use traits::VerificationCodeSender;
