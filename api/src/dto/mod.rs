//! Request and response messages for the RPC surface

pub mod registration;

pub use registration::{
    CheckVerificationCodeRequest, CheckVerificationCodeResponse, CreateSessionRequest,
    CreateSessionResponse, GetSessionMetadataResponse, RegistrationError, RegistrationErrorType,
    SendVerificationCodeRequest, SendVerificationCodeResponse, SessionMetadata,
};
