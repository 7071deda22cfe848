//! Verification code generation

use rand::Rng;

/// Length of generated verification codes
pub const CODE_LENGTH: usize = 6;

/// Generator for the codes embedded by provided-code senders
#[derive(Debug, Default, Clone, Copy)]
pub struct VerificationCodeGenerator;

impl VerificationCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a random six-digit code, zero-padded
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let code: u32 = rng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        let generator = VerificationCodeGenerator::new();

        for _ in 0..100 {
            let code = generator.generate();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
