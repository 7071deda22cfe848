//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Schedule for a single named rate limiter
///
/// The in-process limiter uses `delays_seconds` as the minimum gap between
/// successive attempts for one key (the last entry repeats for further
/// attempts). The Redis sliding-window limiter uses `max_per_window` and
/// `window_seconds`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimiterSchedule {
    /// Minimum delay before the 2nd, 3rd, ... attempt, in seconds
    pub delays_seconds: Vec<u64>,

    /// Maximum attempts within the sliding window
    pub max_per_window: u32,

    /// Sliding window duration in seconds
    pub window_seconds: u64,
}

impl LimiterSchedule {
    /// Delay that must have elapsed since the previous attempt before
    /// attempt number `attempt` (1-based) is permitted
    pub fn delay_before_attempt(&self, attempt: u32) -> Option<u64> {
        if attempt <= 1 {
            return None;
        }

        let index = (attempt as usize - 2).min(self.delays_seconds.len().saturating_sub(1));
        self.delays_seconds.get(index).copied()
    }
}

/// Schedules for the named rate limiters consulted by the verification
/// orchestrator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Session creation, keyed by (phone number, source tag)
    pub session_creation: LimiterSchedule,

    /// SMS sends, keyed by phone number
    pub send_sms_per_number: LimiterSchedule,

    /// Voice sends, keyed by phone number
    pub send_voice_per_number: LimiterSchedule,

    /// Code checks, keyed by phone number
    pub check_per_number: LimiterSchedule,

    /// SMS sends, keyed by session id
    pub send_sms_per_session: LimiterSchedule,

    /// Voice sends, keyed by session id
    pub send_voice_per_session: LimiterSchedule,

    /// Code checks, keyed by session id
    pub check_per_session: LimiterSchedule,
}

impl RateLimitConfig {
    /// Production schedules: a handful of attempts with exponential-style
    /// back-off between them
    pub fn production() -> Self {
        Self {
            session_creation: LimiterSchedule {
                delays_seconds: vec![60, 120, 300, 600],
                max_per_window: 5,
                window_seconds: 3600,
            },
            send_sms_per_number: LimiterSchedule {
                delays_seconds: vec![30, 60, 120, 300],
                max_per_window: 5,
                window_seconds: 3600,
            },
            send_voice_per_number: LimiterSchedule {
                delays_seconds: vec![60, 120, 300, 600],
                max_per_window: 3,
                window_seconds: 3600,
            },
            check_per_number: LimiterSchedule {
                delays_seconds: vec![0, 0, 30, 60],
                max_per_window: 10,
                window_seconds: 3600,
            },
            send_sms_per_session: LimiterSchedule {
                delays_seconds: vec![30, 60, 120],
                max_per_window: 4,
                window_seconds: 600,
            },
            send_voice_per_session: LimiterSchedule {
                delays_seconds: vec![60, 120, 300],
                max_per_window: 3,
                window_seconds: 600,
            },
            check_per_session: LimiterSchedule {
                delays_seconds: vec![0, 0, 30],
                max_per_window: 5,
                window_seconds: 600,
            },
        }
    }

    /// Development schedules (lenient; the development profile normally
    /// bypasses the limiters entirely)
    pub fn development() -> Self {
        let lenient = LimiterSchedule {
            delays_seconds: vec![0],
            max_per_window: 1000,
            window_seconds: 3600,
        };

        Self {
            session_creation: lenient.clone(),
            send_sms_per_number: lenient.clone(),
            send_voice_per_number: lenient.clone(),
            check_per_number: lenient.clone(),
            send_sms_per_session: lenient.clone(),
            send_voice_per_session: lenient.clone(),
            check_per_session: lenient,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_before_attempt() {
        let schedule = LimiterSchedule {
            delays_seconds: vec![30, 60, 120],
            max_per_window: 5,
            window_seconds: 3600,
        };

        assert_eq!(schedule.delay_before_attempt(1), None);
        assert_eq!(schedule.delay_before_attempt(2), Some(30));
        assert_eq!(schedule.delay_before_attempt(3), Some(60));
        assert_eq!(schedule.delay_before_attempt(4), Some(120));
        // The last delay repeats for all further attempts
        assert_eq!(schedule.delay_before_attempt(9), Some(120));
    }

    #[test]
    fn test_empty_schedule_permits_everything() {
        let schedule = LimiterSchedule {
            delays_seconds: vec![],
            max_per_window: 100,
            window_seconds: 60,
        };

        assert_eq!(schedule.delay_before_attempt(2), None);
    }
}
