//! Version tokens for optimistic concurrency.
//!
//! A token is the base64 of the resource's `updated_at` in RFC 3339 with
//! nanoseconds. Handlers only forward tokens; services compare them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};

pub fn generate(updated_at: DateTime<Utc>) -> String {
    STANDARD.encode(updated_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

/// True when `token` was generated from `updated_at`.
pub fn matches(token: &str, updated_at: DateTime<Utc>) -> bool {
    token == generate(updated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn token_is_base64_of_nanosecond_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let tok = generate(t);
        let raw = String::from_utf8(STANDARD.decode(&tok).unwrap()).unwrap();
        assert_eq!(raw, "2024-03-01T12:30:00.000000000Z");
    }

    #[test]
    fn tokens_differ_for_nanosecond_changes() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let later = t + chrono::Duration::nanoseconds(1);
        assert_ne!(generate(t), generate(later));
        assert!(matches(&generate(later), later));
        assert!(!matches(&generate(t), later));
    }
}
