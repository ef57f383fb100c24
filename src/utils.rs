//! Utility functions for the ladder service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a random v4 id that `is_taken` does not report as already used.
///
/// Collisions are not assumed impossible; the generator retries until it
/// finds a free id.
pub fn generate_unique_id(is_taken: impl Fn(&Uuid) -> bool) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if !is_taken(&id) {
            return id;
        }
    }
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an id supplied by a caller, returning `None` for malformed input
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_unique_id(|_| false);
        let id2 = generate_unique_id(|_| false);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_retries_on_collision() {
        let attempts = Cell::new(0);
        let id = generate_unique_id(|_| {
            attempts.set(attempts.get() + 1);
            attempts.get() < 3
        });

        assert_eq!(attempts.get(), 3);
        assert!(!id.is_nil());
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id("wrong id"), None);
    }
}
