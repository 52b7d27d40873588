//! Random identifier generation.
//!
//! Identifiers are lowercase hyphenated UUIDv4 strings, e.g.
//! `1c8d0b5e-3f0a-4a5e-9a8e-2f4b6c7d8e9f`. They name default temp
//! sub-directories and temp files, so they must never collide.

use uuid::Uuid;

/// Identifier generation utilities.
pub struct Identifier;

impl Identifier {
    /// Generate a new random identifier.
    pub fn uuid() -> String {
        Uuid::new_v4().to_string()
    }

    /// Check if a string is a well-formed identifier produced by [`Identifier::uuid`].
    pub fn is_uuid(id: &str) -> bool {
        id.len() == 36 && Uuid::parse_str(id).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        let id = Identifier::uuid();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn test_uuid_is_random() {
        let id1 = Identifier::uuid();
        let id2 = Identifier::uuid();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_is_uuid() {
        assert!(Identifier::is_uuid(&Identifier::uuid()));
        assert!(!Identifier::is_uuid("not-a-uuid"));
        assert!(!Identifier::is_uuid(""));
        // Simple (unhyphenated) form is not what we generate
        assert!(!Identifier::is_uuid("67e5504410b1426f9247bb680e5fe0c8"));
    }
}
