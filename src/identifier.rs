//! String <-> UUID conversion for identifiers exchanged over GraphQL.

use uuid::Uuid;

use crate::domain::DomainError;

/// Parse a canonical string identifier.
pub fn parse_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|e| DomainError::InvalidId(e.to_string()))
}

/// Format an identifier in canonical hyphenated lowercase form.
pub fn format_id(id: Uuid) -> String {
    id.hyphenated().to_string()
}

/// Generate a fresh random identifier.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for _ in 0..16 {
            let id = new_id();
            assert_eq!(parse_id(&format_id(id)).unwrap(), id);
        }
    }

    #[test]
    fn test_accepts_uppercase_and_whitespace() {
        let id = new_id();
        let raw = format!("  {}  ", format_id(id).to_uppercase());
        assert_eq!(parse_id(&raw).unwrap(), id);
    }

    #[test]
    fn test_rejects_malformed() {
        let err = parse_id("invalid-uuid").unwrap_err();
        assert!(err.to_string().starts_with("invalid identifier"));
        assert!(parse_id("").is_err());
    }
}
