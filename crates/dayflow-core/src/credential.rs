//! Shape check for Gemini API keys.
//!
//! This only catches obvious typos before a network call. A key that passes
//! may still be rejected by the service.

use crate::error::{PlannerError, Result};

const KEY_PREFIX: &str = "AIza";
const MIN_KEY_LENGTH: usize = 30;

/// Validates the shape of an API key and returns it trimmed.
pub fn validate_api_key(key: &str) -> Result<&str> {
    let key = key.trim();
    let reason = if key.is_empty() {
        "API key must not be empty"
    } else if !key.starts_with(KEY_PREFIX) {
        "API key must start with 'AIza'"
    } else if key.len() < MIN_KEY_LENGTH {
        "API key is too short"
    } else {
        return Ok(key);
    };
    Err(PlannerError::CredentialInvalid {
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_key() {
        let key = "  AIzaSyA1234567890abcdefghijklmnop  ";
        assert_eq!(validate_api_key(key).unwrap(), key.trim());
    }

    #[test]
    fn test_rejects_malformed_keys() {
        for key in ["", "   ", "sk-1234567890abcdefghijklmnopqrstuv", "AIzaShort"] {
            assert!(validate_api_key(key).is_err(), "{key:?} should be rejected");
        }
    }

    #[test]
    fn test_rejection_is_credential_invalid() {
        let err = validate_api_key("nope").unwrap_err();
        assert!(matches!(err, PlannerError::CredentialInvalid { .. }));
    }
}
