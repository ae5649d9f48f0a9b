//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a team label contains at least one non-whitespace character.
///
/// # Examples
///
/// ```ignore
/// validate_label("Engineering") // Ok
/// validate_label("   ")         // Err - whitespace only
/// validate_label("")            // Err - empty
/// ```
pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        let mut err = ValidationError::new("label_blank");
        err.message = Some("Team label must not be blank".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a participant name is non-blank once trimmed.
pub fn validate_participant_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("participant_name_blank");
        err.message = Some("Participant name must not be blank".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label_valid() {
        assert!(validate_label("Engineering").is_ok());
        assert!(validate_label("  padded  ").is_ok());
        assert!(validate_label("x").is_ok());
    }

    #[test]
    fn test_validate_label_blank() {
        assert!(validate_label("").is_err());
        assert!(validate_label("   ").is_err());
        assert!(validate_label("\t\n").is_err());
    }

    #[test]
    fn test_validate_participant_name() {
        assert!(validate_participant_name("Alice").is_ok());
        assert!(validate_participant_name("").is_err());
        assert!(validate_participant_name("  ").is_err());
    }
}
