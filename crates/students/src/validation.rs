//! Field validation shared by the record inputs.

use campus_core::{DomainError, DomainResult};

/// Require a text field to be present and not blank.
///
/// Surrounding whitespace is trimmed from the stored value.
pub fn required_text(field: &str, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) => non_blank_text(field, v),
        None => Err(DomainError::validation(format!("{field}: this field is required"))),
    }
}

/// Validate a supplied text field: it must not be blank once trimmed.
pub fn non_blank_text(field: &str, value: String) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field}: this field may not be blank")));
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_field_is_rejected() {
        let err = required_text("name", None).unwrap_err();
        assert_eq!(err, DomainError::validation("name: this field is required"));
    }

    #[test]
    fn blank_field_is_rejected() {
        let err = required_text("name", Some("   ".to_string())).unwrap_err();
        assert_eq!(err, DomainError::validation("name: this field may not be blank"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let v = required_text("name", Some("  Python \n".to_string())).unwrap();
        assert_eq!(v, "Python");
    }

    proptest! {
        #[test]
        fn accepted_values_are_trimmed_and_non_empty(s in "\\PC{0,40}") {
            match non_blank_text("name", s.clone()) {
                Ok(v) => {
                    prop_assert!(!v.is_empty());
                    prop_assert_eq!(v.as_str(), s.trim());
                }
                Err(DomainError::Validation(_)) => prop_assert!(s.trim().is_empty()),
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }
}
