//! Validation utilities

use crate::traits::*;
use crate::types::*;

/// Default cap enforced by [`BoundedPostValidator`]
pub const MAX_POST_CONTENT_LEN: usize = 10_000;

/// Default cap enforced by [`BoundedResponseValidator`]
pub const MAX_RESPONSE_CONTENT_LEN: usize = 2_000;

/// Validate that content is not blank
pub fn validate_content_not_blank(content: &str) -> LedgerResult<()> {
    if content.trim().is_empty() {
        return Err(LedgerError::EmptyContent);
    }
    Ok(())
}

/// Validate that content fits within a maximum character count
pub fn validate_content_length(content: &str, max_len: usize) -> LedgerResult<()> {
    if content.chars().count() > max_len {
        return Err(LedgerError::ContentTooLong(max_len));
    }
    Ok(())
}

/// Post validator enforcing a length cap on top of the non-blank rule
pub struct BoundedPostValidator {
    pub max_len: usize,
}

impl Default for BoundedPostValidator {
    fn default() -> Self {
        Self {
            max_len: MAX_POST_CONTENT_LEN,
        }
    }
}

impl PostValidator for BoundedPostValidator {
    fn validate_content(&self, content: &str) -> LedgerResult<()> {
        validate_content_not_blank(content)?;
        validate_content_length(content, self.max_len)
    }
}

/// Response validator enforcing a length cap on top of the non-blank rule
pub struct BoundedResponseValidator {
    pub max_len: usize,
}

impl Default for BoundedResponseValidator {
    fn default() -> Self {
        Self {
            max_len: MAX_RESPONSE_CONTENT_LEN,
        }
    }
}

impl ResponseValidator for BoundedResponseValidator {
    fn validate_content(&self, content: &str) -> LedgerResult<()> {
        validate_content_not_blank(content)?;
        validate_content_length(content, self.max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_rejected() {
        assert_eq!(validate_content_not_blank(""), Err(LedgerError::EmptyContent));
        assert_eq!(validate_content_not_blank("   "), Err(LedgerError::EmptyContent));
        assert!(validate_content_not_blank("hello").is_ok());
    }

    #[test]
    fn length_cap_counts_characters_not_bytes() {
        // Four multibyte characters against a cap of four
        assert!(validate_content_length("日本語だ", 4).is_ok());
        assert_eq!(
            validate_content_length("日本語だよ", 4),
            Err(LedgerError::ContentTooLong(4))
        );
    }

    #[test]
    fn bounded_validators_apply_both_rules() {
        let validator = BoundedPostValidator { max_len: 5 };
        assert_eq!(validator.validate_content(""), Err(LedgerError::EmptyContent));
        assert_eq!(
            validator.validate_content("toolong"),
            Err(LedgerError::ContentTooLong(5))
        );
        assert!(validator.validate_content("short").is_ok());
    }
}
