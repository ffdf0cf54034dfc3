//! Identity redaction for anonymous posts and responses

use serde::{Deserialize, Serialize};

/// Public profile attached to a post or response.
///
/// All fields are plain strings sourced from an out-of-scope profile
/// system; any of them may legitimately be empty for callers without a
/// profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub username: String,
    pub avatar_url: String,
}

impl Identity {
    /// Create an identity from profile fields
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            avatar_url: avatar_url.into(),
        }
    }

    /// The fully redacted identity: every field empty
    pub fn redacted() -> Self {
        Self::default()
    }

    /// Decide what identity gets stored for a post or response.
    ///
    /// An anonymity request always wins: the result is all-empty no matter
    /// what the candidate carried, including the avatar. Otherwise the
    /// candidate passes through unchanged.
    pub fn resolve(requested_anonymous: bool, candidate: Identity) -> Identity {
        if requested_anonymous {
            Identity::redacted()
        } else {
            candidate
        }
    }

    /// Reconstruction rule used by consumers: a record is anonymous exactly
    /// when both `name` and `username` are empty.
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty() && self.username.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymity_request_redacts_everything() {
        let candidate = Identity::new("Ada Lovelace", "adal", "https://example.com/ada.png");
        let resolved = Identity::resolve(true, candidate);

        assert_eq!(resolved, Identity::redacted());
        // Never an avatar without name/username
        assert!(resolved.avatar_url.is_empty());
        assert!(resolved.is_anonymous());
    }

    #[test]
    fn named_identity_passes_through_unchanged() {
        let candidate = Identity::new("Ada Lovelace", "adal", "https://example.com/ada.png");
        let resolved = Identity::resolve(false, candidate.clone());

        assert_eq!(resolved, candidate);
        assert!(!resolved.is_anonymous());
    }

    #[test]
    fn empty_profile_without_anonymity_still_reads_as_anonymous() {
        // A caller with no profile yields the both-empty signature even
        // when they did not request anonymity.
        let resolved = Identity::resolve(false, Identity::default());
        assert!(resolved.is_anonymous());
    }
}
