//! Core types and data structures for the feedback ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::Identity;

/// Monetary amounts are denominated in wei and always non-negative.
pub type Wei = u128;

/// Unique post identifier, assigned monotonically by the store and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique response identifier, assigned monotonically by the store and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ResponseId(pub u64);

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller identity as supplied by the surrounding wallet/session layer.
///
/// Addresses are opaque to the ledger: they are compared exactly as given
/// and never derived from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from any string-like value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Derived acceptance state of a post, computed on read against a caller
/// supplied clock. Never stored, so no timer task is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcceptanceStatus {
    /// Accepting responses: manual, or the deadline is still in the future
    Open,
    /// Timed post whose deadline has passed (the deadline instant itself is closed)
    Closed,
    /// Tombstoned by the owner; terminal
    Deleted,
}

/// A user-authored post accepting paid responses for a bounded or
/// open-ended window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier for the post
    pub post_id: PostId,
    /// Address of the creator; immutable
    pub owner: Address,
    /// Text payload; empty exactly when the post is tombstoned
    pub content: String,
    /// Whether the post appears in the public listing
    pub is_public: bool,
    /// When true the acceptance window never expires by time
    pub manual_accepting: bool,
    /// Deadline for timed posts; `None` when `manual_accepting` is true
    pub accepting_until: Option<DateTime<Utc>>,
    /// When the post was created
    pub creation_time: DateTime<Utc>,
    /// Count of responses attached to this post
    pub total_responses: u64,
    /// Accumulated net value credited to the owner across all responses
    pub total_earnings: Wei,
    /// Creator identity, all-empty when the post was created anonymous
    pub identity: Identity,
    /// Storage revision, bumped on every committed mutation
    pub version: u64,
}

impl Post {
    /// Whether the post has been deleted.
    ///
    /// Tombstones keep their id, owner, and accounting counters but clear
    /// the content; live posts always have non-empty content, so an empty
    /// content field is the tombstone marker.
    pub fn is_tombstoned(&self) -> bool {
        self.content.is_empty()
    }

    /// Derived acceptance state at the given instant.
    ///
    /// The deadline bound is exclusive: a timed post is already closed at
    /// the exact `accepting_until` instant.
    pub fn acceptance_status(&self, now: DateTime<Utc>) -> AcceptanceStatus {
        if self.is_tombstoned() {
            return AcceptanceStatus::Deleted;
        }
        if self.manual_accepting {
            return AcceptanceStatus::Open;
        }
        match self.accepting_until {
            Some(deadline) if deadline > now => AcceptanceStatus::Open,
            _ => AcceptanceStatus::Closed,
        }
    }

    /// Whether a response may be attached at the given instant
    pub fn is_accepting(&self, now: DateTime<Utc>) -> bool {
        self.acceptance_status(now) == AcceptanceStatus::Open
    }
}

/// A reply to a post carrying a value transfer, recorded after fee deduction.
///
/// Responses are immutable once created and survive the tombstoning of
/// their post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Unique identifier for the response
    pub response_id: ResponseId,
    /// The post this response is attached to
    pub ref_post_id: PostId,
    /// Address of the responder
    pub responder: Address,
    /// Text payload; never empty
    pub content: String,
    /// Net amount credited to the post owner (gross minus platform fee)
    pub amount_transferred: Wei,
    /// When the response was created
    pub creation_time: DateTime<Utc>,
    /// Responder identity, all-empty when the responder chose anonymity
    pub identity: Identity,
}

/// Errors that can occur in the feedback ledger
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("acceptance deadline must be set and strictly in the future for timed posts")]
    InvalidSchedule,
    #[error("content cannot be empty")]
    EmptyContent,
    #[error("content exceeds the maximum length of {0} characters")]
    ContentTooLong(usize),
    #[error("post not found: {0}")]
    NotFound(PostId),
    #[error("caller {caller} does not own post {post_id}")]
    NotOwner { caller: Address, post_id: PostId },
    #[error("post {0} is no longer accepting responses")]
    NotAccepting(PostId),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("post {0} was modified concurrently, retry the operation")]
    Conflict(PostId),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(manual: bool, until: Option<DateTime<Utc>>) -> Post {
        Post {
            post_id: PostId(1),
            owner: Address::from("0xabc"),
            content: "hello".to_string(),
            is_public: true,
            manual_accepting: manual,
            accepting_until: until,
            creation_time: Utc::now(),
            total_responses: 0,
            total_earnings: 0,
            identity: Identity::redacted(),
            version: 1,
        }
    }

    #[test]
    fn manual_posts_stay_open() {
        let p = post(true, None);
        let far_future = Utc::now() + Duration::days(3650);
        assert_eq!(p.acceptance_status(far_future), AcceptanceStatus::Open);
    }

    #[test]
    fn timed_post_closes_at_exact_deadline() {
        let deadline = Utc::now();
        let p = post(false, Some(deadline));

        assert_eq!(
            p.acceptance_status(deadline - Duration::seconds(1)),
            AcceptanceStatus::Open
        );
        // The deadline instant itself is closed, not open
        assert_eq!(p.acceptance_status(deadline), AcceptanceStatus::Closed);
        assert_eq!(
            p.acceptance_status(deadline + Duration::seconds(1)),
            AcceptanceStatus::Closed
        );
    }

    #[test]
    fn tombstone_is_terminal_and_detected_by_empty_content() {
        let mut p = post(true, None);
        assert!(!p.is_tombstoned());

        p.content.clear();
        assert!(p.is_tombstoned());
        assert_eq!(p.acceptance_status(Utc::now()), AcceptanceStatus::Deleted);
    }

    #[test]
    fn post_serializes_round_trip() {
        let p = post(false, Some(Utc::now() + Duration::hours(1)));
        let json = serde_json::to_string(&p).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
