//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Identity;
use crate::types::*;

/// Storage abstraction for the feedback ledger.
///
/// Implementations may back onto any persistence layer (SQL, key-value,
/// in-memory) as long as they uphold the contract documented on each
/// method: monotonic id assignment, optimistic version checks, and the
/// atomicity of [`FeedbackStorage::append_response`]. All methods take
/// `&self`; the store is shared by many concurrent callers.
#[async_trait]
pub trait FeedbackStorage: Send + Sync {
    /// Persist a new post, assigning a fresh monotonic [`PostId`] and an
    /// initial version of 1.
    ///
    /// When `new.idempotency_key` matches a previously inserted post, the
    /// original record is returned unchanged instead of creating another.
    async fn insert_post(&self, new: NewPost) -> LedgerResult<Post>;

    /// Fetch a post by id. Tombstoned posts ARE returned here so their
    /// response history stays renderable; only listings exclude them.
    async fn fetch_post(&self, post_id: PostId) -> LedgerResult<Option<Post>>;

    /// Commit an update to a post's mutable fields (content, visibility,
    /// acceptance policy).
    ///
    /// Fails with [`LedgerError::Conflict`] when the stored version no
    /// longer equals `expected_version`, and [`LedgerError::NotFound`] for
    /// unknown or tombstoned posts. Immutable fields (id, owner, creation
    /// time, counters, identity) are taken from the stored record, never
    /// from `post`.
    async fn commit_post(&self, post: &Post, expected_version: u64) -> LedgerResult<Post>;

    /// Tombstone a post: clear its content while preserving id, owner,
    /// and accounting counters. Same version/not-found semantics as
    /// [`FeedbackStorage::commit_post`]. Tombstoning is terminal.
    async fn tombstone_post(&self, post_id: PostId, expected_version: u64) -> LedgerResult<()>;

    /// One page of the public feed: descending `post_id`, skipping
    /// tombstoned and non-public posts. Given identical store state, the
    /// same cursor always yields the same slice.
    async fn list_public_posts(
        &self,
        cursor: Option<PageCursor>,
        page_size: usize,
    ) -> LedgerResult<PostPage>;

    /// All of an owner's posts, including private ones, descending
    /// `post_id`. Tombstones are included only when asked for (the
    /// dashboard aggregates need them; listings do not).
    async fn list_posts_by_owner(
        &self,
        owner: &Address,
        include_tombstoned: bool,
    ) -> LedgerResult<Vec<Post>>;

    /// Atomically append a response and update its post's counters.
    ///
    /// The whole compound operation commits or fails as one: the
    /// existence/tombstone/acceptance checks (evaluated at
    /// `new.creation_time`), the response insert with a fresh monotonic
    /// [`ResponseId`], the post's `total_responses`/`total_earnings`
    /// update, and the platform fee accrual. No reader may observe a
    /// partial state, and a response can never attach to a concurrently
    /// tombstoned post.
    ///
    /// When `new.idempotency_key` matches a previously appended response,
    /// the original record is returned and nothing is re-applied.
    async fn append_response(&self, new: NewResponse) -> LedgerResult<Response>;

    /// All responses for a post, ascending `creation_time` (ties broken by
    /// ascending `response_id`). Permitted on tombstoned posts; fails with
    /// [`LedgerError::NotFound`] only for ids that never existed.
    async fn list_responses_for_post(&self, post_id: PostId) -> LedgerResult<Vec<Response>>;

    /// Running total of platform fees withheld across all responses.
    async fn platform_fees_accrued(&self) -> LedgerResult<Wei>;
}

/// Input record for [`FeedbackStorage::insert_post`]. Identity is already
/// redacted and content already validated by the calling manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub owner: Address,
    pub content: String,
    pub is_public: bool,
    pub manual_accepting: bool,
    pub accepting_until: Option<DateTime<Utc>>,
    pub identity: Identity,
    pub creation_time: DateTime<Utc>,
    pub idempotency_key: Option<Uuid>,
}

/// Input record for [`FeedbackStorage::append_response`]. The fee split has
/// already been computed: `amount_transferred` is the net payout and `fee`
/// the withheld platform share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResponse {
    pub ref_post_id: PostId,
    pub responder: Address,
    pub content: String,
    pub identity: Identity,
    pub amount_transferred: Wei,
    pub fee: Wei,
    pub creation_time: DateTime<Utc>,
    pub idempotency_key: Option<Uuid>,
}

/// Opaque cursor into the public feed.
///
/// Callers never construct one from scratch or infer page boundaries from
/// batch sizes; they pass back the cursor returned in [`PostPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    before: PostId,
}

impl PageCursor {
    /// Cursor selecting posts with ids strictly below `post_id`
    pub fn before(post_id: PostId) -> Self {
        Self { before: post_id }
    }

    /// Exclusive upper bound this cursor selects below
    pub fn starts_before(&self) -> PostId {
        self.before
    }
}

/// One page of the public feed plus the cursor for the next page, `None`
/// when the feed is exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub next_cursor: Option<PageCursor>,
}

/// Trait for implementing custom post content rules
pub trait PostValidator: Send + Sync {
    /// Validate post content before it is stored (already trimmed)
    fn validate_content(&self, content: &str) -> LedgerResult<()>;
}

/// Trait for implementing custom response content rules
pub trait ResponseValidator: Send + Sync {
    /// Validate response content before it is stored (already trimmed)
    fn validate_content(&self, content: &str) -> LedgerResult<()>;
}

/// Default post validator enforcing the non-blank invariant
pub struct DefaultPostValidator;

impl PostValidator for DefaultPostValidator {
    fn validate_content(&self, content: &str) -> LedgerResult<()> {
        if content.is_empty() {
            return Err(LedgerError::EmptyContent);
        }
        Ok(())
    }
}

/// Default response validator enforcing the non-blank invariant
pub struct DefaultResponseValidator;

impl ResponseValidator for DefaultResponseValidator {
    fn validate_content(&self, content: &str) -> LedgerResult<()> {
        if content.is_empty() {
            return Err(LedgerError::EmptyContent);
        }
        Ok(())
    }
}
