//! Post lifecycle management

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::identity::Identity;
use crate::traits::*;
use crate::types::*;

/// Input for creating a post.
///
/// Drafts start out public, non-anonymous, and without an acceptance
/// policy; callers must pick one via [`PostDraft::manually_accepting`] or
/// [`PostDraft::accepting_until`] before submitting.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub content: String,
    pub is_public: bool,
    pub manual_accepting: bool,
    pub accepting_until: Option<DateTime<Utc>>,
    pub anonymous: bool,
    pub identity: Identity,
    pub idempotency_key: Option<Uuid>,
}

impl PostDraft {
    /// Start a draft with the given content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_public: true,
            manual_accepting: false,
            accepting_until: None,
            anonymous: false,
            identity: Identity::redacted(),
            idempotency_key: None,
        }
    }

    /// Hide the post from the public listing
    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    /// Keep accepting responses until the owner closes the post
    pub fn manually_accepting(mut self) -> Self {
        self.manual_accepting = true;
        self.accepting_until = None;
        self
    }

    /// Accept responses until the given deadline (exclusive)
    pub fn accepting_until(mut self, deadline: DateTime<Utc>) -> Self {
        self.manual_accepting = false;
        self.accepting_until = Some(deadline);
        self
    }

    /// Request anonymity; the stored identity will be fully redacted
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Attach the author's profile identity
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Make retries of this creation idempotent under the given key
    pub fn idempotency_key(mut self, key: Uuid) -> Self {
        self.idempotency_key = Some(key);
        self
    }
}

/// Input for updating a post's mutable fields. All fields are replaced as
/// a unit; identity and anonymity are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PostUpdate {
    pub content: String,
    pub is_public: bool,
    pub manual_accepting: bool,
    pub accepting_until: Option<DateTime<Utc>>,
}

/// Post manager handling creation, mutation, and listing of posts
pub struct PostManager<S: FeedbackStorage> {
    pub(crate) storage: S,
    validator: Box<dyn PostValidator>,
}

impl<S: FeedbackStorage> PostManager<S> {
    /// Create a new post manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultPostValidator),
        }
    }

    /// Create a new post manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn PostValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a new post
    pub async fn create_post(&self, owner: Address, draft: PostDraft) -> LedgerResult<Post> {
        let content = draft.content.trim().to_string();
        self.validator.validate_content(&content)?;

        let now = Utc::now();
        let accepting_until =
            resolve_schedule(draft.manual_accepting, draft.accepting_until, now)?;
        let identity = Identity::resolve(draft.anonymous, draft.identity);

        self.storage
            .insert_post(NewPost {
                owner,
                content,
                is_public: draft.is_public,
                manual_accepting: draft.manual_accepting,
                accepting_until,
                identity,
                creation_time: now,
                idempotency_key: draft.idempotency_key,
            })
            .await
    }

    /// Get a post by id, including tombstones
    pub async fn get_post(&self, post_id: PostId) -> LedgerResult<Post> {
        self.storage
            .fetch_post(post_id)
            .await?
            .ok_or(LedgerError::NotFound(post_id))
    }

    /// Update a post's content, visibility, and acceptance policy
    pub async fn update_post(
        &self,
        caller: &Address,
        post_id: PostId,
        update: PostUpdate,
    ) -> LedgerResult<Post> {
        let current = self.get_post(post_id).await?;
        if current.is_tombstoned() {
            return Err(LedgerError::NotFound(post_id));
        }
        if &current.owner != caller {
            return Err(LedgerError::NotOwner {
                caller: caller.clone(),
                post_id,
            });
        }

        let content = update.content.trim().to_string();
        self.validator.validate_content(&content)?;

        let now = Utc::now();
        let accepting_until =
            resolve_schedule(update.manual_accepting, update.accepting_until, now)?;

        let mut updated = current.clone();
        updated.content = content;
        updated.is_public = update.is_public;
        updated.manual_accepting = update.manual_accepting;
        updated.accepting_until = accepting_until;

        self.storage.commit_post(&updated, current.version).await
    }

    /// Tombstone a post, preserving its id and accounting history
    pub async fn delete_post(&self, caller: &Address, post_id: PostId) -> LedgerResult<()> {
        let current = self.get_post(post_id).await?;
        if current.is_tombstoned() {
            return Err(LedgerError::NotFound(post_id));
        }
        if &current.owner != caller {
            return Err(LedgerError::NotOwner {
                caller: caller.clone(),
                post_id,
            });
        }

        self.storage.tombstone_post(post_id, current.version).await
    }

    /// One page of the public feed
    pub async fn list_public_posts(
        &self,
        cursor: Option<PageCursor>,
        page_size: usize,
    ) -> LedgerResult<PostPage> {
        self.storage.list_public_posts(cursor, page_size).await
    }

    /// All live posts by an owner, including private ones
    pub async fn list_posts_by_owner(&self, owner: &Address) -> LedgerResult<Vec<Post>> {
        self.storage.list_posts_by_owner(owner, false).await
    }
}

/// Normalize and validate an acceptance schedule.
///
/// Manual posts carry no deadline; timed posts need one strictly in the
/// future. The same rule applies at creation and whenever an update keeps
/// or switches to timed acceptance.
fn resolve_schedule(
    manual_accepting: bool,
    accepting_until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> LedgerResult<Option<DateTime<Utc>>> {
    if manual_accepting {
        return Ok(None);
    }
    match accepting_until {
        Some(deadline) if deadline > now => Ok(Some(deadline)),
        _ => Err(LedgerError::InvalidSchedule),
    }
}
