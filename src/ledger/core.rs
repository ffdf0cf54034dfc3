//! Ledger facade orchestrating posts, responses, and fee accounting

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ledger::{PostDraft, PostManager, PostUpdate, ResponseDraft, ResponseManager};
use crate::traits::*;
use crate::types::*;

/// Upper bound applied to every requested page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// The single public entry point of the feedback ledger.
///
/// The facade owns authorization and input normalization; the managers
/// and storage behind it own the lifecycle and accounting invariants.
/// Caller identities are passed into every operation explicitly, never
/// read from ambient state. All methods take `&self`, so one `Ledger` can
/// be shared across concurrent callers.
pub struct Ledger<S: FeedbackStorage> {
    post_manager: PostManager<S>,
    response_manager: ResponseManager<S>,
}

impl<S: FeedbackStorage + Clone> Ledger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            post_manager: PostManager::new(storage.clone()),
            response_manager: ResponseManager::new(storage),
        }
    }

    /// Create a new ledger with custom content validators
    pub fn with_validators(
        storage: S,
        post_validator: Box<dyn PostValidator>,
        response_validator: Box<dyn ResponseValidator>,
    ) -> Self {
        Self {
            post_manager: PostManager::with_validator(storage.clone(), post_validator),
            response_manager: ResponseManager::with_validator(storage, response_validator),
        }
    }

    // Post operations

    /// Create a new post owned by `owner`
    pub async fn create_post(&self, owner: Address, draft: PostDraft) -> LedgerResult<Post> {
        let post = self.post_manager.create_post(owner, draft).await?;
        debug!(post_id = %post.post_id, owner = %post.owner, "post created");
        Ok(post)
    }

    /// Update a post's content, visibility, and acceptance policy.
    /// Only the owner may update; `Conflict` means the post changed
    /// concurrently and the caller should re-read and retry.
    pub async fn update_post(
        &self,
        caller: Address,
        post_id: PostId,
        update: PostUpdate,
    ) -> LedgerResult<Post> {
        let post = self.post_manager.update_post(&caller, post_id, update).await?;
        debug!(post_id = %post_id, caller = %caller, "post updated");
        Ok(post)
    }

    /// Delete a post. The record becomes a tombstone: content is cleared
    /// while id, owner, and accounting counters survive for history.
    pub async fn delete_post(&self, caller: Address, post_id: PostId) -> LedgerResult<()> {
        self.post_manager.delete_post(&caller, post_id).await?;
        debug!(post_id = %post_id, caller = %caller, "post tombstoned");
        Ok(())
    }

    /// Get a post by id, including tombstones
    pub async fn get_post(&self, post_id: PostId) -> LedgerResult<Post> {
        self.post_manager.get_post(post_id).await
    }

    /// One page of the public feed, most recent first.
    ///
    /// The requested page size is clamped to [`MAX_PAGE_SIZE`], with zero
    /// treated as one. Pass the returned cursor back to continue; `None`
    /// means the feed is exhausted.
    pub async fn list_public_posts(
        &self,
        cursor: Option<PageCursor>,
        page_size: usize,
    ) -> LedgerResult<PostPage> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.post_manager.list_public_posts(cursor, page_size).await
    }

    /// All live posts by an owner, including private ones
    pub async fn list_posts_by_owner(&self, owner: &Address) -> LedgerResult<Vec<Post>> {
        self.post_manager.list_posts_by_owner(owner).await
    }

    // Response operations

    /// Submit a response to a post, transferring `gross_amount` of which
    /// the platform fee is withheld and the rest credited to the owner
    pub async fn respond_to_post(
        &self,
        responder: Address,
        post_id: PostId,
        draft: ResponseDraft,
    ) -> LedgerResult<Response> {
        let gross = draft.gross_amount;
        let response = self
            .response_manager
            .respond_to_post(responder, post_id, draft)
            .await?;
        debug!(
            response_id = %response.response_id,
            post_id = %post_id,
            gross,
            net = response.amount_transferred,
            "response recorded"
        );
        Ok(response)
    }

    /// All responses for a post in chronological reading order
    pub async fn list_responses_for_post(&self, post_id: PostId) -> LedgerResult<Vec<Response>> {
        self.response_manager.list_responses_for_post(post_id).await
    }

    // Accounting queries

    /// Aggregate figures for an owner's dashboard.
    ///
    /// `posts` counts live posts only; responses and earnings include
    /// tombstoned history, matching the counter-preservation rule.
    pub async fn owner_stats(&self, owner: &Address) -> LedgerResult<OwnerStats> {
        let posts = self
            .post_manager
            .storage
            .list_posts_by_owner(owner, true)
            .await?;

        let mut stats = OwnerStats::default();
        for post in &posts {
            if !post.is_tombstoned() {
                stats.posts += 1;
            }
            stats.responses_received += post.total_responses;
            stats.total_earnings = stats
                .total_earnings
                .checked_add(post.total_earnings)
                .ok_or_else(|| LedgerError::Storage("owner earnings overflow".to_string()))?;
        }

        Ok(stats)
    }

    /// Running total of platform fees withheld across all responses
    pub async fn platform_fees_accrued(&self) -> LedgerResult<Wei> {
        self.post_manager.storage.platform_fees_accrued().await
    }
}

/// Aggregate owner figures backing the dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnerStats {
    /// Live (non-tombstoned) posts
    pub posts: u64,
    /// Responses received across all posts, tombstoned ones included
    pub responses_received: u64,
    /// Net earnings across all posts, tombstoned ones included
    pub total_earnings: Wei,
}
