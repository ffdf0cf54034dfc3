//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development.
///
/// One lock guards the whole store, so every compound mutation holds the
/// write guard across its full read-check-write span; this is what makes
/// [`FeedbackStorage::append_response`] atomic and keeps concurrent
/// mutations on the same post serialized. Reads take the shared guard and
/// see a single consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    posts: BTreeMap<u64, Post>,
    responses: BTreeMap<u64, Response>,
    last_post_id: u64,
    last_response_id: u64,
    fees_accrued: Wei,
    post_keys: HashMap<Uuid, PostId>,
    response_keys: HashMap<Uuid, ResponseId>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        let mut state = self.inner.write().unwrap();
        *state = StoreState::default();
    }
}

#[async_trait]
impl FeedbackStorage for MemoryStorage {
    async fn insert_post(&self, new: NewPost) -> LedgerResult<Post> {
        let mut state = self.inner.write().unwrap();

        if let Some(key) = new.idempotency_key {
            if let Some(post_id) = state.post_keys.get(&key).copied() {
                if let Some(existing) = state.posts.get(&post_id.0) {
                    return Ok(existing.clone());
                }
            }
        }

        state.last_post_id += 1;
        let post = Post {
            post_id: PostId(state.last_post_id),
            owner: new.owner,
            content: new.content,
            is_public: new.is_public,
            manual_accepting: new.manual_accepting,
            accepting_until: new.accepting_until,
            creation_time: new.creation_time,
            total_responses: 0,
            total_earnings: 0,
            identity: new.identity,
            version: 1,
        };

        if let Some(key) = new.idempotency_key {
            state.post_keys.insert(key, post.post_id);
        }
        state.posts.insert(post.post_id.0, post.clone());

        Ok(post)
    }

    async fn fetch_post(&self, post_id: PostId) -> LedgerResult<Option<Post>> {
        Ok(self.inner.read().unwrap().posts.get(&post_id.0).cloned())
    }

    async fn commit_post(&self, post: &Post, expected_version: u64) -> LedgerResult<Post> {
        // Empty content is reserved for tombstones
        if post.content.is_empty() {
            return Err(LedgerError::EmptyContent);
        }

        let mut state = self.inner.write().unwrap();
        let stored = state
            .posts
            .get_mut(&post.post_id.0)
            .ok_or(LedgerError::NotFound(post.post_id))?;

        if stored.is_tombstoned() {
            return Err(LedgerError::NotFound(post.post_id));
        }
        if stored.version != expected_version {
            return Err(LedgerError::Conflict(post.post_id));
        }

        // Only the mutable fields come from the caller; id, owner,
        // creation time, counters, and identity stay as stored.
        stored.content = post.content.clone();
        stored.is_public = post.is_public;
        stored.manual_accepting = post.manual_accepting;
        stored.accepting_until = post.accepting_until;
        stored.version += 1;

        Ok(stored.clone())
    }

    async fn tombstone_post(&self, post_id: PostId, expected_version: u64) -> LedgerResult<()> {
        let mut state = self.inner.write().unwrap();
        let stored = state
            .posts
            .get_mut(&post_id.0)
            .ok_or(LedgerError::NotFound(post_id))?;

        if stored.is_tombstoned() {
            return Err(LedgerError::NotFound(post_id));
        }
        if stored.version != expected_version {
            return Err(LedgerError::Conflict(post_id));
        }

        stored.content.clear();
        stored.version += 1;

        Ok(())
    }

    async fn list_public_posts(
        &self,
        cursor: Option<PageCursor>,
        page_size: usize,
    ) -> LedgerResult<PostPage> {
        let state = self.inner.read().unwrap();
        let upper = cursor.map(|c| c.starts_before().0).unwrap_or(u64::MAX);

        // One extra row decides whether another page exists
        let mut posts: Vec<Post> = state
            .posts
            .range(..upper)
            .rev()
            .map(|(_, post)| post)
            .filter(|post| post.is_public && !post.is_tombstoned())
            .take(page_size.saturating_add(1))
            .cloned()
            .collect();

        let next_cursor = if posts.len() > page_size {
            posts.truncate(page_size);
            posts.last().map(|post| PageCursor::before(post.post_id))
        } else {
            None
        };

        Ok(PostPage { posts, next_cursor })
    }

    async fn list_posts_by_owner(
        &self,
        owner: &Address,
        include_tombstoned: bool,
    ) -> LedgerResult<Vec<Post>> {
        let state = self.inner.read().unwrap();
        let posts = state
            .posts
            .values()
            .rev()
            .filter(|post| &post.owner == owner)
            .filter(|post| include_tombstoned || !post.is_tombstoned())
            .cloned()
            .collect();
        Ok(posts)
    }

    async fn append_response(&self, new: NewResponse) -> LedgerResult<Response> {
        let mut guard = self.inner.write().unwrap();
        let state = &mut *guard;

        if let Some(key) = new.idempotency_key {
            if let Some(response_id) = state.response_keys.get(&key).copied() {
                if let Some(existing) = state.responses.get(&response_id.0) {
                    return Ok(existing.clone());
                }
            }
        }

        let post = state
            .posts
            .get_mut(&new.ref_post_id.0)
            .ok_or(LedgerError::NotFound(new.ref_post_id))?;

        match post.acceptance_status(new.creation_time) {
            AcceptanceStatus::Deleted => return Err(LedgerError::NotFound(new.ref_post_id)),
            AcceptanceStatus::Closed => return Err(LedgerError::NotAccepting(new.ref_post_id)),
            AcceptanceStatus::Open => {}
        }

        // Validate every arithmetic step before touching anything, so a
        // failure leaves no partial state behind.
        let updated_earnings = post
            .total_earnings
            .checked_add(new.amount_transferred)
            .ok_or_else(|| LedgerError::Storage("post earnings counter overflow".to_string()))?;
        let updated_fees = state
            .fees_accrued
            .checked_add(new.fee)
            .ok_or_else(|| LedgerError::Storage("platform fee counter overflow".to_string()))?;

        state.last_response_id += 1;
        let response = Response {
            response_id: ResponseId(state.last_response_id),
            ref_post_id: new.ref_post_id,
            responder: new.responder,
            content: new.content,
            amount_transferred: new.amount_transferred,
            creation_time: new.creation_time,
            identity: new.identity,
        };

        post.total_responses += 1;
        post.total_earnings = updated_earnings;
        post.version += 1;
        state.fees_accrued = updated_fees;

        if let Some(key) = new.idempotency_key {
            state.response_keys.insert(key, response.response_id);
        }
        state.responses.insert(response.response_id.0, response.clone());

        Ok(response)
    }

    async fn list_responses_for_post(&self, post_id: PostId) -> LedgerResult<Vec<Response>> {
        let state = self.inner.read().unwrap();
        if !state.posts.contains_key(&post_id.0) {
            return Err(LedgerError::NotFound(post_id));
        }

        let mut responses: Vec<Response> = state
            .responses
            .values()
            .filter(|response| response.ref_post_id == post_id)
            .cloned()
            .collect();
        responses.sort_by_key(|response| (response.creation_time, response.response_id));

        Ok(responses)
    }

    async fn platform_fees_accrued(&self) -> LedgerResult<Wei> {
        Ok(self.inner.read().unwrap().fees_accrued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use chrono::{Duration, Utc};

    fn new_post(owner: &str, content: &str) -> NewPost {
        NewPost {
            owner: Address::from(owner),
            content: content.to_string(),
            is_public: true,
            manual_accepting: true,
            accepting_until: None,
            identity: Identity::redacted(),
            creation_time: Utc::now(),
            idempotency_key: None,
        }
    }

    fn new_response(post_id: PostId, net: Wei, fee: Wei) -> NewResponse {
        NewResponse {
            ref_post_id: post_id,
            responder: Address::from("0xresponder"),
            content: "thanks".to_string(),
            identity: Identity::redacted(),
            amount_transferred: net,
            fee,
            creation_time: Utc::now(),
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn post_ids_are_monotonic_and_never_reused() {
        let storage = MemoryStorage::new();

        let first = storage.insert_post(new_post("0xa", "one")).await.unwrap();
        let second = storage.insert_post(new_post("0xa", "two")).await.unwrap();
        assert!(second.post_id > first.post_id);

        // Tombstoning does not free the id for reuse
        storage.tombstone_post(first.post_id, first.version).await.unwrap();
        let third = storage.insert_post(new_post("0xa", "three")).await.unwrap();
        assert!(third.post_id > second.post_id);
    }

    #[tokio::test]
    async fn commit_with_stale_version_conflicts() {
        let storage = MemoryStorage::new();
        let post = storage.insert_post(new_post("0xa", "draft")).await.unwrap();

        let mut edit = post.clone();
        edit.content = "edited".to_string();
        let committed = storage.commit_post(&edit, post.version).await.unwrap();
        assert_eq!(committed.version, post.version + 1);

        // Replaying against the old version is a conflict
        let result = storage.commit_post(&edit, post.version).await;
        assert_eq!(result, Err(LedgerError::Conflict(post.post_id)));
    }

    #[tokio::test]
    async fn commit_cannot_forge_immutable_fields() {
        let storage = MemoryStorage::new();
        let post = storage.insert_post(new_post("0xa", "original")).await.unwrap();

        let mut forged = post.clone();
        forged.content = "edited".to_string();
        forged.owner = Address::from("0xmallory");
        forged.total_earnings = 1_000_000;

        let committed = storage.commit_post(&forged, post.version).await.unwrap();
        assert_eq!(committed.owner, post.owner);
        assert_eq!(committed.total_earnings, 0);
        assert_eq!(committed.content, "edited");
    }

    #[tokio::test]
    async fn append_response_updates_counters_atomically() {
        let storage = MemoryStorage::new();
        let post = storage.insert_post(new_post("0xa", "ask me")).await.unwrap();

        let response = storage
            .append_response(new_response(post.post_id, 995, 5))
            .await
            .unwrap();
        assert_eq!(response.amount_transferred, 995);

        let updated = storage.fetch_post(post.post_id).await.unwrap().unwrap();
        assert_eq!(updated.total_responses, 1);
        assert_eq!(updated.total_earnings, 995);
        assert_eq!(storage.platform_fees_accrued().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn append_to_closed_post_leaves_no_trace() {
        let storage = MemoryStorage::new();
        let mut new = new_post("0xa", "timed");
        new.manual_accepting = false;
        new.accepting_until = Some(Utc::now() - Duration::hours(1));
        let post = storage.insert_post(new).await.unwrap();

        let result = storage.append_response(new_response(post.post_id, 995, 5)).await;
        assert_eq!(result, Err(LedgerError::NotAccepting(post.post_id)));

        let unchanged = storage.fetch_post(post.post_id).await.unwrap().unwrap();
        assert_eq!(unchanged.total_responses, 0);
        assert_eq!(unchanged.total_earnings, 0);
        assert_eq!(storage.platform_fees_accrued().await.unwrap(), 0);
        assert!(storage.list_responses_for_post(post.post_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn idempotent_replay_returns_original_response() {
        let storage = MemoryStorage::new();
        let post = storage.insert_post(new_post("0xa", "ask me")).await.unwrap();

        let key = Uuid::new_v4();
        let mut new = new_response(post.post_id, 995, 5);
        new.idempotency_key = Some(key);

        let first = storage.append_response(new.clone()).await.unwrap();
        let replay = storage.append_response(new).await.unwrap();
        assert_eq!(first, replay);

        let updated = storage.fetch_post(post.post_id).await.unwrap().unwrap();
        assert_eq!(updated.total_responses, 1);
        assert_eq!(updated.total_earnings, 995);
    }

    #[tokio::test]
    async fn public_listing_skips_tombstones_and_private_posts() {
        let storage = MemoryStorage::new();
        let public = storage.insert_post(new_post("0xa", "public")).await.unwrap();

        let mut private = new_post("0xa", "private");
        private.is_public = false;
        storage.insert_post(private).await.unwrap();

        let deleted = storage.insert_post(new_post("0xa", "deleted")).await.unwrap();
        storage.tombstone_post(deleted.post_id, deleted.version).await.unwrap();

        let page = storage.list_public_posts(None, 10).await.unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].post_id, public.post_id);
        assert!(page.next_cursor.is_none());
    }
}
