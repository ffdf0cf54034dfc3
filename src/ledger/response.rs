//! Response submission and listing

use chrono::Utc;
use uuid::Uuid;

use crate::fees::FeeSplit;
use crate::identity::Identity;
use crate::traits::*;
use crate::types::*;

/// Input for responding to a post.
///
/// `gross_amount` is the full value the responder sends; the platform fee
/// is deducted from it before anything is credited to the post owner. A
/// gross of zero is a valid tip-free reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDraft {
    pub content: String,
    pub anonymous: bool,
    pub identity: Identity,
    pub gross_amount: Wei,
    pub idempotency_key: Option<Uuid>,
}

impl ResponseDraft {
    /// Start a draft with the given content and gross transfer amount
    pub fn new(content: impl Into<String>, gross_amount: Wei) -> Self {
        Self {
            content: content.into(),
            anonymous: false,
            identity: Identity::redacted(),
            gross_amount,
            idempotency_key: None,
        }
    }

    /// Request anonymity; the stored identity will be fully redacted
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Attach the responder's profile identity
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Make retries of this submission idempotent under the given key
    pub fn idempotency_key(mut self, key: Uuid) -> Self {
        self.idempotency_key = Some(key);
        self
    }
}

/// Response manager handling paid replies to posts
pub struct ResponseManager<S: FeedbackStorage> {
    storage: S,
    validator: Box<dyn ResponseValidator>,
}

impl<S: FeedbackStorage> ResponseManager<S> {
    /// Create a new response manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultResponseValidator),
        }
    }

    /// Create a new response manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn ResponseValidator>) -> Self {
        Self { storage, validator }
    }

    /// Submit a response to a post, transferring value to its owner.
    ///
    /// The fee split is computed up front; the storage layer then checks
    /// acceptance and applies the response, the post counters, and the
    /// fee accrual as one atomic step.
    pub async fn respond_to_post(
        &self,
        responder: Address,
        post_id: PostId,
        draft: ResponseDraft,
    ) -> LedgerResult<Response> {
        let content = draft.content.trim().to_string();
        self.validator.validate_content(&content)?;

        let split = FeeSplit::compute(draft.gross_amount);
        let identity = Identity::resolve(draft.anonymous, draft.identity);

        self.storage
            .append_response(NewResponse {
                ref_post_id: post_id,
                responder,
                content,
                identity,
                amount_transferred: split.net,
                fee: split.fee,
                creation_time: Utc::now(),
                idempotency_key: draft.idempotency_key,
            })
            .await
    }

    /// All responses for a post in chronological reading order
    pub async fn list_responses_for_post(&self, post_id: PostId) -> LedgerResult<Vec<Response>> {
        self.storage.list_responses_for_post(post_id).await
    }
}
