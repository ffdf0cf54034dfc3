//! # Feedback Core
//!
//! The accounting core of an anonymous paid-feedback platform: posts that
//! accept paid responses for a bounded or open-ended window, with a fixed
//! platform fee withheld from every transfer.
//!
//! ## Features
//!
//! - **Post lifecycle**: creation, owner-only updates, and tombstoning
//!   deletion that preserves accounting history
//! - **Paid responses**: value transfers split deterministically between
//!   post owner and platform, with atomic counter updates
//! - **Identity redaction**: anonymity requests always yield a fully
//!   redacted identity
//! - **Acceptance windows**: manual or time-bounded, derived on read with
//!   no timer tasks
//! - **Cursor pagination**: stable, restartable public feed listing
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage and a concurrency-safe in-memory implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use feedback_core::utils::MemoryStorage;
//! use feedback_core::{Address, Ledger, PostDraft, ResponseDraft};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> feedback_core::LedgerResult<()> {
//! let ledger = Ledger::new(MemoryStorage::new());
//!
//! let post = ledger
//!     .create_post(
//!         Address::from("0xowner"),
//!         PostDraft::new("What should I improve?").manually_accepting(),
//!     )
//!     .await?;
//!
//! let response = ledger
//!     .respond_to_post(
//!         Address::from("0xfan"),
//!         post.post_id,
//!         ResponseDraft::new("Ship the mobile app!", 1000).anonymous(),
//!     )
//!     .await?;
//!
//! // 0.5% platform fee withheld, the rest credited to the owner
//! assert_eq!(response.amount_transferred, 995);
//! # Ok(())
//! # }
//! ```

pub mod fees;
pub mod identity;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use fees::*;
pub use identity::Identity;
pub use ledger::*;
pub use traits::*;
pub use types::*;
