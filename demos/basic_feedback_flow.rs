//! Basic feedback ledger usage example

use chrono::{Duration, Utc};
use feedback_core::utils::MemoryStorage;
use feedback_core::{fees, Address, Identity, Ledger, PostDraft, PostUpdate, ResponseDraft};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📮 Feedback Core - Basic Flow Example\n");

    // Create a new ledger with in-memory storage
    let storage = MemoryStorage::new();
    let ledger = Ledger::new(storage);

    let alice = Address::from("0xa11ce");
    let bob = Address::from("0xb0b");

    // 1. Alice publishes two posts
    println!("📝 Creating posts...");
    let timed_post = ledger
        .create_post(
            alice.clone(),
            PostDraft::new("Reviewing portfolios this week - send yours!")
                .accepting_until(Utc::now() + Duration::days(7))
                .identity(Identity::new("Alice", "alice", "https://example.com/alice.png")),
        )
        .await?;
    println!(
        "  ✓ Post {} accepting until {}",
        timed_post.post_id,
        timed_post.accepting_until.unwrap()
    );

    let anon_post = ledger
        .create_post(
            alice.clone(),
            PostDraft::new("What do people honestly think of our new landing page?")
                .manually_accepting()
                .anonymous()
                .identity(Identity::new("Alice", "alice", "https://example.com/alice.png")),
        )
        .await?;
    println!(
        "  ✓ Post {} is anonymous: {}",
        anon_post.post_id,
        anon_post.identity.is_anonymous()
    );
    println!();

    // 2. Bob responds with a paid tip
    println!("💸 Responding with value transfers...");
    let gross = fees::wei::parse_ether("0.2")?;
    let response = ledger
        .respond_to_post(
            bob.clone(),
            timed_post.post_id,
            ResponseDraft::new("Clean typography, but the hero image is too busy.", gross)
                .identity(Identity::new("Bob", "bob", "")),
        )
        .await?;
    println!(
        "  ✓ Bob sent {} ETH, Alice receives {} ETH net",
        fees::wei::format_ether(gross),
        fees::wei::format_ether(response.amount_transferred)
    );

    let anonymous_response = ledger
        .respond_to_post(
            bob.clone(),
            anon_post.post_id,
            ResponseDraft::new("Honestly? It loads too slowly.", 0).anonymous(),
        )
        .await?;
    println!(
        "  ✓ Anonymous tip-free reply recorded (redacted: {})",
        anonymous_response.identity.is_anonymous()
    );
    println!();

    // 3. Browse the public feed
    println!("📰 Public feed (most recent first):");
    let page = ledger.list_public_posts(None, 10).await?;
    for post in &page.posts {
        println!(
            "  [{}] {} - {} responses, {} ETH earned",
            post.post_id,
            post.content,
            post.total_responses,
            fees::wei::format_ether(post.total_earnings)
        );
    }
    println!();

    // 4. Alice closes the timed post early
    println!("✏️  Updating the timed post...");
    let closed = ledger
        .update_post(
            alice.clone(),
            timed_post.post_id,
            PostUpdate {
                content: "Portfolio reviews are closed - thanks everyone!".to_string(),
                is_public: true,
                manual_accepting: false,
                accepting_until: Some(Utc::now() + Duration::minutes(1)),
            },
        )
        .await?;
    println!("  ✓ Updated content: {}", closed.content);
    println!();

    // 5. Dashboard aggregates
    println!("📊 Alice's dashboard:");
    let stats = ledger.owner_stats(&alice).await?;
    println!("  Live posts:         {}", stats.posts);
    println!("  Responses received: {}", stats.responses_received);
    println!(
        "  Total earnings:     {} ETH",
        fees::wei::format_ether(stats.total_earnings)
    );
    println!(
        "  Platform fees held: {} ETH",
        fees::wei::format_ether(ledger.platform_fees_accrued().await?)
    );
    println!();

    // 6. Deleting keeps history
    println!("🪦 Deleting the anonymous post...");
    ledger.delete_post(alice.clone(), anon_post.post_id).await?;
    let tombstone = ledger.get_post(anon_post.post_id).await?;
    println!(
        "  ✓ Tombstoned (content empty: {}, responses preserved: {})",
        tombstone.content.is_empty(),
        tombstone.total_responses
    );

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
