//! Tags two pages and looks one up by a loosely matching query.
//!
//! Run with `RUST_LOG=tagstash=debug` to see cache and index traffic.

use anyhow::Result;
use tagstash::{BlobCacheConfig, MemoryIndex, TagStash};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tagstash=info")),
        )
        .init();

    let stash = TagStash::with_index(MemoryIndex::new(), BlobCacheConfig::default());

    stash
        .set("https://www.example.org/page1", &["foo", "bar", "baz"])
        .await?;
    stash
        .set("https://www.example.org/page2", &["foo", "qux", "quux"])
        .await?;

    let query = ["qux", "foo", "wah"];
    match stash.get(&query).await? {
        Some(value) => println!("best match for {query:?}: {value}"),
        None => println!("no match for {query:?}"),
    }

    for m in stash.get_matches(&query).await? {
        println!("  {} ({})", m.value, m.score);
    }

    stash.close();
    Ok(())
}
