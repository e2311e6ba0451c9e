//! Walk a post through its lifecycle against the configured store.
//!
//! Against a running server:
//!
//! ```text
//! POST_STORE_STORE__USER=root POST_STORE_STORE__PASSWORD=root cargo run --example blog
//! ```
//!
//! Without one, using the embedded engine:
//!
//! ```text
//! POST_STORE_STORE__SCHEME=mem cargo run --example blog
//! ```

use anyhow::Context;
use post_store::prelude::*;

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config.log);

    // The library reports connection failures; deciding to exit happens here.
    let handle = config
        .store
        .configurator()
        .connect()
        .await
        .context("connecting to the post store")?;

    let repo = SurrealPostRepository::new(
        handle,
        config.store.database.clone(),
        config.repository.collection.clone(),
    );
    repo.ensure_collection_exists().await?;

    let id = repo.create_post(&Post::new("Hello", "World")).await?;
    println!("created {}", id);

    match repo.get_post(id.as_str()).await? {
        Some(post) => println!("fetched {:?}", post),
        None => println!("post {} vanished before it could be read", id),
    }

    let posts = repo.get_all_posts().await?;
    println!("{} post(s) in '{}'", posts.len(), repo.collection());

    let deleted = repo.delete_post(id.as_str()).await?;
    println!("deleted {} record(s)", deleted.deleted_count);

    match repo.get_post("not-a-valid-id").await {
        Err(Error::InvalidIdentifier(e)) => println!("rejected malformed id: {}", e),
        other => println!("unexpected lookup result: {:?}", other),
    }

    Ok(())
}
