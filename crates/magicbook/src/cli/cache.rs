//! `evict` command handler.

use super::open_cache;
use magicbook::{CacheKey, MagicBookConfig, MagicBookResult};

/// Remove the cache entry for `text`.
pub async fn evict_entry(config: &MagicBookConfig, text: &str) -> MagicBookResult<()> {
    let key = CacheKey::from_text(text);
    let cache = open_cache(config);

    if cache.evict(&key).await? {
        println!("Evicted entry \"{}\"", key);
    } else {
        println!("No entry for \"{}\"", key);
    }
    Ok(())
}
