//! Background sweep of aged-out returned files.

use std::sync::Arc;
use std::time::Duration;

use crate::files::FileStore;

/// Spawn the periodic sweep task. The first tick fires immediately, so
/// files left over from a previous run are reclaimed at startup.
pub fn spawn(files: Arc<FileStore>, max_age: Duration, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let files = Arc::clone(&files);
            let swept = tokio::task::spawn_blocking(move || files.sweep_older_than(max_age)).await;
            match swept {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "swept expired files");
                    }
                }
                Err(e) => tracing::warn!("sweep task failed: {}", e),
            }
        }
    });
}
