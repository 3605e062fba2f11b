//! Windowed batch scheduling.
//!
//! Sources are processed in consecutive windows. All generations of a window run
//! concurrently and the next window starts once the whole window has finished, so at most
//! `window` generations are ever in flight.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use futures::future::join_all;

/// Runs `generate` over `sources` in windows of `window` and collects the results.
///
/// Every distinct source appears exactly once in the returned map. A window of zero is
/// treated as one.
pub async fn run_windowed<'a, F, Fut>(
    sources: &'a [PathBuf],
    window: usize,
    generate: F,
) -> HashMap<PathBuf, PathBuf>
where
    F: Fn(&'a Path) -> Fut,
    Fut: Future<Output = PathBuf>,
{
    let mut results = HashMap::with_capacity(sources.len());

    for chunk in sources.chunks(window.max(1)) {
        let outputs = join_all(chunk.iter().map(|source| {
            let pending = generate(source.as_path());
            async move { (source.clone(), pending.await) }
        }))
        .await;
        results.extend(outputs);
    }

    results
}
