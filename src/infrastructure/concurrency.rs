/// Concurrency management for em-import.
/// Sizes the thread pool used to parse translation units.

use anyhow::Result;
use tracing::info;

/// Worker count: the requested number, or half the cores (minimum 1).
pub fn worker_count(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => std::cmp::max(1, num_cpus::get() / 2),
    }
}

/// Build a local rayon pool for parsing.
pub fn build_thread_pool(requested: Option<usize>) -> Result<rayon::ThreadPool> {
    let workers = worker_count(requested);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("em-import-parse-{}", i))
        .build()?;

    info!(workers, cores = num_cpus::get(), "initialized parse pool");
    Ok(pool)
}
