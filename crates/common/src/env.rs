//! Environment/runtime helpers
//!
//! Host introspection used when sizing the async runtime.

/// Number of logical CPUs available to this process, never less than 1.
pub fn available_cpus() -> usize {
    num_cpus::get().max(1)
}

/// Resolve the worker thread count: an explicit non-zero value wins,
/// otherwise one worker per available CPU.
pub fn worker_threads_or_cpus(configured: Option<usize>) -> usize {
    match configured {
        Some(n) if n > 0 => n,
        _ => available_cpus(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpus_is_positive() {
        assert!(available_cpus() >= 1);
    }

    #[test]
    fn explicit_worker_count_wins() {
        assert_eq!(worker_threads_or_cpus(Some(3)), 3);
        assert_eq!(worker_threads_or_cpus(Some(0)), available_cpus());
        assert_eq!(worker_threads_or_cpus(None), available_cpus());
    }
}
