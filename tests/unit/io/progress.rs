//! Tests for phase progress bars

#[cfg(test)]
mod tests {
    use photomosaic::io::progress::ProgressManager;
    use rayon::prelude::*;

    // Tests a phase bar tracks its length and position
    // Verified by ignoring the total passed to start_phase
    #[test]
    fn test_phase_lifecycle() {
        let progress = ProgressManager::hidden();

        let bar = progress.start_phase("tiles", 12);
        bar.inc(5);

        assert_eq!(bar.length(), Some(12));
        assert_eq!(bar.position(), 5);
        assert_eq!(bar.prefix(), "tiles");

        ProgressManager::finish_phase(&bar, "done");
        assert!(bar.is_finished());
        assert_eq!(bar.message(), "done");
        progress.clear();
    }

    // Tests bars can be advanced from worker threads
    // Verified by counting on a thread-local copy
    #[test]
    fn test_parallel_increments() {
        let progress = ProgressManager::default();
        let bar = progress.start_phase("cells", 1_000);

        (0..1_000).into_par_iter().for_each(|_| bar.inc(1));

        assert_eq!(bar.position(), 1_000);
        bar.abandon();
        progress.clear();
    }
}
