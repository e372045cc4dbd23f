use std::time::{Duration, Instant};

/// Execution statistics for one suggestion request (or a whole batch).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Total execution time.
    pub total_time: Duration,
    /// Candidates returned by the predictor, before normalization.
    pub candidates_predicted: usize,
    /// Candidates sent to the sentiment classifier.
    pub candidates_classified: usize,
    /// Classifier calls that failed and were dropped.
    pub classification_failures: usize,
    /// Words in the final list.
    pub suggestions_returned: usize,
}

impl PipelineStats {
    /// Create a new stats tracker (call at start of operation).
    pub(crate) fn start() -> PipelineStatsBuilder {
        PipelineStatsBuilder {
            start_time: Instant::now(),
            stats: PipelineStats::default(),
        }
    }

    /// Add the counters of `other`. Timing is left alone.
    pub(crate) fn accumulate(&mut self, other: &PipelineStats) {
        self.candidates_predicted += other.candidates_predicted;
        self.candidates_classified += other.candidates_classified;
        self.classification_failures += other.classification_failures;
        self.suggestions_returned += other.suggestions_returned;
    }
}

/// Tracks timing from creation to [`finish`](Self::finish) and collects counters on the way.
pub(crate) struct PipelineStatsBuilder {
    start_time: Instant,
    stats: PipelineStats,
}

impl PipelineStatsBuilder {
    pub fn record_predicted(&mut self, count: usize) {
        self.stats.candidates_predicted = count;
    }

    pub fn record_classified(&mut self, classified: usize, failures: usize) {
        self.stats.candidates_classified = classified;
        self.stats.classification_failures = failures;
    }

    pub fn merge(&mut self, other: &PipelineStats) {
        self.stats.accumulate(other);
    }

    /// Finalize stats with the number of suggestions handed back.
    pub fn finish(mut self, suggestions_returned: usize) -> PipelineStats {
        self.stats.total_time = self.start_time.elapsed();
        self.stats.suggestions_returned = suggestions_returned;
        self.stats
    }

    /// Finalize a batch, keeping the merged per-item counts.
    pub fn finish_batch(mut self) -> PipelineStats {
        self.stats.total_time = self.start_time.elapsed();
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineStats;
    use std::time::Duration;

    #[test]
    fn records_counts_and_time() {
        let mut builder = PipelineStats::start();
        builder.record_predicted(10);
        builder.record_classified(9, 1);
        std::thread::sleep(Duration::from_millis(5));
        let stats = builder.finish(3);

        assert_eq!(stats.candidates_predicted, 10);
        assert_eq!(stats.candidates_classified, 9);
        assert_eq!(stats.classification_failures, 1);
        assert_eq!(stats.suggestions_returned, 3);
        assert!(stats.total_time >= Duration::from_millis(5));
    }

    #[test]
    fn batch_merges_item_counters() {
        let item = PipelineStats {
            candidates_predicted: 4,
            candidates_classified: 4,
            classification_failures: 1,
            suggestions_returned: 2,
            ..Default::default()
        };
        let mut builder = PipelineStats::start();
        builder.merge(&item);
        builder.merge(&item);
        let stats = builder.finish_batch();

        assert_eq!(stats.candidates_predicted, 8);
        assert_eq!(stats.classification_failures, 2);
        assert_eq!(stats.suggestions_returned, 4);
    }
}
