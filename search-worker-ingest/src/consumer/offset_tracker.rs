//! Per-partition bookkeeping for Kafka offset commits.
//!
//! Jobs finish out of order when the worker runs more than one at a time.
//! A partition's committed offset may only move up to the lowest offset that
//! is still in flight, so a restart redelivers every job that was not
//! acknowledged.

use std::collections::{BTreeSet, HashMap};

use crate::consumer::messages::QueuePosition;

#[derive(Debug, Default)]
struct PartitionOffsets {
    in_flight: BTreeSet<i64>,
    highest_finished: Option<i64>,
    committed: Option<i64>,
}

impl PartitionOffsets {
    /// The next offset to consume once every finished job is acknowledged.
    fn commit_point(&self) -> Option<i64> {
        match self.in_flight.first() {
            Some(&lowest) => Some(lowest),
            None => self.highest_finished.map(|offset| offset + 1),
        }
    }
}

/// Tracks delivered and finished offsets for every assigned partition.
#[derive(Debug, Default)]
pub struct OffsetTracker {
    partitions: HashMap<(String, i32), PartitionOffsets>,
}

impl OffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the job at `position` was handed to the worker.
    ///
    /// The first delivery on a partition is where consumption resumed, so it
    /// also seeds the partition's committed offset.
    pub fn started(&mut self, position: &QueuePosition) {
        let partition = self.partition(position);
        partition.committed.get_or_insert(position.offset);
        partition.in_flight.insert(position.offset);
    }

    /// Record that the job at `position` was fully reported.
    ///
    /// # Returns
    ///
    /// * `Some(offset)` - The partition's commit point moved; commit `offset`
    /// * `None` - An earlier job is still in flight, nothing new to commit
    pub fn finished(&mut self, position: &QueuePosition) -> Option<i64> {
        let partition = self.partition(position);
        partition.in_flight.remove(&position.offset);
        partition.highest_finished = partition.highest_finished.max(Some(position.offset));

        let next = partition.commit_point()?;
        if partition.committed.is_some_and(|committed| committed >= next) {
            return None;
        }

        partition.committed = Some(next);
        Some(next)
    }

    /// Number of jobs delivered but not yet finished, across all partitions.
    pub fn in_flight(&self) -> usize {
        self.partitions
            .values()
            .map(|partition| partition.in_flight.len())
            .sum()
    }

    fn partition(&mut self, position: &QueuePosition) -> &mut PartitionOffsets {
        self.partitions
            .entry((position.topic.clone(), position.partition))
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(partition: i32, offset: i64) -> QueuePosition {
        QueuePosition {
            topic: "search_indexing".to_string(),
            partition,
            offset,
        }
    }

    #[test]
    fn test_in_order_commits_each_job() {
        let mut tracker = OffsetTracker::new();
        tracker.started(&at(0, 5));
        tracker.started(&at(0, 6));

        assert_eq!(tracker.finished(&at(0, 5)), Some(6));
        assert_eq!(tracker.finished(&at(0, 6)), Some(7));
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_later_job_waits_for_earlier_one() {
        let mut tracker = OffsetTracker::new();
        tracker.started(&at(0, 5));
        tracker.started(&at(0, 6));
        tracker.started(&at(0, 7));

        assert_eq!(tracker.finished(&at(0, 7)), None);
        assert_eq!(tracker.finished(&at(0, 6)), None);
        assert_eq!(tracker.finished(&at(0, 5)), Some(8));
    }

    #[test]
    fn test_unfinished_job_blocks_commits_past_it() {
        let mut tracker = OffsetTracker::new();
        tracker.started(&at(0, 4));
        tracker.started(&at(0, 5));
        tracker.started(&at(0, 6));

        assert_eq!(tracker.finished(&at(0, 4)), Some(5));
        // 5 is never finished, as when its failure record cannot be published.
        assert_eq!(tracker.finished(&at(0, 6)), None);
        tracker.started(&at(0, 7));
        assert_eq!(tracker.finished(&at(0, 7)), None);
        assert_eq!(tracker.in_flight(), 1);
    }

    #[test]
    fn test_partitions_are_independent() {
        let mut tracker = OffsetTracker::new();
        tracker.started(&at(0, 10));
        tracker.started(&at(1, 3));

        assert_eq!(tracker.finished(&at(1, 3)), Some(4));
        assert_eq!(tracker.in_flight(), 1);
        assert_eq!(tracker.finished(&at(0, 10)), Some(11));
    }
}
