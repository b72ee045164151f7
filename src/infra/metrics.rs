//! Lock-free operation metrics
//!
//! Uses atomics so a `Metrics` can be shared by reference without locking.
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

/// Exponential bucket boundaries (microseconds)
/// Buckets: ≤10, ≤20, ≤40, ≤80, ≤160, ≤320, ≤640, ≤1280, ≤2560, ≤5120, >5120
const BUCKET_BOUNDS: [u64; 10] = [10, 20, 40, 80, 160, 320, 640, 1280, 2560, 5120];
const NUM_BUCKETS: usize = 11;

/// Compute bucket index for a latency value using binary search
#[inline]
fn bucket_index(latency_us: u64) -> usize {
    BUCKET_BOUNDS.partition_point(|&bound| bound < latency_us)
}

/// Load all bucket values without resetting
#[inline]
fn load_buckets(buckets: &[AtomicU64; NUM_BUCKETS]) -> [u64; NUM_BUCKETS] {
    let mut result = [0u64; NUM_BUCKETS];
    for (i, bucket) in buckets.iter().enumerate() {
        result[i] = bucket.load(Ordering::Relaxed);
    }
    result
}

/// Compute percentile from histogram buckets
/// Returns the upper bound of the bucket containing the percentile
fn percentile_from_buckets(buckets: &[u64; NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = ((total as f64 * percentile).ceil() as u64).max(1);
    let mut cumulative = 0u64;

    // Upper bounds for each bucket (last bucket uses 2x the previous bound)
    const BUCKET_UPPER_BOUNDS: [u64; NUM_BUCKETS] =
        [10, 20, 40, 80, 160, 320, 640, 1280, 2560, 5120, 10240];

    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return BUCKET_UPPER_BOUNDS[i];
        }
    }
    BUCKET_UPPER_BOUNDS[NUM_BUCKETS - 1]
}

/// Codec operation kind, for latency and outcome accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Decode,
}

/// Lock-free metrics collector
#[derive(Default)]
pub struct Metrics {
    encodes_ok: AtomicU64,
    encodes_failed: AtomicU64,
    decodes_ok: AtomicU64,
    decodes_failed: AtomicU64,
    records_appended: AtomicU64,
    records_read: AtomicU64,
    /// Codec latency histogram buckets, both operations
    latency_buckets: [AtomicU64; NUM_BUCKETS],
    latency_max_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome and latency of one codec operation
    #[inline]
    pub fn record_operation(&self, op: Operation, ok: bool, elapsed: Duration) {
        let counter = match (op, ok) {
            (Operation::Encode, true) => &self.encodes_ok,
            (Operation::Encode, false) => &self.encodes_failed,
            (Operation::Decode, true) => &self.decodes_ok,
            (Operation::Decode, false) => &self.decodes_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        let latency_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.latency_buckets[bucket_index(latency_us)].fetch_add(1, Ordering::Relaxed);
        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_append(&self) {
        self.records_appended.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_read(&self, count: usize) {
        self.records_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Snapshot all counters
    pub fn summary(&self) -> MetricsSummary {
        let buckets = load_buckets(&self.latency_buckets);
        MetricsSummary {
            encodes_ok: self.encodes_ok.load(Ordering::Relaxed),
            encodes_failed: self.encodes_failed.load(Ordering::Relaxed),
            decodes_ok: self.decodes_ok.load(Ordering::Relaxed),
            decodes_failed: self.decodes_failed.load(Ordering::Relaxed),
            records_appended: self.records_appended.load(Ordering::Relaxed),
            records_read: self.records_read.load(Ordering::Relaxed),
            lat_p50_us: percentile_from_buckets(&buckets, 0.50),
            lat_p99_us: percentile_from_buckets(&buckets, 0.99),
            lat_max_us: self.latency_max_us.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSummary {
    pub encodes_ok: u64,
    pub encodes_failed: u64,
    pub decodes_ok: u64,
    pub decodes_failed: u64,
    pub records_appended: u64,
    pub records_read: u64,
    pub lat_p50_us: u64,
    pub lat_p99_us: u64,
    pub lat_max_us: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            encodes_ok = %self.encodes_ok,
            encodes_failed = %self.encodes_failed,
            decodes_ok = %self.decodes_ok,
            decodes_failed = %self.decodes_failed,
            records_appended = %self.records_appended,
            records_read = %self.records_read,
            p50_us = %self.lat_p50_us,
            p99_us = %self.lat_p99_us,
            max_us = %self.lat_max_us,
            "metrics"
        );
    }
}
