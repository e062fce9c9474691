//! Interval scaling and jitter for cluster-wide sync scheduling.

use std::time::Duration;

/// Cluster size at which sync intervals begin to stretch.
const SCALE_THRESHOLD: usize = 128;

/// Scale a base interval to the cluster size.
///
/// Every member of a cluster runs its own sync loop against the same source
/// of truth, so the aggregate request rate grows with membership. The scale
/// factor is 1 up to the threshold, then `ceil(log2(size / threshold)) + 1`,
/// which keeps the source's load roughly constant as the cluster grows.
#[must_use]
pub fn scale_interval(interval: Duration, cluster_size: usize) -> Duration {
    if cluster_size <= SCALE_THRESHOLD {
        return interval;
    }
    let ratio = cluster_size as f64 / SCALE_THRESHOLD as f64;
    let factor = ratio.log2().ceil() as u32 + 1;
    interval * factor
}

/// A uniform random delay in `[0, interval)`.
#[must_use]
pub fn random_stagger(interval: Duration) -> Duration {
    let nanos = u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX);
    if nanos == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(fastrand::u64(0..nanos))
}
