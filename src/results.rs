use std::time::Duration;

use crate::entry::Entry;

/// The output of a completed scan.
pub struct Results {
    /// Every visited entry in post-order: descendants before their folder,
    /// the scan root last.
    pub entries: Vec<Entry>,

    /// Scan statistics.
    pub stats: ScanStats,
}

/// Statistics for a completed scan.
#[derive(Debug, Clone)]
pub struct ScanStats {
    /// Number of non-folder entries emitted.
    pub files: usize,

    /// Number of folders emitted, including unexpanded ones.
    pub folders: usize,

    /// Wall-clock time from root lookup to the last emitted entry.
    pub duration: Duration,

    /// Entries emitted per second. Equals
    /// `(files + folders) / duration.as_secs_f64()`, clamped to 0 on
    /// zero-duration runs.
    pub entries_per_sec: usize,
}

impl ScanStats {
    /// Classify `entries` and compute the throughput for `duration`.
    pub(crate) fn compute(entries: &[Entry], duration: Duration) -> Self {
        let folders = entries.iter().filter(|e| e.is_folder()).count();
        let files = entries.len() - folders;
        let eps = if duration.as_secs_f64() > 0.0 {
            (entries.len() as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            files,
            folders,
            duration,
            entries_per_sec: eps,
        }
    }
}
