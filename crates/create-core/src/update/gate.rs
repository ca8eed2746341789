//! Time-boxed gate deciding whether an update check should run at all
//!
//! The record is a single RFC 3339 timestamp in the per-user cache
//! directory. Reads fail open: a missing, unreadable, or torn record means
//! the check is due. Writes are best-effort; the primary command must never
//! be blocked by cache trouble.

use crate::product::ProductConfig;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

/// Checks are skipped for this long after a completed check attempt.
const CHECK_INTERVAL_HOURS: i64 = 24;

/// Persisted version-check gate keyed by product name
pub struct VersionGate {
    path: Option<PathBuf>,
}

impl VersionGate {
    /// Gate backed by `<cache_dir>/<product>/last-version-check`
    pub fn for_product<C: ProductConfig>(config: &C) -> Self {
        let path = dirs::cache_dir().map(|dir| dir.join(config.name()).join("last-version-check"));
        Self { path }
    }

    /// Gate backed by an explicit file path
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// True if no check has completed within the last 24 hours
    pub fn should_check(&self) -> bool {
        self.should_check_at(Utc::now())
    }

    pub fn should_check_at(&self, now: DateTime<Utc>) -> bool {
        let Some(path) = &self.path else {
            return true;
        };
        let Ok(content) = std::fs::read_to_string(path) else {
            return true;
        };
        match DateTime::parse_from_rfc3339(content.trim()) {
            Ok(recorded) => now - recorded.with_timezone(&Utc) >= Duration::hours(CHECK_INTERVAL_HOURS),
            Err(_) => true,
        }
    }

    /// Record that a check attempt completed; failures are swallowed
    pub fn record_check(&self) {
        self.record_check_at(Utc::now());
    }

    pub fn record_check_at(&self, now: DateTime<Utc>) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(path, now.to_rfc3339());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_in(dir: &tempfile::TempDir) -> VersionGate {
        VersionGate::at(dir.path().join("last-version-check"))
    }

    #[test]
    fn missing_record_is_due() {
        let dir = tempfile::tempdir().unwrap();
        assert!(gate_in(&dir).should_check());
    }

    #[test]
    fn fresh_record_skips_the_check() {
        let dir = tempfile::tempdir().unwrap();
        let gate = gate_in(&dir);
        let now = Utc::now();
        gate.record_check_at(now);
        assert!(!gate.should_check_at(now));
        assert!(!gate.should_check_at(now + Duration::hours(23)));
    }

    #[test]
    fn record_expires_at_exactly_24_hours() {
        let dir = tempfile::tempdir().unwrap();
        let gate = gate_in(&dir);
        let now = Utc::now();
        gate.record_check_at(now);
        assert!(!gate.should_check_at(now + Duration::hours(24) - Duration::seconds(1)));
        assert!(gate.should_check_at(now + Duration::hours(24)));
        assert!(gate.should_check_at(now + Duration::hours(48)));
    }

    #[test]
    fn garbage_record_is_due() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-version-check");
        std::fs::write(&path, "not a timestamp").unwrap();
        assert!(VersionGate::at(path).should_check());
    }

    #[test]
    fn record_overwrites_previous_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let gate = gate_in(&dir);
        let old = Utc::now() - Duration::hours(48);
        gate.record_check_at(old);
        assert!(gate.should_check());
        gate.record_check_at(Utc::now());
        assert!(!gate.should_check());
    }

    #[test]
    fn write_failure_is_swallowed() {
        // Parent is a file, so creating the record directory fails.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let gate = VersionGate::at(blocker.join("record"));
        gate.record_check();
        assert!(gate.should_check());
    }
}
