//! Per-run accounting

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::catalog::ResourceKey;
use crate::error::TunerError;
use crate::patch::Aspect;

/// A failed step of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFailure {
    pub key: ResourceKey,
    pub aspect: Aspect,
    /// `TunerError::error_code` of the failure
    pub code: &'static str,
    pub message: String,
}

/// What one orchestrator pass did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub backed_up_volumes: Vec<ResourceKey>,
    pub backed_up_samples: Vec<ResourceKey>,
    pub patched_volumes: Vec<ResourceKey>,
    pub patched_samples: Vec<ResourceKey>,
    pub failures: Vec<RunFailure>,
    /// Resources without an override, left untouched
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub(crate) fn start() -> Self {
        Self {
            backed_up_volumes: Vec::new(),
            backed_up_samples: Vec::new(),
            patched_volumes: Vec::new(),
            patched_samples: Vec::new(),
            failures: Vec::new(),
            skipped: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, key: &ResourceKey, aspect: Aspect, error: &TunerError) {
        warn!("{}", error);
        self.failures.push(RunFailure {
            key: key.clone(),
            aspect,
            code: error.error_code(),
            message: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of aspects written during the run
    pub fn patched_count(&self) -> usize {
        self.patched_volumes.len() + self.patched_samples.len()
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    /// Emit the end-of-run diagnostics
    pub fn log(&self) {
        info!(
            "Sounds patched: {} volumes, {} samples ({} failures, {} without override)",
            self.patched_volumes.len(),
            self.patched_samples.len(),
            self.failures.len(),
            self.skipped
        );
        debug!("Volumes backed up: {}", join_keys(&self.backed_up_volumes));
        debug!("Samples backed up: {}", join_keys(&self.backed_up_samples));
        debug!("Volumes patched: {}", join_keys(&self.patched_volumes));
        debug!("Samples patched: {}", join_keys(&self.patched_samples));
        if let Some(ms) = self.duration_ms() {
            debug!("Run took {} ms", ms);
        }
    }
}

fn join_keys(keys: &[ResourceKey]) -> String {
    if keys.is_empty() {
        return "none".to_string();
    }
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AccessError, Category};

    #[test]
    fn test_failure_carries_error_code() {
        let key = ResourceKey::new(Category::Animal, "Cow");
        let error = TunerError::Backup {
            key: key.clone(),
            aspect: Aspect::Volume,
            source: AccessError::Gone { key: key.clone() },
        };
        let mut summary = RunSummary::start();
        summary.fail(&key, Aspect::Volume, &error);
        summary.finish();

        assert!(summary.has_failures());
        assert_eq!(summary.failures[0].code, "BACKUP_FAILURE");
        assert!(summary.duration_ms().unwrap() >= 0);
    }

    #[test]
    fn test_join_keys() {
        assert_eq!(join_keys(&[]), "none");
        let keys = [
            ResourceKey::new(Category::Vehicle, "Train Movement"),
            ResourceKey::new(Category::Misc, "UI Clicks"),
        ];
        assert_eq!(join_keys(&keys), "Vehicle.Train Movement, Misc.UI Clicks");
    }

    #[test]
    fn test_summary_serializes() {
        let mut summary = RunSummary::start();
        summary
            .patched_volumes
            .push(ResourceKey::new(Category::Vehicle, "Small Car Movement"));
        summary.finish();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["patched_volumes"][0]["id"], "Small Car Movement");
        assert_eq!(json["skipped"], 0);
    }
}
