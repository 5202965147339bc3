use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::{ModelLoadError, NTupleScorer, Scorer};

/// A model that could not be loaded. Kept for the status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub key: String,
    pub reason: String,
}

/// Model key to scoring model. Built once, then only read.
#[derive(Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Box<dyn Scorer>>,
    failures: Vec<LoadFailure>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model, replacing any model or failure under the same key.
    pub fn insert<S: Scorer + 'static>(&mut self, key: impl Into<String>, scorer: S) {
        let key = key.into();
        self.failures.retain(|failure| failure.key != key);
        self.models.insert(key, Box::new(scorer));
    }

    /// Parses `NTRV` weights and registers them under `key`.
    pub fn load_weights(&mut self, key: &str, bytes: &[u8]) -> Result<(), ModelLoadError> {
        match NTupleScorer::from_bytes(bytes) {
            Ok(scorer) => {
                self.insert(key, scorer);
                Ok(())
            }
            Err(err) => {
                self.record_failure(key, &err);
                Err(err)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn Scorer> {
        self.models.get(key).map(|scorer| scorer.as_ref())
    }

    /// Loaded model keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    fn record_failure(&mut self, key: &str, err: &ModelLoadError) {
        self.failures.retain(|failure| failure.key != key);
        self.failures.push(LoadFailure {
            key: key.to_string(),
            reason: err.to_string(),
        });
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.keys())
            .field("failures", &self.failures)
            .finish()
    }
}
