//! Training progress logging.
//!
//! [`TrainingLogger`] emits `tracing` events gated by a [`Verbosity`] level,
//! so per-round output can be silenced independently of the subscriber filter.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No output.
    Silent,
    /// Warnings only.
    #[default]
    Warning,
    /// Start/finish summaries and per-round metrics.
    Info,
    /// Everything, including per-tree details.
    Debug,
}

/// Structured training logger.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
    n_rounds: usize,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
            n_rounds: 0,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Mark the start of training.
    pub fn start_training(&mut self, n_rounds: usize) {
        self.started = Some(Instant::now());
        self.n_rounds = n_rounds;
        if self.verbosity >= Verbosity::Info {
            tracing::info!(n_rounds, "training started");
        }
    }

    /// Log the training metric after a round.
    pub fn log_round(&self, round: usize, metric: &str, value: f64) {
        match self.verbosity {
            Verbosity::Debug => tracing::debug!(round, metric, value, "round finished"),
            Verbosity::Info => tracing::info!(round, metric, value, "round finished"),
            _ => {}
        }
    }

    /// Log the shape of a freshly grown tree.
    pub fn log_tree(&self, round: usize, n_nodes: usize, depth: usize) {
        if self.verbosity >= Verbosity::Debug {
            tracing::debug!(round, n_nodes, depth, "tree grown");
        }
    }

    /// Log a non-fatal training warning.
    pub fn warn(&self, message: &str) {
        if self.verbosity >= Verbosity::Warning {
            tracing::warn!("{message}");
        }
    }

    /// Mark the end of training.
    pub fn finish_training(&self) {
        if self.verbosity >= Verbosity::Info {
            let elapsed_ms = self
                .started
                .map(|t| t.elapsed().as_millis() as u64)
                .unwrap_or_default();
            tracing::info!(n_rounds = self.n_rounds, elapsed_ms, "training finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Silent < Verbosity::Warning);
        assert!(Verbosity::Warning < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Warning);
    }

    #[test]
    fn verbosity_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Verbosity::Info).unwrap(), "\"info\"");
        let v: Verbosity = serde_json::from_str("\"silent\"").unwrap();
        assert_eq!(v, Verbosity::Silent);
    }

    #[test]
    fn logger_lifecycle_without_subscriber() {
        let mut logger = TrainingLogger::new(Verbosity::Debug);
        logger.start_training(3);
        logger.log_round(0, "rmse", 1.0);
        logger.log_tree(0, 3, 1);
        logger.finish_training();
        assert_eq!(logger.verbosity(), Verbosity::Debug);
    }
}
