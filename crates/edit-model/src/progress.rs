//! Progress events reported to callers.

use serde::{Deserialize, Serialize};

/// Stages of a pipeline call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStage {
    Loading,
    Processing,
    Encoding,
    Complete,
    Error,
}

impl ProcessingStage {
    /// Whether no further events follow this one.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStage::Complete | ProcessingStage::Error)
    }
}

/// One progress report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingProgress {
    pub stage: ProcessingStage,
    /// Overall progress in `[0, 100]`.
    pub percent: f64,
    /// Short human-readable status.
    pub message: String,
}

impl ProcessingProgress {
    pub fn new(stage: ProcessingStage, percent: f64, message: impl Into<String>) -> Self {
        Self {
            stage,
            percent: percent.clamp(0.0, 100.0),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_clamped() {
        let p = ProcessingProgress::new(ProcessingStage::Encoding, 140.0, "x");
        assert_eq!(p.percent, 100.0);
        let p = ProcessingProgress::new(ProcessingStage::Encoding, -3.0, "x");
        assert_eq!(p.percent, 0.0);
    }

    #[test]
    fn test_terminal_stages() {
        assert!(ProcessingStage::Complete.is_terminal());
        assert!(ProcessingStage::Error.is_terminal());
        assert!(!ProcessingStage::Encoding.is_terminal());
    }

    #[test]
    fn test_stage_serializes_lowercase() {
        let json = serde_json::to_string(&ProcessingStage::Loading).unwrap();
        assert_eq!(json, "\"loading\"");
    }
}
