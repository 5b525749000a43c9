//! Per-call working files.
//!
//! Every name handed out is `job-<id>-<role>.<ext>` with an id unique to the
//! call, and is remembered so [`Scratch::cleanup`] can remove it whether or
//! not the call succeeded.

use serde::Serialize;

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};

use crate::engine::EncodingEngine;

/// What a cleanup pass managed to remove.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    /// Files deleted.
    pub removed: Vec<String>,
    /// Names that were never created (e.g. the output of a failed encode).
    pub absent: Vec<String>,
    /// Files that could not be deleted, with the reason.
    pub failed: Vec<(String, String)>,
}

impl CleanupOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Working files of one pipeline call.
pub struct Scratch<'e> {
    engine: &'e dyn EncodingEngine,
    prefix: String,
    names: Vec<String>,
}

impl<'e> Scratch<'e> {
    pub fn new(engine: &'e dyn EncodingEngine) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self {
            engine,
            prefix: format!("job-{}", &id[..8]),
            names: Vec::new(),
        }
    }

    pub fn engine(&self) -> &'e dyn EncodingEngine {
        self.engine
    }

    /// Reserve a name for a file the engine will produce.
    pub fn name(&mut self, role: &str, ext: &str) -> String {
        let base = format!("{}-{role}", self.prefix);
        let mut name = format!("{base}.{ext}");
        let mut n = 1;
        while self.names.contains(&name) {
            name = format!("{base}-{n}.{ext}");
            n += 1;
        }
        self.names.push(name.clone());
        name
    }

    /// Write `data` under a fresh name and return the name.
    pub async fn stage(&mut self, role: &str, ext: &str, data: &[u8]) -> ClipsmithResult<String> {
        let name = self.name(role, ext);
        self.engine
            .write_file(&name, data)
            .await
            .map_err(|e| ClipsmithError::staging(format!("writing {name}: {e}")))?;
        Ok(name)
    }

    /// Read a produced file back.
    pub async fn read(&self, name: &str) -> ClipsmithResult<Vec<u8>> {
        let bytes = self
            .engine
            .read_file(name)
            .await
            .map_err(|e| ClipsmithError::encode(format!("reading {name}: {e}")))?;
        if bytes.is_empty() {
            return Err(ClipsmithError::encode(format!("{name} is empty")));
        }
        Ok(bytes)
    }

    /// Names reserved so far, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Delete every reserved file. Never fails; problems are reported in
    /// the outcome and logged.
    pub async fn cleanup(self) -> CleanupOutcome {
        let mut outcome = CleanupOutcome::default();
        for name in self.names {
            match self.engine.delete_file(&name).await {
                Ok(()) => outcome.removed.push(name),
                Err(ClipsmithError::FileNotFound { .. }) => outcome.absent.push(name),
                Err(ClipsmithError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    outcome.absent.push(name)
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Failed to delete working file");
                    outcome.failed.push((name, e.to_string()));
                }
            }
        }
        tracing::debug!(
            prefix = %self.prefix,
            removed = outcome.removed.len(),
            failed = outcome.failed.len(),
            "Working files cleaned up"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExecProgress;

    struct NullEngine;

    #[async_trait::async_trait]
    impl EncodingEngine for NullEngine {
        async fn load(&self) -> ClipsmithResult<()> {
            Ok(())
        }
        async fn write_file(&self, _name: &str, _data: &[u8]) -> ClipsmithResult<()> {
            Ok(())
        }
        async fn read_file(&self, name: &str) -> ClipsmithResult<Vec<u8>> {
            Err(ClipsmithError::FileNotFound { path: name.into() })
        }
        async fn delete_file(&self, name: &str) -> ClipsmithResult<()> {
            if name.ends_with(".mp4") {
                Ok(())
            } else {
                Err(ClipsmithError::engine("busy"))
            }
        }
        async fn exec(&self, _args: &[String], _progress: ExecProgress<'_>) -> ClipsmithResult<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "null"
        }
    }

    #[test]
    fn test_names_are_prefixed_and_unique() {
        let engine = NullEngine;
        let mut scratch = Scratch::new(&engine);
        let a = scratch.name("seg", "mp4");
        let b = scratch.name("seg", "mp4");
        assert_ne!(a, b);
        assert!(a.starts_with("job-"));
        assert!(a.ends_with("-seg.mp4"));
        assert!(b.ends_with("-seg-1.mp4"));

        let other = Scratch::new(&engine).name("seg", "mp4");
        assert_ne!(a, other);
    }

    #[tokio::test]
    async fn test_cleanup_records_failures() {
        let engine = NullEngine;
        let mut scratch = Scratch::new(&engine);
        let video = scratch.stage("input", "mp4", b"x").await.unwrap();
        let list = scratch.stage("list", "txt", b"file").await.unwrap();

        let outcome = scratch.cleanup().await;
        assert_eq!(outcome.removed, vec![video]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, list);
        assert!(!outcome.is_clean());
    }
}
