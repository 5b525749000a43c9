//! In-memory engine and fetcher for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_edit_model::{ProcessingProgress, ProcessingStage};
use clipsmith_pipeline::{AssetFetcher, EncodingEngine, ExecProgress, ProgressCallback};

/// Engine that records every call and "encodes" by writing a marker file to
/// the last argument.
#[derive(Default)]
pub struct ScriptedEngine {
    files: Mutex<HashMap<String, Vec<u8>>>,
    execs: Mutex<Vec<Vec<String>>>,
    loads: AtomicUsize,
    load_delay: Duration,
    exec_delay: Duration,
    failing_loads: AtomicUsize,
    failing_execs: AtomicUsize,
    fail_matching: Option<String>,
    fail_deletes: bool,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn with_exec_delay(mut self, delay: Duration) -> Self {
        self.exec_delay = delay;
        self
    }

    /// Fail the first `n` loads.
    pub fn failing_loads(self, n: usize) -> Self {
        self.failing_loads.store(n, Ordering::SeqCst);
        self
    }

    /// Fail the first `n` encodes.
    pub fn failing_execs(self, n: usize) -> Self {
        self.failing_execs.store(n, Ordering::SeqCst);
        self
    }

    /// Fail every encode whose joined arguments contain `needle`.
    pub fn failing_when(mut self, needle: &str) -> Self {
        self.fail_matching = Some(needle.to_string());
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn execs(&self) -> Vec<Vec<String>> {
        self.execs.lock().unwrap().clone()
    }

    pub fn exec_lines(&self) -> Vec<String> {
        self.execs().iter().map(|args| args.join(" ")).collect()
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    /// Most encodes ever observed running at once.
    pub fn max_concurrent_execs(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait::async_trait]
impl EncodingEngine for ScriptedEngine {
    async fn load(&self) -> ClipsmithResult<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        if Self::take_failure(&self.failing_loads) {
            return Err(ClipsmithError::engine("core failed to download"));
        }
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> ClipsmithResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), data.to_vec());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> ClipsmithResult<Vec<u8>> {
        self.file(name)
            .ok_or_else(|| ClipsmithError::FileNotFound { path: name.into() })
    }

    async fn delete_file(&self, name: &str) -> ClipsmithResult<()> {
        if self.fail_deletes {
            return Err(ClipsmithError::engine("device busy"));
        }
        match self.files.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(ClipsmithError::FileNotFound { path: name.into() }),
        }
    }

    async fn exec(&self, args: &[String], progress: ExecProgress<'_>) -> ClipsmithResult<()> {
        self.execs.lock().unwrap().push(args.to_vec());

        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(running, Ordering::SeqCst);
        progress(0.5);
        if !self.exec_delay.is_zero() {
            tokio::time::sleep(self.exec_delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        let joined = args.join(" ");
        let matched = self
            .fail_matching
            .as_deref()
            .is_some_and(|needle| joined.contains(needle));
        if matched || Self::take_failure(&self.failing_execs) {
            return Err(ClipsmithError::encode("exit status 1"));
        }

        for pair in args.windows(2) {
            if pair[0] == "-i" && pair[1].starts_with("job-") && self.file(&pair[1]).is_none() {
                return Err(ClipsmithError::encode(format!("{}: No such file", pair[1])));
            }
        }

        let output = args
            .last()
            .ok_or_else(|| ClipsmithError::encode("no output"))?;
        self.write_file(output, format!("encoded:{joined}").as_bytes())
            .await?;
        progress(1.0);
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Fetcher serving a fixed set of URLs.
#[derive(Default)]
pub struct StaticFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: &[u8]) -> Self {
        self.assets.insert(url.to_string(), bytes.to_vec());
        self
    }
}

#[async_trait::async_trait]
impl AssetFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> ClipsmithResult<Vec<u8>> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| ClipsmithError::fetch(url, "HTTP 404 Not Found"))
    }
}

/// Progress callback that records every event.
pub fn recorder() -> (Arc<Mutex<Vec<ProcessingProgress>>>, ProgressCallback) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event| sink.lock().unwrap().push(event));
    (events, callback)
}

pub fn assert_monotonic(events: &[ProcessingProgress]) {
    for pair in events.windows(2) {
        assert!(
            pair[1].percent >= pair[0].percent,
            "percent went from {} to {}",
            pair[0].percent,
            pair[1].percent
        );
    }
}

pub fn last_stage(events: &[ProcessingProgress]) -> Option<ProcessingStage> {
    events.last().map(|e| e.stage)
}

pub fn source() -> clipsmith_edit_model::MediaSource {
    clipsmith_edit_model::MediaSource::Bytes(b"source-clip".to_vec())
}
