use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::algorithms::floyd_warshall::{compute_all_pairs, compute_all_pairs_with_cancel};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::models::{FloorPlan, PathData};
use crate::utils::graph::build_graph;

/// Owner of computed path data. Entries are keyed by layout fingerprint and
/// handed out as shared read-only `Arc`s; a changed layout gets a new key,
/// so stale entries are never served.
#[derive(Debug, Default)]
pub struct PathDataCache {
    cache_dir: Option<PathBuf>,
    entries: RwLock<HashMap<u64, Arc<PathData>>>,
}

impl PathDataCache {
    /// In-memory cache only
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that also persists entries as JSON files in `dir`
    pub fn with_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            cache_dir: Some(dir.into()),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        match &config.cache_dir {
            Some(dir) => Self::with_dir(dir.clone()),
            None => Self::new(),
        }
    }

    /// Number of entries held in memory
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached data for the floor plan, from memory or disk
    pub fn get(&self, floor_plan: &FloorPlan) -> Option<Arc<PathData>> {
        let fingerprint = floor_plan.fingerprint();
        if let Some(data) = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&fingerprint)
        {
            return Some(Arc::clone(data));
        }

        let data = self.load_from_disk(floor_plan)?;
        let data = Arc::new(data);
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(fingerprint, Arc::clone(&data));
        Some(data)
    }

    /// Returns cached data or computes, stores and returns it
    pub fn get_or_compute(&self, floor_plan: &FloorPlan) -> Result<Arc<PathData>> {
        if let Some(data) = self.get(floor_plan) {
            debug!("path data cache hit for {:016x}", floor_plan.fingerprint());
            return Ok(data);
        }

        info!(
            "computing path data for a {}x{} floor plan",
            floor_plan.rows(),
            floor_plan.cols()
        );
        let data = compute_all_pairs(&build_graph(floor_plan));
        self.insert(data)
    }

    /// Stores computed data, writing it to disk when a directory is set.
    /// A failed write is logged; the in-memory entry is still kept.
    pub fn insert(&self, data: PathData) -> Result<Arc<PathData>> {
        let fingerprint = data.metadata.fingerprint;
        if let Some(path) = self.file_path(fingerprint) {
            if let Err(e) = write_json(&path, &data) {
                warn!("failed to save path data to {}: {}", path.display(), e);
            } else {
                info!("path data saved to {}", path.display());
            }
        }

        let data = Arc::new(data);
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(fingerprint, Arc::clone(&data));
        Ok(data)
    }

    /// Drops the entry for a fingerprint from memory and disk
    pub fn invalidate(&self, fingerprint: u64) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&fingerprint);
        if let Some(path) = self.file_path(fingerprint) {
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }

    fn file_path(&self, fingerprint: u64) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("path_data_{:016x}.json", fingerprint)))
    }

    fn load_from_disk(&self, floor_plan: &FloorPlan) -> Option<PathData> {
        let path = self.file_path(floor_plan.fingerprint())?;
        if !path.exists() {
            return None;
        }

        debug!("loading path data from {}", path.display());
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to read {}: {}, will recompute", path.display(), e);
                return None;
            }
        };
        match PathData::from_json(&json) {
            Ok(data) if data.matches(floor_plan) => Some(data),
            Ok(_) => {
                warn!("{} belongs to another layout, will recompute", path.display());
                None
            }
            Err(e) => {
                warn!("failed to parse {}: {}, will recompute", path.display(), e);
                None
            }
        }
    }
}

fn write_json(path: &Path, data: &PathData) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data.to_json()?)?;
    Ok(())
}

/// Path data computation running on its own thread, cancellable when the
/// floor plan changes before it finishes.
pub struct PathDataJob {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Result<PathData>>,
}

impl PathDataJob {
    /// Starts computing path data for a snapshot of the floor plan
    pub fn spawn(floor_plan: FloorPlan) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = thread::spawn(move || {
            let graph = build_graph(&floor_plan);
            compute_all_pairs_with_cancel(&graph, &flag)
        });
        Self { cancel, handle }
    }

    /// Asks the job to stop at its next pivot
    pub fn cancel(&self) {
        self.cancel.store(true, Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the result
    pub fn join(self) -> Result<PathData> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => {
                warn!("path data job panicked");
                Err(PlannerError::Cancelled)
            }
        }
    }
}
