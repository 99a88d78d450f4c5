use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{BatchError, BatchResult};
use crate::domain::IncentiveId;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SkipFile {
    skipped_ids: BTreeSet<IncentiveId>,
    last_updated: Option<DateTime<Utc>>,
}

/// Incentives that produced no companies, persisted between batch runs.
///
/// Every change is written through to disk: the file is serialized into a temp file
/// in the same directory and renamed over the previous one.
#[derive(Debug)]
pub struct SkipList {
    path: PathBuf,
    ids: BTreeSet<IncentiveId>,
}

impl SkipList {
    /// Loads the list. A missing file is an empty list; an unreadable one is logged and
    /// treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> BatchResult<Self> {
        let path = path.into();
        let ids = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<SkipFile>(&raw) {
                Ok(file) => file.skipped_ids,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt skip-list, starting empty");
                    BTreeSet::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeSet::new(),
            Err(source) => return Err(BatchError::SkipListIo { path, source }),
        };

        debug!(path = %path.display(), skipped = ids.len(), "Skip-list loaded");
        Ok(Self { path, ids })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, incentive_id: &str) -> bool {
        self.ids.contains(incentive_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Adds an id and saves. Returns `false` if it was already present.
    pub fn insert(&mut self, incentive_id: &str) -> BatchResult<bool> {
        if !self.ids.insert(incentive_id.to_string()) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Removes an id and saves. Returns `false` if it was not present.
    pub fn remove(&mut self, incentive_id: &str) -> BatchResult<bool> {
        if !self.ids.remove(incentive_id) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> BatchResult<()> {
        let io_error = |source| BatchError::SkipListIo {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_error)?;

        let file = SkipFile {
            skipped_ids: self.ids.clone(),
            last_updated: Some(Utc::now()),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
        serde_json::to_writer_pretty(&mut temp, &file)?;
        temp.flush().map_err(io_error)?;
        temp.persist(&self.path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}
