//! Generation history.
//!
//! Each generation is written to its own pretty-printed JSON document named
//! `surpresinhas_<YYYYmmdd_HHMMSS_mmm>.json`, so lexicographic order of the
//! file names is chronological order. Generations sharing a millisecond get
//! a zero-padded `_NNN` suffix, which keeps that ordering.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::StorageConfig;
use crate::types::{Combination, Game, ProvenanceInfo, Result, SurpresinhaError};

pub const FILE_PREFIX: &str = "surpresinhas_";

/// Suffixed names tried before giving up on a crowded millisecond.
const MAX_NAME_COLLISIONS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMeta {
    pub criado_em: NaiveDateTime,
    pub seed: Option<u64>,
    pub qtd_surpresinhas: usize,
    pub qtd_dezenas: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jogo: Option<Game>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proveniencia: Option<ProvenanceInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub meta: HistoryMeta,
    pub surpresinhas: Vec<Combination>,
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self::new(
            cfg.history_dir
                .clone()
                .unwrap_or_else(super::default_history_dir),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one generation and return the file it landed in.
    pub fn save(
        &self,
        game: Game,
        combinations: &[Combination],
        size: usize,
        seed: Option<u64>,
        provenance: &ProvenanceInfo,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SurpresinhaError::Storage(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let now = Local::now();

        let entry = HistoryEntry {
            meta: HistoryMeta {
                criado_em: now.naive_local().with_nanosecond(0).unwrap_or(now.naive_local()),
                seed,
                qtd_surpresinhas: combinations.len(),
                qtd_dezenas: size,
                jogo: Some(game),
                proveniencia: Some(provenance.clone()),
            },
            surpresinhas: combinations.to_vec(),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| SurpresinhaError::Storage(format!("failed to serialise history: {e}")))?;
        let stamp = now.format("%Y%m%d_%H%M%S_%3f").to_string();
        let (path, mut file) = self.create_unique(&stamp)?;
        file.write_all(json.as_bytes()).map_err(|e| {
            SurpresinhaError::Storage(format!("failed to write {}: {e}", path.display()))
        })?;

        info!(path = %path.display(), count = combinations.len(), "History saved");
        Ok(path)
    }

    /// Create a history file that did not exist before; never overwrites.
    fn create_unique(&self, stamp: &str) -> Result<(PathBuf, File)> {
        for attempt in 0..MAX_NAME_COLLISIONS {
            let name = if attempt == 0 {
                format!("{FILE_PREFIX}{stamp}.json")
            } else {
                format!("{FILE_PREFIX}{stamp}_{attempt:03}.json")
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(SurpresinhaError::Storage(format!(
                        "failed to create {}: {e}",
                        path.display()
                    )))
                }
            }
        }
        Err(SurpresinhaError::Storage(format!(
            "no free history file name for {stamp} in {}",
            self.dir.display()
        )))
    }

    pub fn load(path: &Path) -> Result<HistoryEntry> {
        let json = fs::read_to_string(path).map_err(|e| {
            SurpresinhaError::Storage(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            SurpresinhaError::Storage(format!("failed to parse {}: {e}", path.display()))
        })
    }
}
