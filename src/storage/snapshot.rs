//! Per-game pool snapshots.
//!
//! The last successfully fetched raw pool of each game is kept in a single
//! JSON file:
//!
//! ```json
//! { "fonte": "live_api", "ultimo_concurso": 2750, "pool_ultimos_10": [4, 17, 42] }
//! ```
//!
//! The pool key carries the game's recency window (`pool_ultimos_10` for
//! Mega-Sena, `pool_ultimos_5` for Lotofácil). Snapshots never expire; a
//! newer successful fetch simply replaces the file.

use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::types::{Game, Result, Snapshot, SurpresinhaError};

/// Reads and atomically replaces snapshot files, one per game.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    cache_dir: PathBuf,
    /// Full file paths that win over `cache_dir` for specific games.
    overrides: HashMap<Game, PathBuf>,
}

impl SnapshotCache {
    /// Cache rooted at `cache_dir`, with no per-game overrides.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Cache directory from config (or the user data dir), plus the
    /// `MEGASURP_CACHE_PATH` / `LOTOFACIL_CACHE_PATH` file overrides.
    pub fn from_config(cfg: &StorageConfig) -> Self {
        let dir = cfg.cache_dir.clone().unwrap_or_else(super::default_data_dir);
        let mut cache = Self::new(dir);
        for game in Game::ALL {
            if let Ok(path) = std::env::var(game.snapshot_path_env()) {
                if !path.trim().is_empty() {
                    cache = cache.with_override(game, PathBuf::from(path.trim()));
                }
            }
        }
        cache
    }

    pub fn with_override(mut self, game: Game, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(game, path.into());
        self
    }

    pub fn path_for(&self, game: Game) -> PathBuf {
        self.overrides
            .get(&game)
            .cloned()
            .unwrap_or_else(|| self.cache_dir.join(game.snapshot_file_name()))
    }

    /// JSON key holding the raw pool for `game`.
    pub fn pool_key(game: Game) -> String {
        format!("pool_ultimos_{}", game.recent_draws())
    }

    /// Last snapshot for `game`, or `None` when missing or unreadable.
    ///
    /// A corrupt file is a cache miss, never an error.
    pub fn read(&self, game: Game) -> Option<Snapshot> {
        let path = self.path_for(game);
        if !path.exists() {
            debug!(game = %game, path = %path.display(), "No snapshot on disk");
            return None;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(game = %game, path = %path.display(), error = %e, "Snapshot unreadable, ignoring");
                return None;
            }
        };

        let doc: Value = match serde_json::from_str(&contents) {
            Ok(v) => v,
            Err(e) => {
                warn!(game = %game, path = %path.display(), error = %e, "Snapshot is not valid JSON, ignoring");
                return None;
            }
        };

        let snapshot = Self::from_document(game, &doc);
        if snapshot.is_none() {
            warn!(game = %game, path = %path.display(), "Snapshot has unexpected shape, ignoring");
        }
        snapshot
    }

    /// Persist `snapshot` for `game`: write a temp file next to the target,
    /// then rename it into place.
    pub fn write(&self, game: Game, snapshot: &Snapshot) -> Result<()> {
        let path = self.path_for(game);
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        fs::create_dir_all(&dir).map_err(|e| {
            SurpresinhaError::Storage(format!("failed to create {}: {e}", dir.display()))
        })?;

        let json = serde_json::to_string(&Self::to_document(game, snapshot))
            .map_err(|e| SurpresinhaError::Storage(format!("failed to serialise snapshot: {e}")))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| game.snapshot_file_name());
        let tmp = dir.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        // Any failure after the temp file may exist removes it.
        let written = fs::write(&tmp, json).and_then(|_| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(SurpresinhaError::Storage(format!(
                "failed to replace {}: {e}",
                path.display()
            )));
        }

        info!(
            game = %game,
            path = %path.display(),
            last_draw_id = snapshot.last_draw_id,
            numbers = snapshot.raw_pool.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    fn to_document(game: Game, snapshot: &Snapshot) -> Value {
        let mut doc = Map::new();
        doc.insert("fonte".into(), json!(snapshot.source_tag));
        doc.insert("ultimo_concurso".into(), json!(snapshot.last_draw_id));
        doc.insert(Self::pool_key(game), json!(snapshot.raw_pool));
        Value::Object(doc)
    }

    /// Only the pool is mandatory; `fonte` and `ultimo_concurso` fall back
    /// to neutral values. Out-of-range numbers are dropped.
    fn from_document(game: Game, doc: &Value) -> Option<Snapshot> {
        let obj = doc.as_object()?;
        let raw = obj.get(&Self::pool_key(game))?.as_array()?;

        let mut raw_pool = Vec::with_capacity(raw.len());
        let mut dropped = 0usize;
        for item in raw {
            let n = match item {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }?;
            match u8::try_from(n) {
                Ok(n) if game.contains(n) => raw_pool.push(n),
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            warn!(game = %game, dropped, "Snapshot had numbers outside the game range");
        }

        let source_tag = obj
            .get("fonte")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let last_draw_id = obj
            .get("ultimo_concurso")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);

        Some(Snapshot {
            source_tag,
            last_draw_id,
            raw_pool,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
