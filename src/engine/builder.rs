//! Pool construction with tiered fallback.
//!
//! Tiers are tried strictly in order and the first one that yields numbers
//! wins:
//!
//! 1. **online**: recent draws from the live API, snapshot refreshed
//! 2. **cache**: raw pool from the last snapshot, snapshot left untouched
//! 3. **offline**: every valid number exactly once
//!
//! Fetch errors stop here. Callers only ever see a pool plus provenance.

use tracing::{info, warn};

use crate::fetcher::ResultFetcher;
use crate::storage::SnapshotCache;
use crate::types::{
    Game, Pool, ProvenanceInfo, ProvenanceMode, ProvenanceSource, RecentDraws, Snapshot,
    SurpresinhaError,
};

/// Why the online tier was skipped; picks the cache-tier wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnlineFailure {
    Network,
    Data,
}

pub struct PoolBuilder {
    fetcher: Box<dyn ResultFetcher>,
    cache: SnapshotCache,
}

impl PoolBuilder {
    pub fn new(fetcher: Box<dyn ResultFetcher>, cache: SnapshotCache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Build the weighted pool for `game`. Never fails.
    pub async fn build_pool(&self, game: Game) -> (Pool, ProvenanceInfo) {
        let k = game.recent_draws();

        let failure = match self.fetcher.recent_draws(game, k).await {
            Ok(recent) => return self.online(game, recent),
            Err(SurpresinhaError::Network(reason)) => {
                warn!(game = %game, reason = %reason, "Draw API unreachable");
                OnlineFailure::Network
            }
            Err(SurpresinhaError::DataUnavailable(reason)) => {
                warn!(game = %game, reason = %reason, "Draw API returned no usable numbers");
                OnlineFailure::Data
            }
            Err(other) => {
                warn!(game = %game, error = %other, "Online tier failed");
                OnlineFailure::Data
            }
        };

        match self.cache.read(game) {
            Some(snapshot) if !snapshot.raw_pool.is_empty() => self.cached(game, snapshot, failure),
            _ => Self::offline(game),
        }
    }

    fn online(&self, game: Game, recent: RecentDraws) -> (Pool, ProvenanceInfo) {
        let snapshot = Snapshot {
            source_tag: ProvenanceSource::LiveApi.tag().to_string(),
            last_draw_id: recent.latest_draw_id,
            raw_pool: recent.numbers.clone(),
        };
        // The pool is still good when the snapshot can't be written.
        if let Err(e) = self.cache.write(game, &snapshot) {
            warn!(game = %game, error = %e, "Failed to refresh snapshot");
        }

        let pool = Pool::weighted(game, recent.numbers);
        info!(
            game = %game,
            latest_draw_id = recent.latest_draw_id,
            pool_len = pool.len(),
            "Pool built from live draws"
        );

        let provenance = ProvenanceInfo {
            mode: ProvenanceMode::Online,
            source: ProvenanceSource::LiveApi,
            message: format!(
                "Dados atualizados via internet (concurso {}). Cache da {game} atualizado.",
                recent.latest_draw_id
            ),
        };
        (pool, provenance)
    }

    fn cached(&self, game: Game, snapshot: Snapshot, failure: OnlineFailure) -> (Pool, ProvenanceInfo) {
        let last_draw_id = snapshot.last_draw_id;
        let pool = Pool::weighted(game, snapshot.raw_pool);
        info!(
            game = %game,
            last_draw_id,
            pool_len = pool.len(),
            path = %self.cache.path_for(game).display(),
            "Pool built from snapshot"
        );

        let reason = match failure {
            OnlineFailure::Network => "Não foi possível atualizar agora.",
            OnlineFailure::Data => "Falha ao processar atualização.",
        };
        let provenance = ProvenanceInfo {
            mode: ProvenanceMode::Cache,
            source: ProvenanceSource::Cache,
            message: format!(
                "{reason} Usando dados salvos localmente (cache da {game}, concurso {last_draw_id})."
            ),
        };
        (pool, provenance)
    }

    fn offline(game: Game) -> (Pool, ProvenanceInfo) {
        warn!(game = %game, "No live data and no snapshot, using uniform pool");
        let provenance = ProvenanceInfo {
            mode: ProvenanceMode::Offline,
            source: ProvenanceSource::Uniform,
            message: format!(
                "Modo offline: gerador estatístico uniforme (1–{}), sem acesso à API e sem cache disponível.",
                game.max_number()
            ),
        };
        (Pool::uniform(game), provenance)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
