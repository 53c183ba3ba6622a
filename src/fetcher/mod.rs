//! Draw-result sources.
//!
//! Defines the `ResultFetcher` trait and the HTTP implementation backed by
//! the public Guidi lottery API. Implementors only provide the two
//! primitive lookups; the recency window is assembled by the provided
//! methods.

pub mod guidi;

use async_trait::async_trait;
use tracing::debug;

use crate::types::{DrawResult, Game, RecentDraws, Result, SurpresinhaError};

/// Abstraction over remote draw-result sources.
///
/// Every failure is returned as a tagged error: `Network` for transport,
/// HTTP or JSON problems, `DataUnavailable` for well-formed responses with
/// no usable numbers. Nothing here retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultFetcher: Send + Sync {
    /// Contest number of the most recent draw.
    async fn latest_draw_id(&self, game: Game) -> Result<u32>;

    /// A single draw. An empty `numbers` list is a valid answer.
    async fn draw(&self, game: Game, id: u32) -> Result<DrawResult>;

    /// Numbers of the `k` most recent draws, newest first, anchored on
    /// the latest contest id.
    ///
    /// Draws without numbers are skipped. Fails with `DataUnavailable`
    /// only when nothing at all was collected.
    async fn recent_draws(&self, game: Game, k: usize) -> Result<RecentDraws> {
        let latest = self.latest_draw_id(game).await?;
        let window = u32::try_from(k).unwrap_or(u32::MAX);
        let oldest = latest.saturating_sub(window).saturating_add(1).max(1);

        let mut numbers = Vec::new();
        for id in (oldest..=latest).rev() {
            let draw = self.draw(game, id).await?;
            if draw.is_empty() {
                debug!(game = %game, draw_id = id, "Draw has no numbers, skipping");
                continue;
            }
            numbers.extend(draw.numbers);
        }

        if numbers.is_empty() {
            return Err(SurpresinhaError::DataUnavailable(format!(
                "no numbers found in the last {k} {game} draws (latest {latest})"
            )));
        }

        debug!(game = %game, latest, collected = numbers.len(), "Recent pool collected");
        Ok(RecentDraws {
            latest_draw_id: latest,
            numbers,
        })
    }

    /// Raw recent pool without the anchoring draw id.
    async fn recent_pool(&self, game: Game, k: usize) -> Result<Vec<u8>> {
        Ok(self.recent_draws(game, k).await?.numbers)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
