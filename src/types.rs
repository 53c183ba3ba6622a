//! Shared types for the surpresinhas generator.
//!
//! Games, draws, pools, combinations and provenance form the data model
//! used by the fetcher, storage and engine modules. Nothing here performs
//! I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Number of combinations a single generation may request, for every game.
pub const COUNT_BOUNDS: RangeInclusive<usize> = 1..=12;

/// A supported lottery game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// 6–12 numbers out of 1..=60.
    MegaSena,
    /// 15–20 numbers out of 1..=25.
    Lotofacil,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::MegaSena, Game::Lotofacil];

    /// Highest valid number; the valid range is always `1..=max_number()`.
    pub fn max_number(self) -> u8 {
        match self {
            Game::MegaSena => 60,
            Game::Lotofacil => 25,
        }
    }

    pub fn number_range(self) -> RangeInclusive<u8> {
        1..=self.max_number()
    }

    pub fn contains(self, number: u8) -> bool {
        self.number_range().contains(&number)
    }

    /// How many recent draws feed the weighted pool.
    pub fn recent_draws(self) -> usize {
        match self {
            Game::MegaSena => 10,
            Game::Lotofacil => 5,
        }
    }

    /// Allowed amount of numbers per combination.
    pub fn size_bounds(self) -> RangeInclusive<usize> {
        match self {
            Game::MegaSena => 6..=12,
            Game::Lotofacil => 15..=20,
        }
    }

    /// Path segment used by the draw-result API and in file names.
    pub fn slug(self) -> &'static str {
        match self {
            Game::MegaSena => "megasena",
            Game::Lotofacil => "lotofacil",
        }
    }

    pub fn snapshot_file_name(self) -> String {
        format!("cache_{}.json", self.slug())
    }

    /// Environment variable holding a full snapshot file path override.
    pub fn snapshot_path_env(self) -> &'static str {
        match self {
            Game::MegaSena => "MEGASURP_CACHE_PATH",
            Game::Lotofacil => "LOTOFACIL_CACHE_PATH",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::MegaSena => write!(f, "Mega-Sena"),
            Game::Lotofacil => write!(f, "Lotofácil"),
        }
    }
}

impl std::str::FromStr for Game {
    type Err = SurpresinhaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "megasena" | "mega-sena" | "mega" => Ok(Game::MegaSena),
            "lotofacil" | "lotofácil" | "loto" => Ok(Game::Lotofacil),
            other => Err(SurpresinhaError::InvalidInput(format!(
                "unknown game: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Draws
// ---------------------------------------------------------------------------

/// One official draw: contest number plus the numbers drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub id: u32,
    pub numbers: Vec<u8>,
}

impl DrawResult {
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Raw numbers of the most recent draws, anchored on the latest contest.
///
/// `numbers` keeps every repetition: a number drawn in three of the
/// fetched contests appears three times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDraws {
    pub latest_draw_id: u32,
    pub numbers: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Weighted multiset of candidate numbers for one game.
///
/// Weight is encoded by repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    game: Game,
    numbers: Vec<u8>,
}

impl Pool {
    /// Raw recent numbers followed by one occurrence of every valid number.
    pub fn weighted(game: Game, mut raw: Vec<u8>) -> Self {
        raw.extend(game.number_range());
        Self { game, numbers: raw }
    }

    /// Every valid number exactly once.
    pub fn uniform(game: Game) -> Self {
        Self {
            game,
            numbers: game.number_range().collect(),
        }
    }

    /// A pool taken as-is, without the uniform tail. May be empty.
    pub fn from_numbers(game: Game, numbers: Vec<u8>) -> Self {
        Self { game, numbers }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Occurrences of `number`, i.e. its weight.
    pub fn weight_of(&self, number: u8) -> usize {
        self.numbers.iter().filter(|&&n| n == number).count()
    }

    pub fn distinct_count(&self) -> usize {
        let mut seen = self.numbers.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

// ---------------------------------------------------------------------------
// Combination
// ---------------------------------------------------------------------------

/// One generated game: ascending, duplicate-free numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination(Vec<u8>);

impl Combination {
    /// Sorts the numbers. Callers guarantee they are distinct.
    pub(crate) fn from_distinct(mut numbers: Vec<u8>) -> Self {
        numbers.sort_unstable();
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{n:02}")).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Which tier produced a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceMode {
    Online,
    Cache,
    Offline,
}

/// Where the numbers of a pool came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceSource {
    LiveApi,
    Cache,
    Uniform,
}

impl ProvenanceSource {
    pub fn tag(self) -> &'static str {
        match self {
            ProvenanceSource::LiveApi => "live_api",
            ProvenanceSource::Cache => "cache",
            ProvenanceSource::Uniform => "uniform",
        }
    }
}

impl fmt::Display for ProvenanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvenanceMode::Online => write!(f, "online"),
            ProvenanceMode::Cache => write!(f, "cache"),
            ProvenanceMode::Offline => write!(f, "offline"),
        }
    }
}

/// How the pool behind a generation was obtained, for display and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceInfo {
    pub mode: ProvenanceMode,
    pub source: ProvenanceSource,
    pub message: String,
}

impl fmt::Display for ProvenanceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} / {}] {}", self.mode, self.source.tag(), self.message)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Last successfully fetched raw pool for one game.
///
/// `raw_pool` never includes the uniform tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub source_tag: String,
    pub last_draw_id: u32,
    pub raw_pool: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SurpresinhaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not collect {size} distinct numbers after {attempts} picks")]
    ExhaustedAttempts { size: usize, attempts: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for SurpresinhaError {
    fn from(e: reqwest::Error) -> Self {
        SurpresinhaError::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SurpresinhaError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
