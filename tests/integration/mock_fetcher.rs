//! Mock draw source for integration testing.
//!
//! Provides a deterministic `ResultFetcher` that serves known draws from
//! memory, counts requests, and can be switched into a failing state from
//! test code.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use surpresinhas::fetcher::ResultFetcher;
use surpresinhas::types::{DrawResult, Game, Result, SurpresinhaError};

/// Which error the mock returns while failing.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Network,
    DataUnavailable,
}

/// An in-memory draw source.
///
/// Cloning shares state, so a clone kept by the test observes requests
/// made through the boxed copy handed to the pool builder.
#[derive(Clone)]
pub struct MockFetcher {
    draws: Arc<Mutex<HashMap<(Game, u32), Vec<u8>>>>,
    latest: Arc<Mutex<HashMap<Game, u32>>>,
    failure: Arc<Mutex<Option<Failure>>>,
    requests: Arc<Mutex<usize>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            draws: Arc::new(Mutex::new(HashMap::new())),
            latest: Arc::new(Mutex::new(HashMap::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(0)),
        }
    }

    /// Register draws for `game`; the highest id becomes the latest.
    pub fn with_draws(self, game: Game, draws: Vec<(u32, Vec<u8>)>) -> Self {
        {
            let mut store = self.draws.lock().unwrap();
            let mut latest = self.latest.lock().unwrap();
            for (id, numbers) in draws {
                store.insert((game, id), numbers);
                let entry = latest.entry(game).or_insert(id);
                *entry = (*entry).max(id);
            }
        }
        self
    }

    /// Force all subsequent requests to fail.
    pub fn set_failure(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn requests(&self) -> usize {
        *self.requests.lock().unwrap()
    }

    fn check(&self) -> Result<()> {
        *self.requests.lock().unwrap() += 1;
        match *self.failure.lock().unwrap() {
            Some(Failure::Network) => Err(SurpresinhaError::Network("mock: connection refused".into())),
            Some(Failure::DataUnavailable) => {
                Err(SurpresinhaError::DataUnavailable("mock: no numbers".into()))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResultFetcher for MockFetcher {
    async fn latest_draw_id(&self, game: Game) -> Result<u32> {
        self.check()?;
        self.latest
            .lock()
            .unwrap()
            .get(&game)
            .copied()
            .ok_or_else(|| SurpresinhaError::DataUnavailable(format!("mock: no {game} draws")))
    }

    async fn draw(&self, game: Game, id: u32) -> Result<DrawResult> {
        self.check()?;
        let numbers = self
            .draws
            .lock()
            .unwrap()
            .get(&(game, id))
            .cloned()
            .unwrap_or_default();
        Ok(DrawResult { id, numbers })
    }
}
