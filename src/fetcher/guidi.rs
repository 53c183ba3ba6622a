//! Guidi lottery API client.
//!
//! Public, unauthenticated JSON API serving official Caixa results.
//!
//! API: `https://api.guidi.dev.br/loteria/{game}/ultimo` (latest draw)
//!      `https://api.guidi.dev.br/loteria/{game}/{contest}` (one draw)
//! Auth: None required.
//! Fields used: `numero` (contest number), `listaDezenas` (numeral strings,
//! e.g. `["04", "17", "42"]`; absent or null for draws not yet published).

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::ResultFetcher;
use crate::types::{DrawResult, Game, Result, SurpresinhaError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api.guidi.dev.br/loteria";

pub const DEFAULT_USER_AGENT: &str = "surpresinhas/0.1.0 (lottery-combination-generator)";

/// Per-request timeout. A timed-out call is a tier failure, never retried.
const REQUEST_TIMEOUT_SECS: u64 = 15;

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GuidiDraw {
    /// Contest number. Usually an integer, occasionally a numeric string.
    #[serde(default)]
    numero: Option<serde_json::Value>,

    /// Numerals, as strings (`"04"`) or plain integers.
    #[serde(default, rename = "listaDezenas")]
    lista_dezenas: Option<Vec<serde_json::Value>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GuidiClient {
    http: Client,
    base_url: String,
}

impl GuidiClient {
    pub fn new(base_url: Option<String>, user_agent: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .build()?;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, game: Game, path: &str) -> String {
        format!("{}/{}/{path}", self.base_url, game.slug())
    }

    /// GET a draw document; non-2xx and undecodable bodies are `Network`.
    async fn fetch(&self, url: &str) -> Result<GuidiDraw> {
        debug!(url = %url, "Fetching draw");

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SurpresinhaError::Network(format!(
                "draw API returned {status} for {url}"
            )));
        }

        Ok(resp.json::<GuidiDraw>().await?)
    }

    /// Non-negative integer from a JSON number or numeric string.
    fn parse_integer(value: &serde_json::Value) -> Option<u64> {
        match value {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn parse_draw_id(value: Option<&serde_json::Value>) -> Option<u32> {
        Self::parse_integer(value?).and_then(|v| u32::try_from(v).ok())
    }

    /// Convert numerals to numbers, rejecting anything outside the game's
    /// range.
    fn parse_numbers(game: Game, raw: &[serde_json::Value]) -> Result<Vec<u8>> {
        raw.iter()
            .map(|value| -> Result<u8> {
                let n = Self::parse_integer(value)
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| {
                        SurpresinhaError::DataUnavailable(format!(
                            "invalid number {value} in {game} draw"
                        ))
                    })?;
                if !game.contains(n) {
                    return Err(SurpresinhaError::DataUnavailable(format!(
                        "number {n} outside the {game} range"
                    )));
                }
                Ok(n)
            })
            .collect()
    }
}

#[async_trait]
impl ResultFetcher for GuidiClient {
    async fn latest_draw_id(&self, game: Game) -> Result<u32> {
        let url = self.url(game, "ultimo");
        let body = self.fetch(&url).await?;
        Self::parse_draw_id(body.numero.as_ref()).ok_or_else(|| {
            SurpresinhaError::DataUnavailable(format!("latest {game} draw has no contest number"))
        })
    }

    async fn draw(&self, game: Game, id: u32) -> Result<DrawResult> {
        let url = self.url(game, &id.to_string());
        let body = self.fetch(&url).await?;
        let numbers = Self::parse_numbers(game, body.lista_dezenas.as_deref().unwrap_or_default())?;
        Ok(DrawResult { id, numbers })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
