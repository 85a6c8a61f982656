// Source adapters: fetch raw draw results over HTTP and normalize them
// into a `DrawHistory`.
//
// Each game has its own adapter because the upstream schemas are unrelated
// and drift independently. All adapters share the same contract: one
// outbound request per call, row-tolerant parsing, and a typed failure when
// the page structure itself cannot be located.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, GameId, HttpConfig};
use crate::model::DrawHistory;

pub mod lotofacil;
pub mod megasena;

pub use lotofacil::LotofacilSource;
pub use megasena::MegaSenaSource;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, or timeout failure. Retryable by the caller.
    #[error("network error fetching {game} results: {source}")]
    Network {
        game: GameId,
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status. Retryable.
    #[error("{game} endpoint returned HTTP {status}")]
    HttpStatus {
        game: GameId,
        status: reqwest::StatusCode,
    },

    /// The expected structural anchor was not found in the response. The
    /// upstream layout changed; retrying will not help, the adapter needs
    /// maintenance.
    #[error("unexpected {game} response layout: {detail}")]
    StructuralMismatch { game: GameId, detail: String },
}

impl FetchError {
    /// Whether the caller may reasonably retry the fetch.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::StructuralMismatch { .. })
    }
}

// ---------------------------------------------------------------------------
// DrawSource trait
// ---------------------------------------------------------------------------

/// Capability: produce a `DrawHistory` for one game.
///
/// Implementations perform exactly one outbound request per call and never
/// retry internally; retry policy belongs to the caller.
#[async_trait]
pub trait DrawSource: Send + Sync {
    fn game(&self) -> GameId;

    /// Fetch and parse the full available history, ascending by draw
    /// number. Malformed rows are skipped; a missing structural anchor
    /// fails the whole fetch.
    async fn fetch_history(&self) -> Result<DrawHistory, FetchError>;
}

/// Build the adapter for a game using the config's profile and HTTP
/// settings.
pub fn source_for(config: &Config, game: GameId) -> Box<dyn DrawSource> {
    let profile = config.profile(game);
    match game {
        GameId::MegaSena => Box::new(MegaSenaSource::new(
            &config.http,
            profile.source_url.clone(),
            profile.draw_size,
            profile.universe_max,
        )),
        GameId::Lotofacil => Box::new(LotofacilSource::new(
            &config.http,
            profile.source_url.clone(),
            profile.draw_size,
            profile.universe_max,
        )),
    }
}

// ---------------------------------------------------------------------------
// Shared HTTP plumbing
// ---------------------------------------------------------------------------

/// Build the shared reqwest client: browser-like user agent and a hard
/// request timeout. The timeout is the pipeline's only cancellation point.
pub(crate) fn build_client(http: &HttpConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(http.user_agent.clone())
        .timeout(std::time::Duration::from_secs(http.timeout_secs))
        .build()
        // Builder only fails on TLS backend misconfiguration.
        .unwrap_or_default()
}

/// Perform the single GET for an adapter and return the response body.
pub(crate) async fn get_body(
    client: &reqwest::Client,
    url: &str,
    game: GameId,
) -> Result<String, FetchError> {
    debug!(%game, url, "fetching draw history");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Network { game, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus { game, status });
    }

    response
        .text()
        .await
        .map_err(|source| FetchError::Network { game, source })
}

// ---------------------------------------------------------------------------
// Shared row normalization
// ---------------------------------------------------------------------------

/// Validate one candidate row's drawn numbers: exact count, no duplicates,
/// all within `1..=universe_max`. Returns `None` (row dropped) on any
/// violation.
pub(crate) fn normalize_numbers(
    game: GameId,
    draw_number: u32,
    numbers: Vec<u8>,
    draw_size: usize,
    universe_max: u8,
) -> Option<Vec<u8>> {
    if numbers.len() != draw_size {
        warn!(
            %game,
            draw_number,
            got = numbers.len(),
            expected = draw_size,
            "skipping row: wrong number count"
        );
        return None;
    }

    if numbers.iter().any(|&n| n < 1 || n > universe_max) {
        warn!(%game, draw_number, "skipping row: number outside 1..={universe_max}");
        return None;
    }

    let mut seen = [false; 256];
    for &n in &numbers {
        if seen[n as usize] {
            warn!(%game, draw_number, number = n, "skipping row: duplicate number");
            return None;
        }
        seen[n as usize] = true;
    }

    Some(numbers)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_valid_row() {
        let numbers = normalize_numbers(GameId::MegaSena, 1, vec![4, 18, 29, 33, 41, 56], 6, 60);
        assert_eq!(numbers, Some(vec![4, 18, 29, 33, 41, 56]));
    }

    #[test]
    fn normalize_rejects_wrong_count() {
        assert!(normalize_numbers(GameId::MegaSena, 1, vec![1, 2, 3], 6, 60).is_none());
    }

    #[test]
    fn normalize_rejects_duplicates() {
        assert!(normalize_numbers(GameId::MegaSena, 1, vec![4, 4, 29, 33, 41, 56], 6, 60).is_none());
    }

    #[test]
    fn normalize_rejects_out_of_range() {
        assert!(normalize_numbers(GameId::Lotofacil, 1, vec![1, 2, 3, 26], 4, 25).is_none());
        assert!(normalize_numbers(GameId::Lotofacil, 1, vec![0, 2, 3, 4], 4, 25).is_none());
    }

    #[test]
    fn structural_mismatch_is_not_retryable() {
        let err = FetchError::StructuralMismatch {
            game: GameId::MegaSena,
            detail: "anchor not found".into(),
        };
        assert!(!err.is_retryable());

        let err = FetchError::HttpStatus {
            game: GameId::MegaSena,
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert!(err.is_retryable());
    }
}
