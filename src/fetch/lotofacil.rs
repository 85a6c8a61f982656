// Lotofácil source adapter.
//
// History comes from a community API that republishes the official Caixa
// results as JSON: a top-level array of draw objects with a `concurso`
// number and a `dezenas` array of 15 numeric strings. Field-level
// extraction is lenient per entry; only a non-array payload fails the
// fetch.

use serde_json::Value;
use tracing::warn;

use crate::config::{GameId, HttpConfig};
use crate::model::{DrawHistory, DrawRecord};

use super::{build_client, get_body, normalize_numbers, DrawSource, FetchError};

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

pub struct LotofacilSource {
    client: reqwest::Client,
    url: String,
    draw_size: usize,
    universe_max: u8,
}

impl LotofacilSource {
    pub fn new(http: &HttpConfig, url: String, draw_size: usize, universe_max: u8) -> Self {
        Self {
            client: build_client(http),
            url,
            draw_size,
            universe_max,
        }
    }
}

#[async_trait::async_trait]
impl DrawSource for LotofacilSource {
    fn game(&self) -> GameId {
        GameId::Lotofacil
    }

    async fn fetch_history(&self) -> Result<DrawHistory, FetchError> {
        let body = get_body(&self.client, &self.url, self.game()).await?;
        parse_api_payload(&body, self.draw_size, self.universe_max)
    }
}

// ---------------------------------------------------------------------------
// JSON parsing
// ---------------------------------------------------------------------------

/// Parse the API payload into a history, ascending by draw number.
pub(crate) fn parse_api_payload(
    body: &str,
    draw_size: usize,
    universe_max: u8,
) -> Result<DrawHistory, FetchError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| FetchError::StructuralMismatch {
            game: GameId::Lotofacil,
            detail: format!("response is not valid JSON: {e}"),
        })?;

    let entries = payload
        .as_array()
        .ok_or_else(|| FetchError::StructuralMismatch {
            game: GameId::Lotofacil,
            detail: "expected a top-level array of draws".into(),
        })?;

    let mut history: DrawHistory = entries
        .iter()
        .filter_map(|entry| parse_entry(entry, draw_size, universe_max))
        .collect();

    history.sort_by_key(|record| record.draw_number);
    Ok(history)
}

/// Parse one draw object, or `None` if any field is missing or fails
/// numeric coercion.
fn parse_entry(entry: &Value, draw_size: usize, universe_max: u8) -> Option<DrawRecord> {
    let Some(draw_number) = parse_draw_number(entry.get("concurso")) else {
        warn!("skipping entry: missing or non-numeric 'concurso'");
        return None;
    };

    let Some(dezenas) = entry.get("dezenas").and_then(Value::as_array) else {
        warn!(draw_number, "skipping entry: missing 'dezenas' array");
        return None;
    };

    let mut numbers = Vec::with_capacity(draw_size);
    for dezena in dezenas {
        match parse_dezena(dezena) {
            Some(n) => numbers.push(n),
            None => {
                warn!(draw_number, ?dezena, "skipping entry: non-numeric dezena");
                return None;
            }
        }
    }

    let numbers =
        normalize_numbers(GameId::Lotofacil, draw_number, numbers, draw_size, universe_max)?;
    Some(DrawRecord::new(draw_number, numbers))
}

/// `concurso` is a JSON number in practice, but older snapshots of the API
/// sent it as a string. Accept both.
fn parse_draw_number(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The API returns drawn numbers as strings ("01".."25"); accept plain
/// numbers too.
fn parse_dezena(value: &Value) -> Option<u8> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
