// Mega-Sena source adapter.
//
// The results site publishes history as an HTML page: an `<h2>Resultados
// anteriores</h2>` heading followed by a sibling `<table>` where each row
// holds a "Concurso N" link and six `<li class="ball">` numbers. The page
// is semi-structured and drifts without warning, so parsing is row-tolerant
// and only a missing heading/table fails the fetch.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::warn;

use crate::config::{GameId, HttpConfig};
use crate::model::{DrawHistory, DrawRecord};

use super::{build_client, get_body, normalize_numbers, DrawSource, FetchError};

const RESULTS_HEADING: &str = "Resultados anteriores";

static H2: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static BALL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.ball").expect("valid selector"));

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

pub struct MegaSenaSource {
    client: reqwest::Client,
    url: String,
    draw_size: usize,
    universe_max: u8,
}

impl MegaSenaSource {
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
impl DrawSource for MegaSenaSource {
    fn game(&self) -> GameId {
        GameId::MegaSena
    }

    async fn fetch_history(&self) -> Result<DrawHistory, FetchError> {
        let body = get_body(&self.client, &self.url, self.game()).await?;
        parse_results_page(&body, self.draw_size, self.universe_max)
    }
}

// ---------------------------------------------------------------------------
// HTML parsing
// ---------------------------------------------------------------------------

/// Parse the downloaded results page into a history, ascending by draw
/// number. Sync on purpose: `scraper::Html` is not `Send` and must never
/// live across an await point.
pub(crate) fn parse_results_page(
    body: &str,
    draw_size: usize,
    universe_max: u8,
) -> Result<DrawHistory, FetchError> {
    let document = Html::parse_document(body);

    let table = find_results_table(&document).ok_or_else(|| FetchError::StructuralMismatch {
        game: GameId::MegaSena,
        detail: format!("'{RESULTS_HEADING}' heading with a results table not found"),
    })?;

    let mut history: DrawHistory = table
        .select(&TR)
        .filter(|row| !is_banner_row(row))
        .filter_map(|row| parse_row(&row, draw_size, universe_max))
        .collect();

    history.sort_by_key(|record| record.draw_number);
    Ok(history)
}

/// Locate the first `<table>` sibling following the results heading.
fn find_results_table<'a>(document: &'a Html) -> Option<ElementRef<'a>> {
    document
        .select(&H2)
        .find(|h2| h2.text().collect::<String>().trim() == RESULTS_HEADING)?
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

/// Header and ad rows carry marker classes; they never contain draw data.
fn is_banner_row(row: &ElementRef<'_>) -> bool {
    row.value()
        .classes()
        .any(|class| class == "tbhead" || class == "table-banner")
}

/// Parse one `<tr>` into a record, or `None` if the row is malformed in any
/// way (missing link, non-numeric contest number, bad ball values).
fn parse_row(row: &ElementRef<'_>, draw_size: usize, universe_max: u8) -> Option<DrawRecord> {
    let cols: Vec<ElementRef<'_>> = row.select(&TD).collect();
    if cols.len() < 2 {
        return None;
    }

    let link = cols[0].select(&A).next()?;
    let label = link.text().collect::<String>();
    let draw_number: u32 = match label.replace("Concurso", "").trim().parse() {
        Ok(n) => n,
        Err(_) => {
            warn!(label = label.trim(), "skipping row: non-numeric contest number");
            return None;
        }
    };

    let mut numbers = Vec::with_capacity(draw_size);
    for ball in cols[1].select(&BALL) {
        let text = ball.text().collect::<String>();
        match text.trim().parse::<u8>() {
            Ok(n) => numbers.push(n),
            Err(_) => {
                warn!(draw_number, ball = text.trim(), "skipping row: non-numeric ball");
                return None;
            }
        }
    }

    let numbers = normalize_numbers(GameId::MegaSena, draw_number, numbers, draw_size, universe_max)?;
    Some(DrawRecord::new(draw_number, numbers))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
