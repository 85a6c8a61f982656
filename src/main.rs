// Lottery analyzer entry point.
//
// Pipeline per invocation:
// 1. Initialize tracing (stderr)
// 2. Parse arguments (game, optional ticket size)
// 3. Load config (copying defaults on first run)
// 4. Fetch draw history through the cache collaborator
// 5. Analyze frequencies
// 6. Suggest a ticket and look up its price
// 7. Print the report

use loteria_assistant::analysis;
use loteria_assistant::cache::{self, MemoryCache};
use loteria_assistant::config::{self, GameId, GameProfile};
use loteria_assistant::fetch::{self, FetchError};
use loteria_assistant::pricing;
use loteria_assistant::suggest;

use anyhow::{bail, Context};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Parse arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(game_arg) = args.first() else {
        bail!(
            "usage: loteria <megasena|lotofacil> [ticket_size]\n\
             suggests a ticket from historical draw frequencies"
        );
    };
    let game: GameId = game_arg
        .parse()
        .map_err(|message: String| anyhow::anyhow!(message))?;

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    let profile = config.profile(game);
    info!(
        "Config loaded: {} universe 1..={}, tickets {}..={}",
        game, profile.universe_max, profile.min_ticket_size, profile.max_ticket_size
    );

    let target_size = match args.get(1) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("ticket size '{raw}' is not a number"))?,
        None => profile.min_ticket_size,
    };
    // The suggester does not re-validate the range; it is checked here.
    if target_size < profile.min_ticket_size || target_size > profile.max_ticket_size {
        bail!(
            "{game} tickets must have between {} and {} numbers, got {target_size}",
            profile.min_ticket_size,
            profile.max_ticket_size
        );
    }

    // 4. Fetch draw history through the cache
    let source = fetch::source_for(&config, game);
    let history_cache = MemoryCache::new();
    let history =
        match cache::fetch_cached(source.as_ref(), &history_cache, config.http.cache_ttl_secs)
            .await
        {
            Ok(history) => history,
            Err(err @ FetchError::StructuralMismatch { .. }) => {
                return Err(anyhow::Error::new(err).context(format!(
                    "the {game} results source changed its layout; the adapter needs updating"
                )));
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("could not reach the {game} results source; try again")));
            }
        };
    info!("Fetched {} draws for {}", history.len(), game);

    // 5. Analyze frequencies
    let summary = analysis::analyze(&history, profile.universe_max);

    // 6. Suggest a ticket and price it
    let mut rng = rand::rng();
    let ticket = suggest::suggest_ticket(
        &summary.most_common,
        &summary.least_common,
        &profile.prime_pool,
        profile.universe_max,
        target_size,
        &mut rng,
    );
    let price = pricing::price_for(profile, ticket.numbers.len());

    // 7. Report
    print_report(game, profile, history.len(), &summary, &ticket, price);

    Ok(())
}

fn print_report(
    game: GameId,
    profile: &GameProfile,
    draws: usize,
    summary: &analysis::FrequencySummary,
    ticket: &suggest::Suggestion,
    price: Option<f64>,
) {
    println!("Análise Estratégica - {game}");
    println!("Sorteios analisados: {draws}");
    println!();

    if summary.most_common.is_empty() {
        println!("Sem histórico disponível; sugestão puramente aleatória.");
    } else {
        println!("Mais sorteados:  {}", format_numbers(&summary.most_common));
        println!("Menos sorteado:  {}", format_numbers(&summary.least_common));
    }
    println!();

    println!("Frequência por número (1..={}):", profile.universe_max);
    for (number, count) in summary.table.iter() {
        println!("  {number:02}: {count}");
    }
    println!();

    println!("Jogo sugerido:   {}", format_numbers(&ticket.numbers));
    if ticket.is_short() {
        println!(
            "Atenção: {} números pedidos, universo comporta apenas {}.",
            ticket.requested,
            ticket.numbers.len()
        );
    }
    println!(
        "Valor estimado ({} dezenas): {}",
        ticket.numbers.len(),
        pricing::format_price(price)
    );
}

/// Zero-padded, space-separated rendering ("04 18 29 33 41 56").
fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{n:02}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Initialize tracing to stderr so stdout stays clean for the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("loteria_assistant=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
