// Configuration loading and parsing (config/games.toml).

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Game identifiers
// ---------------------------------------------------------------------------

/// The supported lottery games. Adding a game means adding a variant here,
/// a `[games.<name>]` profile in games.toml, and a source adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameId {
    MegaSena,
    Lotofacil,
}

impl GameId {
    pub const ALL: [GameId; 2] = [GameId::MegaSena, GameId::Lotofacil];

    /// Key used in config tables and cache keys.
    pub fn key(&self) -> &'static str {
        match self {
            GameId::MegaSena => "megasena",
            GameId::Lotofacil => "lotofacil",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameId::MegaSena => write!(f, "Mega-Sena"),
            GameId::Lotofacil => write!(f, "Lotofácil"),
        }
    }
}

impl FromStr for GameId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "megasena" | "mega-sena" | "mega" => Ok(GameId::MegaSena),
            "lotofacil" | "lotofácil" | "loto" => Ok(GameId::Lotofacil),
            other => Err(format!(
                "unknown game '{other}' (expected 'megasena' or 'lotofacil')"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub http: HttpConfig,
    games: HashMap<GameId, GameProfile>,
}

impl Config {
    /// Profile lookup. Every `GameId` variant is guaranteed a profile by
    /// `validate()`, so this never fails after a successful load.
    pub fn profile(&self, game: GameId) -> &GameProfile {
        &self.games[&game]
    }
}

/// Shared HTTP behavior for all source adapters.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// TTL for the fetch-result cache collaborator.
    pub cache_ttl_secs: u64,
}

/// Per-game constants: number universe, draw size, ticket bounds, prime
/// pool, price table, and the source endpoint.
#[derive(Debug, Clone)]
pub struct GameProfile {
    pub source_url: String,
    pub universe_max: u8,
    pub draw_size: usize,
    pub min_ticket_size: usize,
    pub max_ticket_size: usize,
    pub prime_pool: Vec<u8>,
    /// Ticket size → price in BRL. Sizes absent here are "not available".
    pub prices: BTreeMap<usize, f64>,
}

// ---------------------------------------------------------------------------
// games.toml raw structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire games.toml file.
#[derive(Debug, Clone, Deserialize)]
struct GamesFile {
    http: HttpSection,
    games: GamesSection,
}

#[derive(Debug, Clone, Deserialize)]
struct HttpSection {
    timeout_secs: u64,
    user_agent: String,
    cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct GamesSection {
    megasena: RawGameProfile,
    lotofacil: RawGameProfile,
}

/// Raw per-game profile. Price-table keys arrive as strings because TOML
/// table keys are strings; assembly converts them to numeric ticket sizes.
#[derive(Debug, Clone, Deserialize)]
struct RawGameProfile {
    source_url: String,
    universe_max: u8,
    draw_size: usize,
    min_ticket_size: usize,
    max_ticket_size: usize,
    prime_pool: Vec<u8>,
    prices: HashMap<String, f64>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/games.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let games_path = base_dir.join("config").join("games.toml");
    let games_text = read_file(&games_path)?;
    parse_config(&games_text, &games_path)
}

/// Parse and assemble a config from TOML text. Exposed within the crate so
/// tests can exercise loading without touching the filesystem.
pub(crate) fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: GamesFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let http = HttpConfig {
        timeout_secs: file.http.timeout_secs,
        user_agent: file.http.user_agent,
        cache_ttl_secs: file.http.cache_ttl_secs,
    };

    let mut games = HashMap::new();
    games.insert(
        GameId::MegaSena,
        assemble_profile(GameId::MegaSena, file.games.megasena)?,
    );
    games.insert(
        GameId::Lotofacil,
        assemble_profile(GameId::Lotofacil, file.games.lotofacil)?,
    );

    let config = Config { http, games };
    validate(&config)?;
    Ok(config)
}

fn assemble_profile(game: GameId, raw: RawGameProfile) -> Result<GameProfile, ConfigError> {
    let mut prices = BTreeMap::new();
    for (key, price) in raw.prices {
        let size: usize = key.parse().map_err(|_| ConfigError::ValidationError {
            field: format!("games.{}.prices", game.key()),
            message: format!("price key '{key}' is not a ticket size"),
        })?;
        prices.insert(size, price);
    }

    Ok(GameProfile {
        source_url: raw.source_url,
        universe_max: raw.universe_max,
        draw_size: raw.draw_size,
        min_ticket_size: raw.min_ticket_size,
        max_ticket_size: raw.max_ticket_size,
        prime_pool: raw.prime_pool,
        prices,
    })
}

/// Ensure config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // If config/ also doesn't exist, the app will fail to load config.
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.http.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "http.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.http.cache_ttl_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "http.cache_ttl_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    for game in GameId::ALL {
        let profile = config
            .games
            .get(&game)
            .ok_or_else(|| ConfigError::ValidationError {
                field: format!("games.{}", game.key()),
                message: "missing game profile".into(),
            })?;
        validate_profile(game, profile)?;
    }

    Ok(())
}

fn validate_profile(game: GameId, profile: &GameProfile) -> Result<(), ConfigError> {
    if profile.universe_max == 0 {
        return Err(ConfigError::ValidationError {
            field: format!("games.{}.universe_max", game.key()),
            message: "must be greater than 0".into(),
        });
    }

    if profile.draw_size == 0 || profile.draw_size > profile.universe_max as usize {
        return Err(ConfigError::ValidationError {
            field: format!("games.{}.draw_size", game.key()),
            message: format!(
                "must be in 1..={}, got {}",
                profile.universe_max, profile.draw_size
            ),
        });
    }

    if profile.min_ticket_size < profile.draw_size {
        return Err(ConfigError::ValidationError {
            field: format!("games.{}.min_ticket_size", game.key()),
            message: format!(
                "must be at least the draw size {}, got {}",
                profile.draw_size, profile.min_ticket_size
            ),
        });
    }

    if profile.max_ticket_size < profile.min_ticket_size
        || profile.max_ticket_size > profile.universe_max as usize
    {
        return Err(ConfigError::ValidationError {
            field: format!("games.{}.max_ticket_size", game.key()),
            message: format!(
                "must be in {}..={}, got {}",
                profile.min_ticket_size, profile.universe_max, profile.max_ticket_size
            ),
        });
    }

    for &p in &profile.prime_pool {
        if p < 2 || p > profile.universe_max {
            return Err(ConfigError::ValidationError {
                field: format!("games.{}.prime_pool", game.key()),
                message: format!("entry {p} outside 2..={}", profile.universe_max),
            });
        }
    }

    if profile.source_url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: format!("games.{}.source_url", game.key()),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
