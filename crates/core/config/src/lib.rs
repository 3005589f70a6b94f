use cached::proc_macro::cached;
use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Number of bytes in a megabyte as used by memory thresholds
pub const MEGABYTE: u64 = 1024 * 1024;

/// Environment variables and the settings key each one overrides
static ENVIRONMENT_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("CLIENT_TITLE", "client.title"),
    ("HEALTH_MEMORY_HEAP_THRESHOLD_MB", "health.heap_threshold_mb"),
    ("HEALTH_MEMORY_RSS_THRESHOLD_MB", "health.rss_threshold_mb"),
    ("HEALTH_DISK_THRESHOLD_PERCENT", "health.disk_threshold_percent"),
    ("HEALTH_DISK_PATH", "health.disk_path"),
    ("HEALTH_PING_URL", "health.ping_url"),
    ("HEALTH_PING_TIMEOUT_MS", "health.ping_timeout_ms"),
    ("SENTRY_DSN", "sentry.dsn"),
];

#[derive(Deserialize, Debug, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Client {
    pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Health {
    pub heap_threshold_mb: u64,
    pub rss_threshold_mb: u64,
    pub disk_threshold_percent: f64,
    pub disk_path: String,
    pub ping_url: String,
    pub ping_timeout_ms: u64,
}

impl Health {
    pub fn heap_threshold_bytes(&self) -> u64 {
        self.heap_threshold_mb.saturating_mul(MEGABYTE)
    }

    pub fn rss_threshold_bytes(&self) -> u64 {
        self.rss_threshold_mb.saturating_mul(MEGABYTE)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Sentry {
    pub dsn: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub server: Server,
    pub client: Client,
    pub health: Health,
    pub sentry: Sentry,
}

impl Settings {
    /// Build settings from the embedded defaults, a local `Scaffold.toml`
    /// and whatever `lookup` resolves for each known environment variable
    pub fn load<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        build(lookup)?.try_deserialize()
    }
}

fn build<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(File::from_str(
        include_str!("../Scaffold.toml"),
        FileFormat::Toml,
    ));

    if std::path::Path::new("Scaffold.toml").exists() {
        builder = builder.add_source(File::new("Scaffold.toml", FileFormat::Toml));
    }

    for (variable, key) in ENVIRONMENT_OVERRIDES {
        builder = builder.set_override_option(*key, lookup(variable))?;
    }

    builder.build()
}

pub async fn init() {
    tracing::info!(":: Scaffold Configuration ::\n{:?}", config().await);
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    Settings::load(|variable| std::env::var(variable).ok())
        .unwrap_or_else(|err| panic!("Invalid configuration: {err}"))
}

/// Configure logging and error reporting for a service
///
/// Returns the Sentry guard which must be held for the lifetime of the process.
pub async fn setup_logging(
    release: &'static str,
    service: &'static str,
) -> Option<sentry::ClientInitGuard> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    // Tests may configure more than once
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    tracing::info!("Starting {service} [{release}].");

    let settings = config().await;
    if settings.sentry.dsn.is_empty() {
        None
    } else {
        Some(sentry::init((
            settings.sentry.dsn.as_str(),
            sentry::ClientOptions {
                release: Some(release.into()),
                ..Default::default()
            },
        )))
    }
}

/// Log an error and forward it to Sentry
pub fn capture_error<E: std::error::Error + ?Sized>(error: &E) {
    tracing::error!("{error}");
    sentry::capture_error(error);
}

#[macro_export]
macro_rules! configure {
    ($application: ident) => {
        let _sentry = $crate::setup_logging(
            concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION")),
            stringify!($application),
        )
        .await;

        $crate::init().await;
    };
}
