use clap::Parser;
use tracing::warn;

#[derive(Clone, Debug, Parser)]
#[command(name = "tallysheet")]
pub struct Config {
    #[arg(long, env = "TALLYSHEET_PORT", default_value_t = 7410)]
    pub port: u16,

    #[arg(long, env = "TALLYSHEET_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Number of generated timesheets each new session starts with.
    #[arg(long, env = "TALLYSHEET_DATASET_SIZE", default_value_t = 200)]
    pub dataset_size: u32,

    /// Sessions kept in memory before the oldest is evicted.
    #[arg(long, env = "TALLYSHEET_MAX_SESSIONS", default_value_t = 1000)]
    pub max_sessions: usize,

    #[arg(long, env = "TALLYSHEET_DEFAULT_PAGE_SIZE", default_value_t = 5)]
    pub default_page_size: usize,

    /// Serve requests without a bearer token from a shared anonymous session.
    #[arg(long, env = "TALLYSHEET_ALLOW_ANONYMOUS", default_value_t = false)]
    pub allow_anonymous: bool,

    #[arg(long, env = "TALLYSHEET_SIMULATED_LATENCY_MS", default_value_t = 0)]
    pub simulated_latency_ms: u64,

    #[arg(long, env = "TALLYSHEET_CORS_ALLOW_ANY_ORIGIN", default_value_t = false)]
    pub cors_allow_any_origin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 7410,
            log_level: "info".to_string(),
            dataset_size: 200,
            max_sessions: 1000,
            default_page_size: 5,
            allow_anonymous: false,
            simulated_latency_ms: 0,
            cors_allow_any_origin: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let config = <Self as Parser>::parse();
        config.validate();
        config
    }

    pub fn log_startup_warnings(&self) {
        if self.allow_anonymous {
            warn!("TALLYSHEET_ALLOW_ANONYMOUS is set, requests without a bearer token share one session");
        }
        if self.cors_allow_any_origin {
            warn!("CORS is open to any origin");
        }
    }

    fn validate(&self) {
        assert!(
            self.dataset_size > 0,
            "TALLYSHEET_DATASET_SIZE must be greater than 0"
        );
        assert!(
            self.max_sessions > 0,
            "TALLYSHEET_MAX_SESSIONS must be greater than 0"
        );
        assert!(
            self.default_page_size > 0,
            "TALLYSHEET_DEFAULT_PAGE_SIZE must be greater than 0"
        );
    }
}
