use std::env;
use std::path::PathBuf;

/// Which backend the dashboard points at. Selected with `DASHBOARD_ENV`;
/// anything unrecognized falls back to production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    Local,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "staging" => Environment::Staging,
            "local" => Environment::Local,
            _ => Environment::Production,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Local => "local",
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Environment::Production => "https://api.metrics.example.com",
            Environment::Staging => "https://staging-api.metrics.example.com",
            Environment::Local => "http://127.0.0.1:9000",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub base_url: String,
    /// Passed through verbatim to the API; never logged.
    pub api_key: String,
    pub snapshot_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let environment = Environment::parse(&env::var("DASHBOARD_ENV").unwrap_or_default());
        let base_url = env::var("METRICS_BASE_URL")
            .unwrap_or_else(|_| environment.default_base_url().to_owned());
        let api_key = env::var("METRICS_API_KEY").unwrap_or_default();
        let snapshot_path = env::var("SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/payload.json"));
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        Self {
            environment,
            base_url,
            api_key,
            snapshot_path,
            port,
        }
    }
}
