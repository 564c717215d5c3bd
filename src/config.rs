use std::env;

const DEFAULT_GITHUB_SEARCH_URL: &str = "https://api.github.com/search/repositories";
const DEFAULT_DATABASE_URL: &str = "sqlite:favorites.db";
const DEFAULT_DEBOUNCE_MS: u64 = 600;

/// Represents the application configuration.
#[derive(Debug)]
pub struct Config {
    /// The URL of the GitHub repository search endpoint.
    pub github_search_url: String,
    /// The URL of the database holding the favorites.
    pub database_url: String,
    /// How long the input must stay unchanged before a search starts, in
    /// milliseconds.
    pub debounce_ms: u64,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    pub fn from_env() -> Self {
        Self {
            github_search_url: env::var("GITHUB_SEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_SEARCH_URL.to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            debounce_ms: env::var("DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DEBOUNCE_MS),
        }
    }
}
