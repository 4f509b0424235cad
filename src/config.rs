use anyhow::Context;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite path or `:memory:`. Todos stay in process memory when unset.
    pub database_url: Option<String>,
    pub pool_size: u32,
    pub log_filter: String,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("APP_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("APP_PORT must be a port number, got `{port}`"))?,
            None => DEFAULT_PORT,
        };
        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            Some(size) => size
                .parse()
                .with_context(|| format!("DATABASE_POOL_SIZE must be a positive integer, got `{size}`"))?,
            None => DEFAULT_POOL_SIZE,
        };
        if pool_size == 0 {
            anyhow::bail!("DATABASE_POOL_SIZE must be a positive integer, got `0`");
        }

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            pool_size,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
