#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub port: u16,
    pub db_max_connections: u32,
    /// Interval after which one request of the per-IP quota is replenished.
    pub rate_limit_replenish_ms: u64,
    pub rate_limit_burst: u32,
    pub cors_max_age_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 8080,
            db_max_connections: 10,
            rate_limit_replenish_ms: 100,
            rate_limit_burst: 20,
            cors_max_age_secs: 3600,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Reads `name` and parses it, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("DB_URL"))
                .ok()
                .filter(|url| !url.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })
                .transpose()?,
            port: parse_var("PORT", defaults.port)
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)
                .and_then(|n| {
                    if n == 0 {
                        anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
                    }
                    Ok(n)
                })?,
            rate_limit_replenish_ms: parse_var(
                "RATE_LIMIT_REPLENISH_MS",
                defaults.rate_limit_replenish_ms,
            )
            .and_then(|n| {
                if n == 0 {
                    anyhow::bail!("RATE_LIMIT_REPLENISH_MS must be at least 1");
                }
                Ok(n)
            })?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", defaults.rate_limit_burst).and_then(
                |n| {
                    if n == 0 {
                        anyhow::bail!("RATE_LIMIT_BURST must be at least 1");
                    }
                    Ok(n)
                },
            )?,
            cors_max_age_secs: parse_var("CORS_MAX_AGE_SECS", defaults.cors_max_age_secs)?,
            max_body_bytes: parse_var("MAX_BODY_BYTES", defaults.max_body_bytes)?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        match &config.database_url {
            Some(url) => tracing::debug!(
                "Database URL: {}...",
                url.chars().take(20).collect::<String>()
            ),
            None => tracing::warn!("DATABASE_URL not set, prospects will be kept in memory"),
        }
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Rate limit: one request every {}ms, burst {}",
            config.rate_limit_replenish_ms,
            config.rate_limit_burst
        );

        Ok(config)
    }
}
