use std::net::SocketAddr;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Server settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("TOOLSHELF_CORS_ORIGINS").ok().as_deref(),
        )
    }

    fn from_values(port: Option<&str>, cors_origins: Option<&str>) -> Self {
        let port = match port.map(str::trim) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = raw, "Ignoring invalid PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let cors_origins = cors_origins
            .unwrap_or(DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self { port, cors_origins }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
