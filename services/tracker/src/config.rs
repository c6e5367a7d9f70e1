//! Server configuration

use anyhow::Result;
use std::env;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the server listens on
    pub port: u16,
    /// Whether the server runs in production (enables secure cookies)
    pub production: bool,
    /// Browser origin allowed by CORS
    pub cors_origin: String,
    /// Number of issues per page in listings
    pub page_size: u32,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PORT`: Listen port (default: 8080)
    /// - `APP_ENV`: `production` or anything else (default: development)
    /// - `CORS_ORIGIN`: Allowed origin, never `*` (default: "http://localhost:5173")
    /// - `RESULT_PAGE_SIZE`: Issues per page (default: 10)
    pub fn from_env() -> Result<Self> {
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid PORT: {}", e))?;

        let production = env::var("APP_ENV")
            .map(|value| value.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        if cors_origin.trim() == "*" {
            anyhow::bail!("CORS_ORIGIN must name a single origin, '*' cannot be used with credentials");
        }

        let page_size = env::var("RESULT_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|size| *size > 0)
            .unwrap_or(10);

        Ok(ServerConfig {
            port,
            production,
            cors_origin,
            page_size,
        })
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            production: false,
            cors_origin: "http://localhost:5173".to_string(),
            page_size: 10,
        }
    }
}
