// src/config.rs

/// Server configuration loaded from environment variables. Defaults are
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Base URL of the remote scoring/recommendation service.
    pub analysis_api_base_url: String,
    /// Directory the dashboard frontend is served from (default: `static`).
    pub static_dir: String,
    /// Upload size cap in bytes (default: 10 MB).
    pub max_upload_bytes: usize,
}

impl Config {
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `8080`                   |
    /// | `ANALYSIS_API_BASE_URL` | `http://localhost:5000`  |
    /// | `STATIC_DIR`            | `static`                 |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let analysis_api_base_url = std::env::var("ANALYSIS_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".into())
            .trim_end_matches('/')
            .to_string();

        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            analysis_api_base_url,
            static_dir,
            max_upload_bytes,
        }
    }
}
