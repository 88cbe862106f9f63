use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// JWT secret, which must always be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT signing and lifetime settings.
    pub jwt: JwtConfig,
    /// Add `Secure` to the auth cookie (default: `false`).
    pub cookie_secure: bool,
    /// Directory uploaded media is written to (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Admin console assets served at `/static` (default: `static`).
    pub static_dir: PathBuf,
    /// Per-file limit for media uploads and document imports.
    pub max_upload_bytes: usize,
    /// Failed logins allowed per client IP inside one window, and
    /// consecutive failures allowed per account before it is locked.
    pub login_max_attempts: u32,
    /// Length of the login throttle window and of an account lock, in seconds.
    pub login_window_secs: u64,
    /// Take the client address from `X-Forwarded-For` (default: `false`).
    /// Only enable behind a reverse proxy that overwrites the header.
    pub trust_proxy: bool,
    /// Credentials for the first super admin, created when no users exist.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `COOKIE_SECURE`            | `false`                 |
    /// | `UPLOAD_DIR`               | `uploads`               |
    /// | `STATIC_DIR`               | `static`                |
    /// | `MAX_UPLOAD_BYTES`         | `10485760`              |
    /// | `LOGIN_MAX_ATTEMPTS`       | `10`                    |
    /// | `LOGIN_WINDOW_SECS`        | `900`                   |
    /// | `TRUST_PROXY`              | `false`                 |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | unset                   |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                   |
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or a missing `JWT_SECRET`, so
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_env("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", 30);
        let cookie_secure: bool = parse_env("COOKIE_SECURE", false);
        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
        );
        let static_dir = PathBuf::from(
            std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
        );
        let max_upload_bytes: usize = parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES);
        let login_max_attempts: u32 = parse_env("LOGIN_MAX_ATTEMPTS", 10);
        let login_window_secs: u64 = parse_env("LOGIN_WINDOW_SECS", 900);
        let trust_proxy: bool = parse_env("TRUST_PROXY", false);

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            cookie_secure,
            upload_dir,
            static_dir,
            max_upload_bytes,
            login_max_attempts,
            login_window_secs,
            trust_proxy,
            bootstrap_admin,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} has an invalid value: '{raw}'")),
        Err(_) => default,
    }
}
