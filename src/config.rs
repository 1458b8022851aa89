// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything that used to differ between deployments (CORS policy, whether
//! the GraphiQL playground is served, GitHub endpoints) is an explicit
//! setting here and is resolved once at startup.

use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://recipes.db";
const DEFAULT_GITHUB_OAUTH_URL: &str = "https://github.com";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

/// Cross-origin policy for the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// `Access-Control-Allow-Origin: *`, no credentials.
    Wildcard,
    /// Echo the request origin back with credentials allowed.
    ///
    /// With no `allowed_origins` every origin is echoed. Otherwise only
    /// browser-extension and localhost origins plus the listed ones are.
    Mirror { allowed_origins: Vec<String> },
}

const ALWAYS_ALLOWED_ORIGIN_PREFIXES: &[&str] = &[
    "chrome-extension://",
    "moz-extension://",
    "http://localhost",
    "http://127.0.0.1",
];

impl CorsPolicy {
    fn parse(policy: Option<&str>, origins: Option<&str>) -> Result<Self, ConfigError> {
        let allowed_origins = origins
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        match policy.map(str::trim) {
            None | Some("") | Some("mirror") => Ok(CorsPolicy::Mirror { allowed_origins }),
            Some("wildcard") | Some("*") => Ok(CorsPolicy::Wildcard),
            Some(other) => Err(ConfigError::Invalid("CORS_POLICY", other.to_string())),
        }
    }

    /// Whether a request from `origin` may read responses.
    pub fn allows_origin(&self, origin: &str) -> bool {
        match self {
            CorsPolicy::Wildcard => true,
            CorsPolicy::Mirror { allowed_origins } if allowed_origins.is_empty() => true,
            CorsPolicy::Mirror { allowed_origins } => {
                ALWAYS_ALLOWED_ORIGIN_PREFIXES
                    .iter()
                    .any(|prefix| origin.starts_with(prefix))
                    || allowed_origins.iter().any(|o| o == origin)
            }
        }
    }
}

/// Base URLs of the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubEndpoints {
    /// Host serving `/login/oauth/*`
    pub oauth_url: String,
    /// Host serving the REST API (`/user`, `/user/emails`)
    pub api_url: String,
}

impl Default for GithubEndpoints {
    fn default() -> Self {
        Self {
            oauth_url: DEFAULT_GITHUB_OAUTH_URL.to_string(),
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// GitHub OAuth client ID (public)
    pub github_client_id: String,
    /// SQLite connection string
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// CORS policy for the API
    pub cors: CorsPolicy,
    /// Identity provider endpoints
    pub github: GithubEndpoints,

    // --- Secrets ---
    /// GitHub OAuth client secret
    pub github_client_secret: String,
    /// HMAC key for session tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let cors = CorsPolicy::parse(
            env::var("CORS_POLICY").ok().as_deref(),
            env::var("CORS_ALLOWED_ORIGINS").ok().as_deref(),
        )?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw.clone()))?,
            Err(_) => 8080,
        };

        Ok(Self {
            github_client_id: required("GITHUB_CLIENT_ID")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port,
            environment: Environment::parse(&env::var("ENVIRONMENT").unwrap_or_default()),
            cors,
            github: GithubEndpoints {
                oauth_url: env::var("GITHUB_OAUTH_URL")
                    .unwrap_or_else(|_| DEFAULT_GITHUB_OAUTH_URL.to_string()),
                api_url: env::var("GITHUB_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
            },
            github_client_secret: required("GITHUB_CLIENT_SECRET")?,
            jwt_secret: required("JWT_SECRET")?.into_bytes(),
        })
    }

    /// Config for tests: in-memory database, development mode, mirror CORS.
    pub fn test_default() -> Self {
        Self {
            github_client_id: "test_client_id".to_string(),
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            environment: Environment::Development,
            cors: CorsPolicy::Mirror {
                allowed_origins: vec!["https://recipes.example.com".to_string()],
            },
            github: GithubEndpoints::default(),
            github_client_secret: "test_secret".to_string(),
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Whether the GraphiQL playground is served on `GET /graphql`.
    pub fn playground_enabled(&self) -> bool {
        self.environment != Environment::Production
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
