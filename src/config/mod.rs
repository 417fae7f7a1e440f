use axum::http::HeaderValue;
use jsonwebtoken::Algorithm;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: PathBuf,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub jwt_expiry_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

impl AppConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Used by
    /// `from_env` and by tests that should not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let defaults = Defaults::for_environment(environment);

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            frontend_dir: lookup("FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("frontend-partner-main/dist")),
            cors_origins: match lookup("CORS_ORIGINS") {
                Some(v) => parse_cors_origins(&v)?,
                None => default_cors_origins(),
            },
        };

        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            connection_timeout: parse_or(
                &lookup,
                "DATABASE_CONNECTION_TIMEOUT",
                defaults.connection_timeout,
            )?,
        };

        let jwt_algorithm = match lookup("ALGORITHM") {
            Some(name) => parse_algorithm(name.trim())?,
            None => Algorithm::HS256,
        };

        let jwt_expiry_minutes: i64 = parse_or(&lookup, "EXP_TIME", 30)?;
        if jwt_expiry_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "EXP_TIME",
                reason: "token lifetime must be a positive number of minutes".to_string(),
            });
        }

        let security = SecurityConfig {
            jwt_secret: required("SECRET_KEY")?,
            jwt_algorithm,
            jwt_expiry_minutes,
        };

        let llm = LlmConfig {
            api_key: required("GROQ_API_KEY")?,
            base_url: lookup("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_GROQ_URL.to_string()),
            model: lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)?,
        };

        Ok(Self {
            environment,
            server,
            database,
            security,
            llm,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "HOST",
                reason: e.to_string(),
            })
    }
}

struct Defaults {
    max_connections: u32,
    connection_timeout: u64,
}

impl Defaults {
    fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                max_connections: 10,
                connection_timeout: 30,
            },
            Environment::Staging => Self {
                max_connections: 20,
                connection_timeout: 10,
            },
            Environment::Production => Self {
                max_connections: 50,
                connection_timeout: 5,
            },
        }
    }
}

fn default_cors_origins() -> Vec<String> {
    ["127.0.0.1:8000", "localhost:8000", "127.0.0.1:8080", "localhost:8080", "127.0.0.1:5173", "localhost:5173"]
        .iter()
        .map(|host| format!("http://{}", host))
        .collect()
}

/// Comma-separated explicit origins. `*` is refused since credentials are
/// always allowed.
fn parse_cors_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let mut origins = Vec::new();
    for origin in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if origin == "*" {
            return Err(ConfigError::Invalid {
                name: "CORS_ORIGINS",
                reason: "wildcard origin is not allowed with credentials".to_string(),
            });
        }
        if HeaderValue::from_str(origin).is_err() {
            return Err(ConfigError::Invalid {
                name: "CORS_ORIGINS",
                reason: format!("{:?} is not a valid origin header value", origin),
            });
        }
        origins.push(origin.to_string());
    }
    Ok(origins)
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

// Only shared-secret algorithms make sense with SECRET_KEY.
fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(name).map_err(|_| ConfigError::Invalid {
        name: "ALGORITHM",
        reason: format!("unknown algorithm '{}'", name),
    })?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(ConfigError::Invalid {
            name: "ALGORITHM",
            reason: format!("{:?} needs a key pair, only HS256/HS384/HS512 are supported", other),
        }),
    }
}
