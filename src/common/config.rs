//! Process configuration read from the environment at startup

use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing value for {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// OAuth2 client credentials for one identity provider
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Immutable service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_lifetime: Duration,
    pub http_timeout: Duration,
    pub homepage_url: String,
    pub cors_origins: Vec<String>,
    pub sentry_dsn: Option<String>,
    pub google: ProviderCredentials,
    pub facebook: ProviderCredentials,
    pub github: ProviderCredentials,
}

const DEFAULT_TOKEN_LIFETIME: &str = "604800s"; // 1 week
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,https://localhost";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_port = match get("API_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "API_PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let lifetime_raw =
            get("AUTH_TOKEN_LIFETIME").unwrap_or_else(|| DEFAULT_TOKEN_LIFETIME.to_string());
        let token_lifetime =
            parse_seconds(&lifetime_raw).ok_or_else(|| ConfigError::Invalid {
                key: "AUTH_TOKEN_LIFETIME",
                value: lifetime_raw.clone(),
            })?;

        let timeout_raw = get("HTTP_TIMEOUT_SECS").unwrap_or_else(|| "10".to_string());
        let http_timeout = parse_seconds(&timeout_raw).ok_or_else(|| ConfigError::Invalid {
            key: "HTTP_TIMEOUT_SECS",
            value: timeout_raw.clone(),
        })?;

        let cors_raw = get("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string());
        let cors_origins: Vec<String> = cors_raw
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        // Credentialed CORS cannot be combined with a wildcard origin.
        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: cors_raw,
            });
        }

        let provider = |prefix: &str, path: &str| ProviderCredentials {
            client_id: get(&format!("{}_CLIENT_ID", prefix)).unwrap_or_default(),
            client_secret: get(&format!("{}_CLIENT_SECRET", prefix)).unwrap_or_default(),
            redirect_uri: get(&format!("{}_REDIRECT_URI", prefix)).unwrap_or_else(|| {
                format!("https://localhost/api/v1/single-sign-on/{}/callback", path)
            }),
        };

        Ok(Self {
            api_port,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite://sso.db".to_string()),
            jwt_secret,
            token_lifetime,
            http_timeout,
            homepage_url: get("HOMEPAGE_URL").unwrap_or_else(|| "https://localhost".to_string()),
            cors_origins,
            sentry_dsn: get("SENTRY_DSN"),
            google: provider("GOOGLE", "google"),
            facebook: provider("FACEBOOK", "facebook"),
            github: provider("GITHUB", "github"),
        })
    }
}

/// Parses `"604800"` or `"604800s"` into a duration; zero is rejected.
fn parse_seconds(raw: &str) -> Option<Duration> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.api_port, 8080);
        assert_eq!(config.token_lifetime, Duration::from_secs(604_800));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.homepage_url, "https://localhost");
        assert_eq!(
            config.github.redirect_uri,
            "https://localhost/api/v1/single-sign-on/github/callback"
        );
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "  ")]));
        assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET"))));
    }

    #[test]
    fn test_overrides_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("API_PORT", "9000"),
            ("AUTH_TOKEN_LIFETIME", "3600"),
            ("GOOGLE_CLIENT_ID", "google-id"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();

        assert_eq!(config.api_port, 9000);
        assert_eq!(config.token_lifetime, Duration::from_secs(3600));
        assert_eq!(config.google.client_id, "google-id");
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_invalid_lifetime_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("AUTH_TOKEN_LIFETIME", "one week"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "AUTH_TOKEN_LIFETIME", .. })
        ));
    }

    #[test]
    fn test_wildcard_cors_origin_is_rejected() {
        for raw in ["*", "https://app.test, *"] {
            let result =
                Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret"), ("CORS_ORIGINS", raw)]));
            assert!(matches!(
                result,
                Err(ConfigError::Invalid { key: "CORS_ORIGINS", .. })
            ));
        }
    }
}
