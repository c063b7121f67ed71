use serde::Deserialize;
use std::env;
use std::str::FromStr;

const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub auto_create_schema: Option<bool>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: Option<i64>,
    /// Comma-separated list of emails that always receive the ADMIN role.
    pub admin_emails: Option<String>,
    pub max_body_bytes: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let config: Config = cfg.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher".to_string(),
            ));
        }

        if self.jwt_secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }

        if let Some(hours) = self.jwt_expiry_hours {
            if hours <= 0 {
                return Err(config::ConfigError::Message(
                    "jwt_expiry_hours must be positive".to_string(),
                ));
            }
        }

        // 1KB..10MB
        if let Some(limit) = self.max_body_bytes {
            let min = 1024;
            let max = 10 * 1024 * 1024;
            if limit < min || limit > max {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    min, max
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    pub fn effective_jwt_expiry_hours(&self) -> i64 {
        self.jwt_expiry_hours.unwrap_or(24)
    }

    pub fn effective_auto_create_schema(&self) -> bool {
        self.auto_create_schema.unwrap_or(true)
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim();
        self.admin_emails
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty())
            .any(|candidate| candidate.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: None,
            auto_create_schema: None,
            jwt_secret: "secret".to_string(),
            jwt_expiry_hours: None,
            admin_emails: Some(" phtcon@ucsb.edu, Admin@Example.com ,".to_string()),
            max_body_bytes: None,
        }
    }

    #[test]
    fn admin_emails_are_trimmed_and_case_insensitive() {
        let config = sample();
        assert!(config.is_admin_email("phtcon@ucsb.edu"));
        assert!(config.is_admin_email("admin@example.com"));
        assert!(!config.is_admin_email("student@ucsb.edu"));
        assert!(!config.is_admin_email(""));
    }

    #[test]
    fn validate_rejects_privileged_port_and_empty_secret() {
        let mut config = sample();
        config.port = 80;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.jwt_secret = "  ".to_string();
        assert!(config.validate().is_err());

        assert!(sample().validate().is_ok());
    }

    #[test]
    fn body_limit_must_stay_in_range() {
        let mut config = sample();
        config.max_body_bytes = Some(16);
        assert!(config.validate().is_err());

        config.max_body_bytes = Some(64 * 1024);
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_max_body_bytes(), 64 * 1024);
    }
}
