use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Percentage of each sale credited to the assigned teachers (0..=100).
    pub teacher_share_percent: u8,
    /// Free points granted to a newly created student account.
    pub signup_credit: u64,
    /// How many times a busy/locked storage transaction is retried before
    /// surfacing a conflict to the caller.
    pub max_conflict_retries: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let teacher_share_percent = env_map
            .get("TEACHER_SHARE_PERCENT")
            .map(|s| s.as_str())
            .unwrap_or("70")
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "TEACHER_SHARE_PERCENT".to_string(),
                    "must be an integer in 0..=100".to_string(),
                )
            })?;

        let signup_credit = env_map
            .get("SIGNUP_CREDIT")
            .map(|s| s.as_str())
            .unwrap_or("100")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SIGNUP_CREDIT".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        let max_conflict_retries = env_map
            .get("MAX_CONFLICT_RETRIES")
            .map(|s| s.as_str())
            .unwrap_or("3")
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MAX_CONFLICT_RETRIES".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            teacher_share_percent,
            signup_credit,
            max_conflict_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.teacher_share_percent, 70);
        assert_eq!(config.signup_credit, 100);
        assert_eq!(config.max_conflict_retries, 3);
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        match Config::from_env_map(env_map) {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_share_percent_over_100_rejected() {
        let mut env_map = setup_required_env();
        env_map.insert("TEACHER_SHARE_PERCENT".to_string(), "101".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "TEACHER_SHARE_PERCENT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_custom_share_percent() {
        let mut env_map = setup_required_env();
        env_map.insert("TEACHER_SHARE_PERCENT".to_string(), "50".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.teacher_share_percent, 50);
    }
}
