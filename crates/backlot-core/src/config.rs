//! Configuration module
//!
//! This module provides the application configuration loaded from the
//! environment, covering the HTTP server, database pool, admin
//! authentication, and the on-disk media and album art directories.

use std::env;
use std::path::PathBuf;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_IMAGE_SIZE_MB: usize = 10;
const ITEMS_PER_PAGE: i64 = 25;

/// API key accepted outside of production when ADMIN_API_KEY is unset.
pub const DEV_ADMIN_API_KEY: &str = "backlot-dev-admin-key";

/// Notes template prefilled into the edit form for new media.
const DEFAULT_NOTES: &str =
    "Bible References: None\nS&H References: None\nReviewer: None\nLicense: General Upload";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub admin_api_key: String,
    /// Directory scanned for encoded media files.
    pub media_dir: PathBuf,
    /// Directory album art renditions are written into.
    pub album_art_dir: PathBuf,
    /// File extension expected for encoded media (no leading dot).
    pub encoded_type: String,
    pub max_image_size_mb: usize,
    pub items_per_page: i64,
    pub default_notes: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            admin_api_key: env::var("ADMIN_API_KEY")
                .unwrap_or_else(|_| DEV_ADMIN_API_KEY.to_string()),
            media_dir: env::var("MEDIA_DIR")
                .unwrap_or_else(|_| "data/media".to_string())
                .into(),
            album_art_dir: env::var("ALBUM_ART_DIR")
                .unwrap_or_else(|_| "public/images/media".to_string())
                .into(),
            encoded_type: env::var("ENCODED_TYPE")
                .unwrap_or_else(|_| "mp4".to_string())
                .trim()
                .trim_start_matches('.')
                .to_lowercase(),
            max_image_size_mb: env::var("MAX_IMAGE_SIZE_MB")
                .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
                .parse()
                .unwrap_or(MAX_IMAGE_SIZE_MB),
            items_per_page: env::var("ITEMS_PER_PAGE")
                .unwrap_or_else(|_| ITEMS_PER_PAGE.to_string())
                .parse()
                .unwrap_or(ITEMS_PER_PAGE),
            default_notes: env::var("DEFAULT_NOTES").unwrap_or_else(|_| DEFAULT_NOTES.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.max_image_size_mb * 1024 * 1024
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.admin_api_key == DEV_ADMIN_API_KEY {
            return Err(anyhow::anyhow!(
                "ADMIN_API_KEY must be set to a non-default value in production"
            ));
        }

        if self.encoded_type.is_empty() {
            return Err(anyhow::anyhow!("ENCODED_TYPE must not be empty"));
        }

        if self.items_per_page < 1 {
            return Err(anyhow::anyhow!("ITEMS_PER_PAGE must be at least 1"));
        }

        if self.max_image_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_SIZE_MB must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: "postgresql://localhost/backlot".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            admin_api_key: DEV_ADMIN_API_KEY.to_string(),
            media_dir: "data/media".into(),
            album_art_dir: "public/images/media".into(),
            encoded_type: "mp4".to_string(),
            max_image_size_mb: 10,
            items_per_page: 25,
            default_notes: "Reviewer: None".to_string(),
        }
    }

    #[test]
    fn test_development_defaults_are_valid() {
        let config = base_config();
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
        assert_eq!(config.max_image_size_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_production_rejects_default_admin_key() {
        let mut config = base_config();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.admin_api_key = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
        assert!(config.is_production());
    }

    #[test]
    fn test_rejects_non_postgres_database_url() {
        let mut config = base_config();
        config.database_url = "mysql://localhost/backlot".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_encoded_type() {
        let mut config = base_config();
        config.encoded_type = String::new();
        assert!(config.validate().is_err());
    }
}
