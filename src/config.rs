//! Process configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::auth::jwt::SESSION_TOKEN_EXPIRY_SECONDS;
use crate::document::pages::{
    StaticPageLayout, DEFAULT_EXTENSION, DEFAULT_PAGES_AFTER, DEFAULT_PAGES_BEFORE,
};
use crate::quote::model::CompanyDetails;

const DEFAULT_JWT_SECRET: &str = "quotation-server-jwt-secret-change-in-production";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_PAGES_DIR: &str = "./static/pdf_pages";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_seconds: i64,
    /// Mark the session cookie `Secure`; enable behind HTTPS.
    pub secure_cookie: bool,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: SESSION_TOKEN_EXPIRY_SECONDS,
            secure_cookie: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// No URL means quotations and users live in memory only.
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub port: u16,
    pub session: SessionConfig,
    pub static_pages: StaticPageLayout,
    pub cors_origins: Vec<String>,
    pub admin_seed: Option<AdminSeed>,
    /// Prefills new drafts.
    pub company: CompanyDetails,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Parse a comma separated list of page positions such as `1,2,3`.
pub fn parse_page_list(name: &'static str, value: &str) -> Result<Vec<u32>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|e| ConfigError::Invalid {
                name,
                value: value.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

pub fn default_company() -> CompanyDetails {
    CompanyDetails {
        name: "JRJ Contractors".to_string(),
        address: "78B Millicent St, Athol Park, Adelaide, 5012, South Australia".to_string(),
        email: "info@jrjcontractors.com.au".to_string(),
        phone: "+61 412 962 127".to_string(),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let secret = var("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("JWT_SECRET not set, using default secret. SET THIS IN PRODUCTION!");
            DEFAULT_JWT_SECRET.to_string()
        });
        let mut session = SessionConfig::new(secret);
        if let Some(v) = var("SECURE_COOKIES") {
            session.secure_cookie = parse_bool("SECURE_COOKIES", &v)?;
        }

        let port = match var("PORT") {
            Some(v) => v.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                value: v.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let before = match var("STATIC_PAGES_BEFORE") {
            Some(v) => parse_page_list("STATIC_PAGES_BEFORE", &v)?,
            None => DEFAULT_PAGES_BEFORE.to_vec(),
        };
        let after = match var("STATIC_PAGES_AFTER") {
            Some(v) => parse_page_list("STATIC_PAGES_AFTER", &v)?,
            None => DEFAULT_PAGES_AFTER.to_vec(),
        };
        let static_pages = StaticPageLayout::new(PathBuf::from(
            var("STATIC_PAGES_DIR").unwrap_or_else(|| DEFAULT_STATIC_PAGES_DIR.to_string()),
        ))
        .with_extension(var("STATIC_PAGES_EXT").unwrap_or_else(|| DEFAULT_EXTENSION.to_string()))
        .with_pages(before, after);

        let cors_origins = var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let admin_seed = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        let defaults = default_company();
        let company = CompanyDetails {
            name: var("COMPANY_NAME").unwrap_or(defaults.name),
            address: var("COMPANY_ADDRESS").unwrap_or(defaults.address),
            email: var("COMPANY_EMAIL").unwrap_or(defaults.email),
            phone: var("COMPANY_PHONE").unwrap_or(defaults.phone),
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
            session,
            static_pages,
            cors_origins,
            admin_seed,
            company,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_list() {
        assert_eq!(parse_page_list("X", "1, 2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_page_list("X", "").unwrap(), Vec::<u32>::new());
        assert!(parse_page_list("X", "1,two").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
