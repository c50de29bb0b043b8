use crate::errors::AppError;
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub environment: String,
    pub include_error_details: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の取得関数から設定を組み立てる（テストでは環境変数を汚さずに使う）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string());

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                AppError::Configuration(format!("DATABASE_MAX_CONNECTIONS が不正です: {raw}"))
            })?,
            None => 1,
        };

        let include_error_details = match lookup("INCLUDE_ERROR_DETAILS") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::Configuration(format!("INCLUDE_ERROR_DETAILS が不正です: {raw}"))
            })?,
            None => environment == "dev",
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections,
            environment,
            include_error_details,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
