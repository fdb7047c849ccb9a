use anyhow::{Context, Result};

use crate::locale::SiteLocale;

pub const DEFAULT_CMS_ENDPOINT: &str = "https://graphql.datocms.com/";

#[derive(Debug, Clone)]
pub struct Config {
    // DatoCMS
    pub cms_api_token: String,
    pub cms_endpoint: String,
    pub cms_environment: Option<String>,
    pub cms_timeout_secs: u64,

    // Draft mode for page loads
    pub include_drafts: bool,

    // Locales (None = ask the CMS)
    pub site_locales: Option<Vec<SiteLocale>>,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // DatoCMS - read-only API token
            cms_api_token: std::env::var("DATOCMS_API_TOKEN")
                .context("DATOCMS_API_TOKEN not set")?,
            cms_endpoint: std::env::var("DATOCMS_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_CMS_ENDPOINT.to_string()),
            cms_environment: std::env::var("DATOCMS_ENVIRONMENT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            cms_timeout_secs: std::env::var("CMS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            include_drafts: std::env::var("DATOCMS_INCLUDE_DRAFTS")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(false),

            site_locales: std::env::var("SITE_LOCALES")
                .ok()
                .map(|v| parse_locales(&v))
                .filter(|locales| !locales.is_empty()),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a comma-separated locale list, keeping order and dropping blanks
fn parse_locales(value: &str) -> Vec<SiteLocale> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SiteLocale::from)
        .collect()
}
