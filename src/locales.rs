//! Supported-locale lookup.
//!
//! The site's locale set lives in the CMS (`_site { locales }`). A fixed list
//! from configuration can stand in for it, e.g. for builds against a CMS
//! environment that is not yet fully configured.

use std::future::Future;

use serde::Deserialize;
use tracing::info;

use crate::cms::{CmsError, QueryExecutor};
use crate::config::Config;
use crate::graphql::{GraphQlQuery, NoVariables};
use crate::locale::SiteLocale;

/// Source of the full supported-locale set
pub trait LocaleProvider: Send + Sync {
    fn available_locales(&self) -> impl Future<Output = Result<Vec<SiteLocale>, CmsError>> + Send;
}

pub struct SiteLocalesQuery;

#[derive(Debug, Deserialize)]
pub struct SiteLocalesData {
    #[serde(rename = "_site")]
    pub site: SiteInfo,
}

#[derive(Debug, Deserialize)]
pub struct SiteInfo {
    pub locales: Vec<SiteLocale>,
}

impl GraphQlQuery for SiteLocalesQuery {
    const DOCUMENT: &'static str = r#"query SiteLocales {
  _site {
    locales
  }
}"#;
    const OPERATION_NAME: &'static str = "SiteLocales";
    type Variables = NoVariables;
    type Response = SiteLocalesData;
}

/// Locales as configured in the CMS
pub struct CmsLocales<'a, E> {
    executor: &'a E,
}

impl<'a, E: QueryExecutor> CmsLocales<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }
}

impl<E: QueryExecutor> LocaleProvider for CmsLocales<'_, E> {
    fn available_locales(&self) -> impl Future<Output = Result<Vec<SiteLocale>, CmsError>> + Send {
        async move {
            let data = self
                .executor
                .execute::<SiteLocalesQuery>(&NoVariables {})
                .await?;
            info!("CMS reports {} locales", data.site.locales.len());
            Ok(data.site.locales)
        }
    }
}

/// A locale list known up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocales(pub Vec<SiteLocale>);

impl LocaleProvider for FixedLocales {
    fn available_locales(&self) -> impl Future<Output = Result<Vec<SiteLocale>, CmsError>> + Send {
        let locales = self.0.clone();
        async move { Ok(locales) }
    }
}

/// Either the configured override or the CMS itself
pub enum SiteLocales<'a, E> {
    Fixed(FixedLocales),
    Cms(CmsLocales<'a, E>),
}

impl<'a, E: QueryExecutor> SiteLocales<'a, E> {
    pub fn from_config(config: &Config, executor: &'a E) -> Self {
        match &config.site_locales {
            Some(locales) => Self::Fixed(FixedLocales(locales.clone())),
            None => Self::Cms(CmsLocales::new(executor)),
        }
    }
}

impl<E: QueryExecutor> LocaleProvider for SiteLocales<'_, E> {
    fn available_locales(&self) -> impl Future<Output = Result<Vec<SiteLocale>, CmsError>> + Send {
        async move {
            match self {
                Self::Fixed(fixed) => fixed.available_locales().await,
                Self::Cms(cms) => cms.available_locales().await,
            }
        }
    }
}

/// The site's primary locale, used as the content fallback
pub fn fallback_locale(locales: &[SiteLocale]) -> Option<&SiteLocale> {
    locales.first()
}
