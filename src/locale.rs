//! Locale and slug types shared by the routes.
//!
//! These are read-only projections of CMS state. Nothing in this crate
//! mutates a post or its slugs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A site locale tag as the CMS names it (e.g. "en", "pt_BR").
///
/// The set of valid values is configured on the CMS side, so the tag is kept
/// opaque here and compared by value only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteLocale(String);

impl SiteLocale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SiteLocale {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for SiteLocale {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for SiteLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The URL segment of a post in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedSlug {
    pub locale: SiteLocale,
    pub value: String,
}

/// A post with every locale's slug.
///
/// `_allSlugLocales` may be absent or miss a locale when the post has not been
/// translated yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(
        rename = "_allSlugLocales",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub all_slug_locales: Option<Vec<LocalizedSlug>>,
}

impl Post {
    /// Non-empty slug of this post for `locale`, if it has one
    pub fn slug_for(&self, locale: &SiteLocale) -> Option<&str> {
        self.all_slug_locales
            .as_deref()?
            .iter()
            .find(|entry| &entry.locale == locale)
            .map(|entry| entry.value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// One page for the static generator to pre-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParam {
    pub slug: String,
    pub locale: SiteLocale,
}
