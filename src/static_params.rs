//! Route parameters for pre-rendering localized post pages.
//!
//! For every supported locale the CMS is asked for all posts (with the other
//! locales as content fallbacks), and each post that has a slug in that locale
//! becomes one `{slug, locale}` page.
//!
//! One query per locale fetches at most `MAX_POSTS_PER_LOCALE` posts, the CMS
//! page maximum. Hitting that limit is logged as a warning.

use std::path::Path;

use anyhow::Context;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cms::{CmsError, QueryExecutor};
use crate::graphql::GraphQlQuery;
use crate::locale::{Post, RouteParam, SiteLocale};
use crate::locales::LocaleProvider;

#[derive(Debug, Error)]
pub enum StaticParamsError {
    #[error("failed to load site locales: {0}")]
    Locales(#[source] CmsError),

    #[error("failed to load posts for locale {locale}: {source}")]
    Posts {
        locale: SiteLocale,
        #[source]
        source: CmsError,
    },
}

/// Must match `first:` in `PostStaticParamsQuery::DOCUMENT`
pub const MAX_POSTS_PER_LOCALE: usize = 500;

pub struct PostStaticParamsQuery;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStaticParamsVariables {
    pub locale: SiteLocale,
    pub fallback_locale: Vec<SiteLocale>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStaticParamsData {
    pub all_posts: Vec<Post>,
}

impl GraphQlQuery for PostStaticParamsQuery {
    const DOCUMENT: &'static str = r#"query PostStaticParams($locale: SiteLocale, $fallbackLocale: [SiteLocale!]) {
  allPosts(first: 500, locale: $locale, fallbackLocales: $fallbackLocale) {
    id
    _allSlugLocales {
      locale
      value
    }
  }
}"#;
    const OPERATION_NAME: &'static str = "PostStaticParams";
    type Variables = PostStaticParamsVariables;
    type Response = PostStaticParamsData;
}

/// Variables for one locale: the locale itself plus every other one as fallback
pub fn variables_for_locale(
    locale: &SiteLocale,
    locales: &[SiteLocale],
) -> PostStaticParamsVariables {
    PostStaticParamsVariables {
        locale: locale.clone(),
        fallback_locale: locales.iter().filter(|l| *l != locale).cloned().collect(),
    }
}

/// Whether a locale's post list may have been cut off at the page limit
pub fn hits_post_limit(posts: &[Post]) -> bool {
    posts.len() >= MAX_POSTS_PER_LOCALE
}

/// Pages for `locale` among `posts`, in post order.
///
/// Posts without a non-empty slug in that locale are skipped. Duplicates are
/// kept as the CMS returned them.
pub fn params_for_locale(posts: &[Post], locale: &SiteLocale) -> Vec<RouteParam> {
    posts
        .iter()
        .filter_map(|post| post.slug_for(locale))
        .map(|slug| RouteParam {
            slug: slug.to_string(),
            locale: locale.clone(),
        })
        .collect()
}

/// Build every `{slug, locale}` page across all supported locales.
///
/// Locales are processed strictly one after another. The first failure aborts
/// the whole run and names the locale it happened in.
pub async fn generate_static_params<E, L>(
    executor: &E,
    locales: &L,
) -> Result<Vec<RouteParam>, StaticParamsError>
where
    E: QueryExecutor,
    L: LocaleProvider,
{
    let locales = locales
        .available_locales()
        .await
        .map_err(StaticParamsError::Locales)?;

    info!("Generating static params for {} locales", locales.len());

    let per_locale: Vec<Vec<RouteParam>> = stream::iter(locales.iter())
        .then(|locale| {
            let variables = variables_for_locale(locale, &locales);
            async move {
                let data = executor
                    .execute::<PostStaticParamsQuery>(&variables)
                    .await
                    .map_err(|source| StaticParamsError::Posts {
                        locale: locale.clone(),
                        source,
                    })?;

                if hits_post_limit(&data.all_posts) {
                    warn!(
                        "[{}] CMS returned {} posts, the per-query maximum; later posts are not pre-rendered",
                        locale,
                        data.all_posts.len()
                    );
                }

                let params = params_for_locale(&data.all_posts, locale);
                debug!(
                    "[{}] {} of {} posts have a slug",
                    locale,
                    params.len(),
                    data.all_posts.len()
                );
                Ok::<_, StaticParamsError>(params)
            }
        })
        .try_collect()
        .await?;

    let params: Vec<RouteParam> = per_locale.into_iter().flatten().collect();
    info!("✓ Generated {} static params", params.len());

    Ok(params)
}

/// Write params as a pretty JSON array, creating parent directories as needed
pub fn write_params_file(params: &[RouteParam], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(params)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
