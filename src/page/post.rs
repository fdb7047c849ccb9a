//! The localized blog post page: `/{locale}/posts/{slug}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    generate_metadata_fn, generate_wrapper, MetadataFn, PageMetadata, PageRender, SeoTag, Wrapper,
};
use crate::cms::{CmsError, QueryExecutor, QueryOptions};
use crate::config::Config;
use crate::graphql::GraphQlQuery;
use crate::locale::SiteLocale;
use crate::locales::{fallback_locale, LocaleProvider};

/// Route params of a post page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub locale: SiteLocale,
    pub slug: String,
}

pub struct PostPageQuery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageVariables {
    pub locale: SiteLocale,
    pub fallback_locale: Vec<SiteLocale>,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostPageData {
    pub post: Option<PostPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostPage {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(rename = "_publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seo: Vec<SeoTag>,
    /// Structured text document, passed through to the renderer
    pub content: Option<serde_json::Value>,
}

impl GraphQlQuery for PostPageQuery {
    const DOCUMENT: &'static str = r#"query PostPage($locale: SiteLocale, $fallbackLocale: [SiteLocale!], $slug: String) {
  post(locale: $locale, fallbackLocales: $fallbackLocale, filter: { slug: { eq: $slug } }) {
    id
    title
    slug
    _publishedAt
    seo: _seoMetaTags {
      tag
      attributes
      content
    }
    content {
      value
      blocks {
        __typename
        ... on ImageBlockRecord {
          id
          image {
            url
            alt
          }
        }
      }
    }
  }
}"#;
    const OPERATION_NAME: &'static str = "PostPage";
    type Variables = PostPageVariables;
    type Response = PostPageData;
}

/// Query variables for a post page. No validation is done here.
pub fn build_variables(params: &PageParams, fallback_locale: &SiteLocale) -> PostPageVariables {
    PostPageVariables {
        locale: params.locale.clone(),
        fallback_locale: vec![fallback_locale.clone()],
        slug: params.slug.clone(),
    }
}

/// SEO tags of the post, or `None` when the post does not exist
pub fn post_metadata() -> MetadataFn<PageParams, PostPageQuery, Vec<SeoTag>> {
    generate_metadata_fn(build_variables, |data: &PostPageData| {
        data.post.as_ref().map(|post| post.seo.clone())
    })
}

pub fn post_page() -> Wrapper<PageParams, PostPageQuery> {
    generate_wrapper(build_variables)
}

/// The site's primary locale, or the page's own when the site lists none
async fn site_fallback<L: LocaleProvider>(
    locales: &L,
    params: &PageParams,
) -> Result<SiteLocale, CmsError> {
    let locales = locales.available_locales().await?;
    Ok(fallback_locale(&locales)
        .cloned()
        .unwrap_or_else(|| params.locale.clone()))
}

/// Load a post page, in draft mode when the config asks for drafts
pub async fn load_post_page<E, L>(
    config: &Config,
    executor: &E,
    locales: &L,
    params: &PageParams,
) -> Result<PageRender<PostPageQuery>, CmsError>
where
    E: QueryExecutor,
    L: LocaleProvider,
{
    let fallback = site_fallback(locales, params).await?;
    post_page()
        .load(executor, params, &fallback, config.include_drafts)
        .await
}

/// Metadata of a post page; `None` when the post does not exist
pub async fn load_post_metadata<E, L>(
    config: &Config,
    executor: &E,
    locales: &L,
    params: &PageParams,
) -> Result<Option<PageMetadata>, CmsError>
where
    E: QueryExecutor,
    L: LocaleProvider,
{
    let fallback = site_fallback(locales, params).await?;
    let tags = post_metadata()
        .generate(
            executor,
            params,
            &fallback,
            QueryOptions::drafts(config.include_drafts),
        )
        .await?;
    Ok(tags.map(|tags| PageMetadata::from_seo_tags(&tags)))
}
