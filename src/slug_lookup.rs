//! `GET /api/post-localized-slugs?slug=..&locale=..`
//!
//! Resolves a post by its slug in one locale and returns the slugs it has in
//! every locale, so a language switcher can link to the translated page.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::cms::{CmsError, QueryExecutor};
use crate::graphql::GraphQlQuery;
use crate::locale::{Post, SiteLocale};

pub const MISSING_PARAMS_ERROR: &str = "Missing required parameters: slug and locale";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

pub struct PostBySlugQuery;

#[derive(Debug, Clone, Serialize)]
pub struct PostBySlugVariables {
    pub slug: String,
    pub locale: SiteLocale,
}

/// Returned to the client; a post without slug entries omits `_allSlugLocales`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostBySlugData {
    pub post: Option<Post>,
}

impl GraphQlQuery for PostBySlugQuery {
    const DOCUMENT: &'static str = r#"query GetPostBySlug($slug: String, $locale: SiteLocale) {
  post(filter: { slug: { eq: $slug } }, locale: $locale) {
    id
    _allSlugLocales {
      locale
      value
    }
  }
}"#;
    const OPERATION_NAME: &'static str = "GetPostBySlug";
    type Variables = PostBySlugVariables;
    type Response = PostBySlugData;
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SlugLookupParams {
    pub slug: Option<String>,
    pub locale: Option<String>,
}

impl SlugLookupParams {
    /// First value of each parameter; repeats are ignored
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "slug" if params.slug.is_none() => params.slug = Some(value),
                "locale" if params.locale.is_none() => params.locale = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Both parameters, if present and non-empty
    fn required(self) -> Option<PostBySlugVariables> {
        let slug = self.slug.filter(|s| !s.is_empty())?;
        let locale = self.locale.filter(|l| !l.is_empty())?;
        Some(PostBySlugVariables {
            slug,
            locale: SiteLocale::from(locale),
        })
    }
}

pub async fn post_localized_slugs<E: QueryExecutor>(
    State(executor): State<Arc<E>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let Some(variables) = SlugLookupParams::from_pairs(pairs).required() else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_PARAMS_ERROR);
    };

    match executor.execute::<PostBySlugQuery>(&variables).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            error!("Error fetching localized slugs: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &error_message(&e))
        }
    }
}

/// Client-facing message for a failed lookup
pub fn error_message(err: &CmsError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
