//! Data wiring for CMS-backed pages.
//!
//! A page is described by a typed query plus a function that turns route
//! params into that query's variables. From that pair this module derives the
//! metadata loader and the content loader, which picks between the static
//! content variant and the real-time (draft preview) variant.
//!
//! Rendering either variant is left to the caller.

mod metadata;
pub mod post;

pub use metadata::{PageMetadata, SeoTag};

use std::marker::PhantomData;

use tracing::debug;

use crate::cms::{CmsError, QueryExecutor, QueryOptions};
use crate::graphql::GraphQlQuery;
use crate::locale::SiteLocale;

/// Maps route params and the site's fallback locale to query variables
pub type BuildVariablesFn<P, V> = fn(&P, &SiteLocale) -> V;

/// Loads page metadata by running the page query and projecting its result.
pub struct MetadataFn<P, Q: GraphQlQuery, M> {
    build_variables: BuildVariablesFn<P, Q::Variables>,
    generate: fn(&Q::Response) -> Option<M>,
    _query: PhantomData<fn() -> Q>,
}

pub fn generate_metadata_fn<P, Q: GraphQlQuery, M>(
    build_variables: BuildVariablesFn<P, Q::Variables>,
    generate: fn(&Q::Response) -> Option<M>,
) -> MetadataFn<P, Q, M> {
    MetadataFn {
        build_variables,
        generate,
        _query: PhantomData,
    }
}

impl<P, Q: GraphQlQuery, M> MetadataFn<P, Q, M> {
    /// `Ok(None)` when the projection finds nothing (e.g. no such post)
    pub async fn generate<E: QueryExecutor>(
        &self,
        executor: &E,
        params: &P,
        fallback_locale: &SiteLocale,
        options: QueryOptions,
    ) -> Result<Option<M>, CmsError> {
        let variables = (self.build_variables)(params, fallback_locale);
        let data = executor.execute_with::<Q>(&variables, options).await?;
        Ok((self.generate)(&data))
    }
}

/// What a page should render
pub enum PageRender<Q: GraphQlQuery> {
    /// Published content, rendered once
    Content { data: Q::Response },
    /// Draft preview; the client keeps the data fresh by re-running `document`
    RealTime {
        document: &'static str,
        variables: Q::Variables,
        initial_data: Q::Response,
    },
}

impl<Q: GraphQlQuery> PageRender<Q> {
    pub fn data(&self) -> &Q::Response {
        match self {
            Self::Content { data } => data,
            Self::RealTime { initial_data, .. } => initial_data,
        }
    }

    pub fn is_real_time(&self) -> bool {
        matches!(self, Self::RealTime { .. })
    }
}

/// Loads page content, choosing the real-time variant in draft mode.
pub struct Wrapper<P, Q: GraphQlQuery> {
    build_variables: BuildVariablesFn<P, Q::Variables>,
    _query: PhantomData<fn() -> Q>,
}

pub fn generate_wrapper<P, Q: GraphQlQuery>(
    build_variables: BuildVariablesFn<P, Q::Variables>,
) -> Wrapper<P, Q> {
    Wrapper {
        build_variables,
        _query: PhantomData,
    }
}

impl<P, Q: GraphQlQuery> Wrapper<P, Q> {
    pub async fn load<E: QueryExecutor>(
        &self,
        executor: &E,
        params: &P,
        fallback_locale: &SiteLocale,
        draft_mode: bool,
    ) -> Result<PageRender<Q>, CmsError> {
        let variables = (self.build_variables)(params, fallback_locale);
        let data = executor
            .execute_with::<Q>(&variables, QueryOptions::drafts(draft_mode))
            .await?;

        debug!("Loaded {} (draft mode: {})", Q::OPERATION_NAME, draft_mode);

        Ok(if draft_mode {
            PageRender::RealTime {
                document: Q::DOCUMENT,
                variables,
                initial_data: data,
            }
        } else {
            PageRender::Content { data }
        })
    }
}
