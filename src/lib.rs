//! Localized blog post routes backed by a headless CMS.
//!
//! - `static_params`: every `{slug, locale}` page to pre-render
//! - `slug_lookup`: HTTP endpoint resolving a post's slug in every locale
//! - `page`: variables, metadata and content loading for the post page

pub mod cms;
pub mod config;
pub mod graphql;
pub mod locale;
pub mod locales;
pub mod page;
pub mod server;
pub mod slug_lookup;
pub mod static_params;
