use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One SEO tag as the CMS generates it (`_seoMetaTags`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoTag {
    pub tag: String,
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub content: Option<String>,
}

impl SeoTag {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(name).map(String::as_str)
    }
}

/// Page metadata distilled from SEO tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `og:*` properties, keyed without the prefix
    pub open_graph: BTreeMap<String, String>,
    /// `twitter:*` names, keyed without the prefix
    pub twitter: BTreeMap<String, String>,
    /// Any other named meta tag
    pub other: BTreeMap<String, String>,
}

impl PageMetadata {
    pub fn from_seo_tags(tags: &[SeoTag]) -> Self {
        let mut metadata = Self::default();

        for tag in tags {
            match tag.tag.as_str() {
                "title" => metadata.title = tag.content.clone(),
                "meta" => {
                    let Some(content) = tag.attribute("content") else {
                        continue;
                    };
                    let key = tag.attribute("property").or_else(|| tag.attribute("name"));
                    match key {
                        Some("description") => metadata.description = Some(content.to_string()),
                        Some(key) => {
                            if let Some(og) = key.strip_prefix("og:") {
                                metadata.open_graph.insert(og.to_string(), content.to_string());
                            } else if let Some(tw) = key.strip_prefix("twitter:") {
                                metadata.twitter.insert(tw.to_string(), content.to_string());
                            } else {
                                metadata.other.insert(key.to_string(), content.to_string());
                            }
                        }
                        None => {}
                    }
                }
                // link tags (favicons etc.) are handled by the site layout
                _ => {}
            }
        }

        metadata
    }
}
