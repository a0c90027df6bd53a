//! Shared content types.
//!
//! These mirror the CMS snapshot (`content.json`) and are serialized unchanged
//! into the scan manifest, so scan and generate agree on one definition.

use maud::{Markup, PreEscaped, Render};
use serde::{Deserialize, Serialize};

/// Pre-sanitized HTML from the content source.
///
/// The CMS is trusted to have sanitized these strings. They are emitted
/// verbatim and never parsed or executed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The text with every tag removed. Entities are left encoded, so the
    /// result is still valid HTML text content.
    pub fn without_tags(&self) -> String {
        let mut result = String::with_capacity(self.0.len());
        let mut in_tag = false;
        for c in self.0.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => result.push(c),
                _ => {}
            }
        }
        result
    }
}

impl Render for RichText {
    fn render(&self) -> Markup {
        PreEscaped(self.0.clone())
    }
}

/// Site name and tagline shown in the menu bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Main menu entry; links to `/<object_slug>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub object_slug: String,
}

/// A single piece of fetched content: blog post, CMS page, or the common
/// part of a portfolio entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: RichText,
    #[serde(default)]
    pub excerpt: RichText,
    #[serde(default)]
    pub body: RichText,
    /// Publish date as formatted by the CMS; displayed as-is.
    #[serde(default)]
    pub date: String,
    /// URL path segment.
    pub slug: String,
}

/// A CMS page. `template` selects an optional layout variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PageTemplate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    /// Page body followed by the portfolio grid.
    PortfolioUnderContent,
}

/// A portfolio entry: content plus the showcased website and its image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioItem {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

/// The full CMS snapshot, as read from `content.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub site: SiteInfo,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub posts: Vec<ContentItem>,
    #[serde(default)]
    pub portfolio: Vec<PortfolioItem>,
}
