//! Content snapshot loading and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the CMS export and the site config from
//! the content directory, validates them, and produces the manifest the
//! generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── content.json     # CMS snapshot: site, menu, pages, posts, portfolio
//! ├── config.toml      # Site configuration (optional)
//! └── assets/          # Copied verbatim to the output root (optional)
//! ```
//!
//! ## Validation
//!
//! - Every page, post, and portfolio slug is a single non-empty path segment
//! - Slugs are unique within their collection
//!
//! Collection order is kept exactly as exported; the blog listing paginates
//! posts in that order.

use crate::config::{self, SiteConfig};
use crate::naming;
use crate::types::{ContentItem, ContentSnapshot, MenuItem, Page, PortfolioItem, SiteInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the CMS snapshot inside the content directory.
pub const CONTENT_FILE: &str = "content.json";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in content snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content snapshot not found: {0}")]
    MissingContent(PathBuf),
    #[error("Invalid slug {slug:?} in {collection}")]
    InvalidSlug {
        collection: &'static str,
        slug: String,
    },
    #[error("Duplicate slug {slug:?} in {collection}")]
    DuplicateSlug {
        collection: &'static str,
        slug: String,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub site: SiteInfo,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub posts: Vec<ContentItem>,
    #[serde(default)]
    pub portfolio: Vec<PortfolioItem>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let snapshot = load_snapshot(root)?;
    let config = config::load_config(root)?;

    check_slugs("pages", snapshot.pages.iter().map(|p| p.item.slug.as_str()))?;
    check_slugs("posts", snapshot.posts.iter().map(|p| p.slug.as_str()))?;
    check_slugs(
        "portfolio",
        snapshot.portfolio.iter().map(|p| p.item.slug.as_str()),
    )?;

    Ok(Manifest {
        site: snapshot.site,
        menu: snapshot.menu,
        pages: snapshot.pages,
        posts: snapshot.posts,
        portfolio: snapshot.portfolio,
        config,
    })
}

fn load_snapshot(root: &Path) -> Result<ContentSnapshot, ScanError> {
    let path = root.join(CONTENT_FILE);
    if !path.is_file() {
        return Err(ScanError::MissingContent(path));
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

fn check_slugs<'a>(
    collection: &'static str,
    slugs: impl Iterator<Item = &'a str>,
) -> Result<(), ScanError> {
    let mut seen = HashSet::new();
    for slug in slugs {
        if !naming::is_valid_slug(slug) {
            return Err(ScanError::InvalidSlug {
                collection,
                slug: slug.to_string(),
            });
        }
        if !seen.insert(slug) {
            return Err(ScanError::DuplicateSlug {
                collection,
                slug: slug.to_string(),
            });
        }
    }
    Ok(())
}
