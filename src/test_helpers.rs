//! Shared test utilities for the simple-press test suite.
//!
//! Builds content snapshots in code instead of shipping fixture files, so each
//! test states exactly how many posts it paginates.
//!
//! ```rust
//! let tmp = setup_content(&sample_snapshot(7));
//! let manifest = scan(tmp.path()).unwrap();
//! assert_eq!(post_slugs(&manifest).len(), 7);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::naming;
use crate::scan::{CONTENT_FILE, Manifest};
use crate::types::{
    ContentItem, ContentSnapshot, MenuItem, Page, PageTemplate, PortfolioItem, RichText, SiteInfo,
};

// =========================================================================
// Builders
// =========================================================================

/// A blog post numbered `n`, with slug `post-n`.
pub fn post(n: usize) -> ContentItem {
    ContentItem {
        id: n.to_string(),
        title: RichText::new(format!("Post {n}")),
        excerpt: RichText::new(format!("<p>Excerpt {n}</p>")),
        body: RichText::new(format!("<p>Body of post {n}</p>")),
        date: format!("2020-01-{:02}", (n % 28) + 1),
        slug: format!("post-{n}"),
    }
}

/// A snapshot with `post_count` posts, a home page using the portfolio
/// template, an about page, three menu entries, and two portfolio items.
pub fn sample_snapshot(post_count: usize) -> ContentSnapshot {
    ContentSnapshot {
        site: SiteInfo {
            name: "Acme Studio".to_string(),
            description: "We build websites".to_string(),
        },
        menu: vec![
            menu_item("Home", "home"),
            menu_item("Blog", "blog"),
            menu_item("About", "about"),
        ],
        pages: vec![
            Page {
                item: ContentItem {
                    id: "p1".to_string(),
                    title: RichText::new("Welcome"),
                    excerpt: RichText::default(),
                    body: RichText::new("<p>Front page intro</p>"),
                    date: String::new(),
                    slug: "home".to_string(),
                },
                template: Some(PageTemplate::PortfolioUnderContent),
            },
            Page {
                item: ContentItem {
                    id: "p2".to_string(),
                    title: RichText::new("About us"),
                    excerpt: RichText::default(),
                    body: RichText::new("<p>Who we are</p>"),
                    date: String::new(),
                    slug: "about".to_string(),
                },
                template: None,
            },
        ],
        posts: (1..=post_count).map(post).collect(),
        portfolio: vec![
            portfolio_item("shop", "Corner Shop"),
            portfolio_item("bakery", "Bakery"),
        ],
    }
}

fn menu_item(title: &str, slug: &str) -> MenuItem {
    MenuItem {
        title: title.to_string(),
        object_slug: slug.to_string(),
    }
}

fn portfolio_item(slug: &str, title: &str) -> PortfolioItem {
    PortfolioItem {
        item: ContentItem {
            id: format!("w-{slug}"),
            title: RichText::new(title),
            excerpt: RichText::new(format!("<p>{title} excerpt</p>")),
            body: RichText::new(format!("<p>{title} case study</p>")),
            date: String::new(),
            slug: slug.to_string(),
        },
        portfolio_url: Some(format!("https://{slug}.example")),
        featured_image: Some(format!("https://cdn.example/{slug}.png")),
    }
}

/// Build a manifest directly, skipping the scan stage.
pub fn sample_manifest(post_count: usize, posts_per_page: usize) -> Manifest {
    let snapshot = sample_snapshot(post_count);
    let mut config = SiteConfig::default();
    config.blog.posts_per_page = posts_per_page;
    Manifest {
        site: snapshot.site,
        menu: snapshot.menu,
        pages: snapshot.pages,
        posts: snapshot.posts,
        portfolio: snapshot.portfolio,
        config,
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `snapshot` as `content.json` into a fresh temp directory.
pub fn setup_content(snapshot: &ContentSnapshot) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let json = serde_json::to_string_pretty(snapshot).unwrap();
    fs::write(tmp.path().join(CONTENT_FILE), json).unwrap();
    tmp
}

// =========================================================================
// Lookups
// =========================================================================

/// All post slugs in manifest order.
pub fn post_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.posts.iter().map(|p| p.slug.as_str()).collect()
}

/// Read the generated HTML for `route`. Panics with the route on a miss.
pub fn read_route(output_dir: &Path, route: &str) -> String {
    let path = output_dir.join(naming::route_output_path(route));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("route '{route}' not generated at {}: {e}", path.display()))
}
