//! CLI output formatting for both pipeline stages.
//!
//! Output is an inventory of the site, not a file log: each entity leads with
//! its positional index and title, with routes and output files as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Site
//!     Acme Studio
//!     We build websites
//!
//! Menu
//! 001 Home → /
//! 002 Blog → /blog
//!
//! Pages
//! 001 Welcome
//!     Route: /
//!
//! Posts (7 posts, 3 listing pages of 3)
//! 001 Hello world
//!     Route: /post/hello-world
//!     Date: 2020-05-01
//!
//! Portfolio
//! 001 Corner Shop
//!     Route: /portfolio/corner-shop
//! ```
//!
//! ## Generate
//!
//! ```text
//! Welcome → index.html
//! Blog (page 1 of 3) → blog/index.html
//! Blog – Page 2 (page 2 of 3) → blog/2/index.html
//! Hello world → post/hello-world/index.html
//!
//! Generated 1 page, 3 listing pages, 7 posts, 2 portfolio entries
//! Stylesheet: style-3f9a0c41d2.css
//! Removed: 2 stale files
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout.

use crate::generate::{GenerateReport, RouteKind};
use crate::naming;
use crate::paginate;
use crate::scan::Manifest;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output: the content inventory with computed routes.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let routes = &manifest.config.routes;
    let mut lines = Vec::new();

    lines.push("Site".to_string());
    lines.push(format!("{}{}", indent(1), manifest.site.name));
    if !manifest.site.description.is_empty() {
        lines.push(format!("{}{}", indent(1), manifest.site.description));
    }

    if !manifest.menu.is_empty() {
        lines.push(String::new());
        lines.push("Menu".to_string());
        for (i, item) in manifest.menu.iter().enumerate() {
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                item.title,
                naming::page_route(&item.object_slug)
            ));
        }
    }

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            lines.push(format!(
                "{} {}",
                format_index(i + 1),
                page.item.title.without_tags()
            ));
            lines.push(format!(
                "{}Route: {}",
                indent(1),
                naming::page_route(&page.item.slug)
            ));
        }
    }

    lines.push(String::new());
    lines.push(posts_header(manifest));
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            post.title.without_tags()
        ));
        lines.push(format!(
            "{}Route: {}",
            indent(1),
            naming::join_route(&routes.post, &post.slug)
        ));
        if !post.date.is_empty() {
            lines.push(format!("{}Date: {}", indent(1), post.date));
        }
    }

    if !manifest.portfolio.is_empty() {
        lines.push(String::new());
        lines.push("Portfolio".to_string());
        for (i, entry) in manifest.portfolio.iter().enumerate() {
            lines.push(format!(
                "{} {}",
                format_index(i + 1),
                entry.item.title.without_tags()
            ));
            lines.push(format!(
                "{}Route: {}",
                indent(1),
                naming::join_route(&routes.portfolio, &entry.item.slug)
            ));
        }
    }

    lines
}

fn posts_header(manifest: &Manifest) -> String {
    let per_page = manifest.config.blog.posts_per_page;
    let count = manifest.posts.len();
    match paginate::page_count(count, per_page) {
        Ok(pages) => format!(
            "Posts ({}, {} of {})",
            plural(count, "post", "posts"),
            plural(pages, "listing page", "listing pages"),
            per_page
        ),
        Err(_) => format!("Posts ({})", plural(count, "post", "posts")),
    }
}

/// Print scan stage output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output: every written page by title, then a summary.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for route in &report.routes {
        let label = match &route.kind {
            RouteKind::Listing { page, total } => {
                format!("{} (page {} of {})", route.title, page, total)
            }
            RouteKind::EmptyListing => format!("{} (no posts)", route.title),
            _ => route.title.clone(),
        };
        lines.push(format!("{} → {}", label, route.output.display()));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}",
        plural(
            report.count(|k| matches!(k, RouteKind::Page | RouteKind::Home)),
            "page",
            "pages"
        ),
        plural(
            report.count(|k| matches!(k, RouteKind::Listing { .. } | RouteKind::EmptyListing)),
            "listing page",
            "listing pages"
        ),
        plural(report.count(|k| *k == RouteKind::Post), "post", "posts"),
        plural(
            report.count(|k| *k == RouteKind::Portfolio),
            "portfolio entry",
            "portfolio entries"
        ),
    ));
    lines.push(format!("Stylesheet: {}", report.stylesheet));
    if report.assets_copied > 0 {
        lines.push(format!(
            "Assets: {}",
            plural(report.assets_copied, "file", "files")
        ));
    }
    if report.stale_removed > 0 {
        lines.push(format!(
            "Removed: {}",
            plural(report.stale_removed, "stale file", "stale files")
        ));
    }

    lines
}

/// Print generate stage output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}
