//! Slugs, routes, and output paths.
//!
//! Every generated page has a route (`/`, `/blog/2`, `/post/hello-world`)
//! and every route maps to exactly one file in the output directory:
//!
//! ```text
//! /                 →  index.html
//! /blog             →  blog/index.html
//! /blog/2           →  blog/2/index.html
//! /post/hello       →  post/hello/index.html
//! ```
//!
//! Directory-style output keeps URLs extension-free on any static file server.

use std::path::PathBuf;

/// Slug of the CMS page that is served as the front page.
pub const HOME_SLUG: &str = "home";

/// Whether `slug` can be used as a single URL path segment.
///
/// Rejects empty slugs, slashes, whitespace, and `.`/`..`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains('/')
        && !slug.contains('\\')
        && !slug.chars().any(char::is_whitespace)
}

/// Append a slug to a route prefix: `("/post", "hello")` → `/post/hello`.
pub fn join_route(prefix: &str, slug: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), slug)
}

/// Route of a CMS page or menu target. The home slug is the site root.
pub fn page_route(slug: &str) -> String {
    if slug == HOME_SLUG {
        "/".to_string()
    } else {
        join_route("", slug)
    }
}

/// Output file for a route, relative to the output directory.
pub fn route_output_path(route: &str) -> PathBuf {
    let mut path = PathBuf::new();
    for segment in route.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push("index.html");
    path
}
