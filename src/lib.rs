//! # Simple Press
//!
//! A minimal static site generator for blog and portfolio sites whose content
//! lives in a CMS. The CMS exports a JSON snapshot; Simple Press turns it into
//! plain HTML files.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json   (snapshot + config → validated manifest)
//! 2. Generate  manifest  →  dist/           (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so a failed build can be inspected
//! between stages, and the generate stage can be tested from an in-memory
//! manifest without touching a content directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads `content.json` and `config.toml`, validates slugs |
//! | [`generate`] | Stage 2: renders every route with Maud and writes `dist/` |
//! | [`paginate`] | Splits the post list into listing pages and computes page links |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Content types shared between stages (`ContentItem`, `RichText`, ...) |
//! | [`naming`] | Slug validation and route → output path mapping |
//! | [`record`] | Files written by the last build, for removing stale output |
//! | [`output`] | CLI output formatting for both stages |
//!
//! # Trust Boundary
//!
//! Titles, excerpts, and bodies are HTML the CMS has already sanitized. They
//! are carried as [`types::RichText`] and written out verbatim. Simple Press
//! does not parse, rewrite, or sanitize them. Every other string goes through
//! Maud's escaping.
//!
//! # Routes
//!
//! Every page is `<route>/index.html`. The blog listing is paginated:
//! `/blog` is page 1, `/blog/2` page 2, and so on. All listing pages are
//! computed once per build by [`paginate::paginate`].

pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod paginate;
pub mod record;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
