//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and writes the final
//! static site.
//!
//! ## Generated Pages
//!
//! - **Front page** (`/`): the CMS page with slug `home`, or the portfolio grid
//! - **CMS pages** (`/{slug}`): page body, optionally followed by the portfolio grid
//! - **Blog listing** (`/blog`, `/blog/2`, ...): one page per [`paginate`] chunk
//! - **Posts** (`/post/{slug}`): full post body
//! - **Portfolio entries** (`/portfolio/{slug}`): website link, featured image, content
//!
//! Route prefixes come from `[routes]` in `config.toml`.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── style-3f9a0c41d2.css       # Hashed: name changes when CSS changes
//! ├── about/index.html
//! ├── blog/
//! │   ├── index.html             # Listing page 1
//! │   └── 2/index.html           # Listing page 2
//! ├── post/hello-world/index.html
//! ├── portfolio/corner-shop/index.html
//! └── ...                        # Everything under content/assets/
//! ```
//!
//! ## Rich Text
//!
//! Titles, excerpts, and bodies arrive from the CMS already sanitized and are
//! emitted verbatim through [`RichText`]. With `content.format = "markdown"`
//! excerpts and bodies are converted with pulldown-cmark first. Everything
//! else (site name, menu titles, dates, URLs) is escaped by maud.
//!
//! ## Empty Blog
//!
//! The paginator yields no pages for zero posts. The blog root is still
//! rendered, with a "No posts yet." notice, so menu links to it resolve.
//!
//! ## Reused Output Directories
//!
//! Nothing in the output directory is overwritten by accident. An asset whose
//! path matches a page, the stylesheet, or the build record aborts the build
//! before anything is written. Files an earlier build wrote but this one no
//! longer produces (listing pages past the new last page, deleted posts, an
//! old stylesheet) are removed, using the [`record`](crate::record) kept in
//! the output root.
//!
//! ## Parallel Rendering
//!
//! Pages are rendered with rayon and written afterwards in route order, so the
//! output is identical for any thread count.

use crate::config::{self, ContentFormat, SiteConfig};
use crate::naming;
use crate::paginate::{PageDescriptor, PaginateError, paginate};
use crate::record::{self, BuildRecord};
use crate::scan::Manifest;
use crate::types::{ContentItem, Page, PageTemplate, PortfolioItem, RichText};
use maud::{DOCTYPE, Markup, PreEscaped, Render, html};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Pagination error: {0}")]
    Paginate(#[from] PaginateError),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Output conflict: {0}")]
    RouteConflict(String),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// What kind of page a route holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// Portfolio grid at `/` when no `home` page exists.
    Home,
    Page,
    Listing { page: usize, total: usize },
    /// Blog root with no posts.
    EmptyListing,
    Post,
    Portfolio,
}

/// A route written by the generate stage.
#[derive(Debug, Clone)]
pub struct GeneratedRoute {
    pub route: String,
    /// Output file relative to the output directory.
    pub output: PathBuf,
    pub kind: RouteKind,
    /// Title with markup stripped, as shown in the browser tab.
    pub title: String,
}

/// Summary of a generate run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Routes in the order they were written (sorted by route).
    pub routes: Vec<GeneratedRoute>,
    /// File name of the hashed stylesheet.
    pub stylesheet: String,
    /// Number of files copied from `assets/`.
    pub assets_copied: usize,
    /// Files from an earlier build that this build removed.
    pub stale_removed: usize,
}

impl GenerateReport {
    pub fn count(&self, pred: impl Fn(&RouteKind) -> bool) -> usize {
        self.routes.iter().filter(|r| pred(&r.kind)).count()
    }
}

/// Read the manifest written by the scan stage.
pub fn load_manifest(manifest_path: &Path) -> Result<Manifest, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    Ok(serde_json::from_str(&manifest_content)?)
}

/// Read the manifest written by the scan stage and generate the site.
pub fn generate(
    manifest_path: &Path,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let manifest = load_manifest(manifest_path)?;
    generate_site(&manifest, source_dir, output_dir)
}

/// Generate the site from an in-memory manifest.
pub fn generate_site(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let jobs = plan_routes(manifest)?;

    let css = build_css(&manifest.config);
    let stylesheet = stylesheet_file_name(&css);
    let assets = plan_assets(&source_dir.join("assets"), &jobs, &stylesheet)?;
    let ctx = RenderContext {
        manifest,
        stylesheet_href: format!("/{stylesheet}"),
    };

    let mut rendered: Vec<(&String, &RenderJob<'_>, String)> = jobs
        .par_iter()
        .map(|(route, job)| (route, job, render_job(job, route, &ctx).into_string()))
        .collect();
    rendered.sort_by(|a, b| a.0.cmp(b.0));

    let written = BuildRecord::new(
        rendered
            .iter()
            .map(|(route, _, _)| naming::route_output_path(route))
            .chain(assets.iter().map(|asset| asset.output.clone()))
            .chain([PathBuf::from(&stylesheet)]),
    );

    fs::create_dir_all(output_dir)?;
    let previous = BuildRecord::load(output_dir);
    let stale_removed = record::remove_stale(output_dir, &previous, &written)?;

    fs::write(output_dir.join(&stylesheet), &css)?;

    let mut routes = Vec::with_capacity(rendered.len());
    for (route, job, html) in rendered {
        let output = naming::route_output_path(route);
        let path = output_dir.join(&output);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        routes.push(GeneratedRoute {
            route: route.clone(),
            output,
            kind: job.kind(),
            title: job.title(),
        });
    }

    let assets_copied = copy_assets(&assets, output_dir)?;
    written.save(output_dir)?;

    Ok(GenerateReport {
        routes,
        stylesheet,
        assets_copied,
        stale_removed,
    })
}

// ============================================================================
// Route planning
// ============================================================================

enum RenderJob<'a> {
    Home,
    Page(&'a Page),
    Listing(PageDescriptor<'a, ContentItem>),
    EmptyListing,
    Post(&'a ContentItem),
    Portfolio(&'a PortfolioItem),
}

impl RenderJob<'_> {
    fn kind(&self) -> RouteKind {
        match self {
            RenderJob::Home => RouteKind::Home,
            RenderJob::Page(_) => RouteKind::Page,
            RenderJob::Listing(page) => RouteKind::Listing {
                page: page.index,
                total: page.total_pages,
            },
            RenderJob::EmptyListing => RouteKind::EmptyListing,
            RenderJob::Post(_) => RouteKind::Post,
            RenderJob::Portfolio(_) => RouteKind::Portfolio,
        }
    }

    /// Text of the `<title>` element, before the site name.
    fn title(&self) -> String {
        match self {
            RenderJob::Home => "Home".to_string(),
            RenderJob::Page(page) => page.item.title.without_tags(),
            RenderJob::Listing(page) if page.index == 1 => "Blog".to_string(),
            RenderJob::Listing(page) => format!("Blog – Page {}", page.index),
            RenderJob::EmptyListing => "Blog".to_string(),
            RenderJob::Post(post) => post.title.without_tags(),
            RenderJob::Portfolio(item) => item.item.title.without_tags(),
        }
    }
}

/// Every route of the site paired with what renders there.
fn plan_routes(manifest: &Manifest) -> Result<Vec<(String, RenderJob<'_>)>, GenerateError> {
    let routes = &manifest.config.routes;
    let mut jobs = Vec::new();

    if !manifest
        .pages
        .iter()
        .any(|p| p.item.slug == naming::HOME_SLUG)
    {
        jobs.push(("/".to_string(), RenderJob::Home));
    }
    for page in &manifest.pages {
        jobs.push((naming::page_route(&page.item.slug), RenderJob::Page(page)));
    }

    let listing = paginate(
        &manifest.posts,
        manifest.config.blog.posts_per_page,
        &routes.blog,
    )?;
    if listing.is_empty() {
        jobs.push((routes.blog.clone(), RenderJob::EmptyListing));
    }
    for page in listing {
        jobs.push((page.route(), RenderJob::Listing(page)));
    }

    for post in &manifest.posts {
        jobs.push((
            naming::join_route(&routes.post, &post.slug),
            RenderJob::Post(post),
        ));
    }
    for item in &manifest.portfolio {
        jobs.push((
            naming::join_route(&routes.portfolio, &item.item.slug),
            RenderJob::Portfolio(item),
        ));
    }

    check_unique_routes(&jobs)?;
    Ok(jobs)
}

fn check_unique_routes(jobs: &[(String, RenderJob<'_>)]) -> Result<(), GenerateError> {
    let mut seen = HashSet::new();
    for (route, _) in jobs {
        if !seen.insert(route.as_str()) {
            return Err(GenerateError::RouteConflict(route.clone()));
        }
    }
    Ok(())
}

// ============================================================================
// Assets and stylesheet
// ============================================================================

fn build_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_theme_css(&config.theme),
        config::generate_color_css(&config.colors),
        CSS_STATIC
    )
}

/// `style-<first 10 hex digits of SHA-256>.css`
pub fn stylesheet_file_name(css: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(css.as_bytes()));
    format!("style-{}.css", &digest[..10])
}

/// A file under `assets/` and where it lands in the output directory.
struct Asset {
    source: PathBuf,
    output: PathBuf,
}

/// List every file under `assets_dir`, failing if one would replace a
/// generated file or sit where a page needs a directory.
fn plan_assets(
    assets_dir: &Path,
    jobs: &[(String, RenderJob<'_>)],
    stylesheet: &str,
) -> Result<Vec<Asset>, GenerateError> {
    if !assets_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut claimed: HashMap<PathBuf, String> = HashMap::new();
    for (route, _) in jobs {
        let output = naming::route_output_path(route);
        for dir in output.ancestors().skip(1) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            claimed
                .entry(dir.to_path_buf())
                .or_insert_with(|| format!("the directory of route {route}"));
        }
        claimed.insert(output, format!("route {route}"));
    }
    claimed.insert(PathBuf::from(stylesheet), "the stylesheet".to_string());
    claimed.insert(
        PathBuf::from(record::RECORD_FILENAME),
        "the build record".to_string(),
    );

    let mut assets = Vec::new();
    for entry in WalkDir::new(assets_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(assets_dir) else {
            continue;
        };
        if let Some(owner) = claimed.get(rel) {
            return Err(GenerateError::RouteConflict(format!(
                "assets/{} would replace {owner}",
                rel.display()
            )));
        }
        assets.push(Asset {
            source: entry.path().to_path_buf(),
            output: rel.to_path_buf(),
        });
    }
    Ok(assets)
}

/// Copy planned assets into `output_dir`, keeping relative paths.
fn copy_assets(assets: &[Asset], output_dir: &Path) -> Result<usize, GenerateError> {
    for asset in assets {
        let dst = output_dir.join(&asset.output);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&asset.source, &dst)?;
    }
    Ok(assets.len())
}

// ============================================================================
// HTML Components
// ============================================================================

struct RenderContext<'a> {
    manifest: &'a Manifest,
    stylesheet_href: String,
}

impl RenderContext<'_> {
    fn config(&self) -> &SiteConfig {
        &self.manifest.config
    }

    fn format(&self) -> ContentFormat {
        self.manifest.config.content.format
    }
}

fn render_job(job: &RenderJob<'_>, route: &str, ctx: &RenderContext<'_>) -> Markup {
    let title = job.title();
    match job {
        RenderJob::Home => render_home(&title, route, ctx),
        RenderJob::Page(page) => render_page(page, &title, route, ctx),
        RenderJob::Listing(page) => render_listing(page, &title, ctx),
        RenderJob::EmptyListing => render_empty_listing(&title, route, ctx),
        RenderJob::Post(post) => render_post(post, &title, route, ctx),
        RenderJob::Portfolio(item) => render_portfolio_item(item, &title, route, ctx),
    }
}

/// Excerpt or body markup according to the configured content format.
fn rich(text: &RichText, format: ContentFormat) -> Markup {
    match format {
        ContentFormat::Html => text.render(),
        ContentFormat::Markdown => {
            let mut out = String::new();
            md_html::push_html(&mut out, Parser::new(text.as_str()));
            PreEscaped(out)
        }
    }
}

/// Renders the base HTML document: head, main menu, content column.
///
/// `title` is HTML text without tags; entities in it are kept as written.
fn base_document(title: &str, route: &str, ctx: &RenderContext<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (PreEscaped(title)) " | " (ctx.manifest.site.name) }
                link rel="stylesheet" href=(ctx.stylesheet_href);
            }
            body {
                (main_menu(route, ctx))
                div.content {
                    (content)
                }
            }
        }
    }
}

/// Renders the menu bar: site name and tagline, then the menu links.
fn main_menu(route: &str, ctx: &RenderContext<'_>) -> Markup {
    let site = &ctx.manifest.site;
    html! {
        div.main-menu {
            div.main-menu-inner {
                div.site-info {
                    div.site-title { (site.name) }
                    @if !site.description.is_empty() {
                        div { (site.description) }
                    }
                }
                @for item in &ctx.manifest.menu {
                    @let target = naming::page_route(&item.object_slug);
                    @let is_current = is_current_route(route, &target);
                    a.menu-item.current[is_current] href=(target) { (item.title) }
                }
            }
        }
    }
}

/// Whether a menu target covers `route`: exact match, or a parent of it.
fn is_current_route(route: &str, target: &str) -> bool {
    route == target || (target != "/" && route.starts_with(&format!("{target}/")))
}

fn post_link(post: &ContentItem, ctx: &RenderContext<'_>) -> String {
    naming::join_route(&ctx.config().routes.post, &post.slug)
}

/// Renders the page number strip; nothing for a single-page listing.
fn pagination_strip(page: &PageDescriptor<'_, ContentItem>) -> Markup {
    html! {
        @if page.total_pages > 1 {
            nav.pagination {
                @for n in page.page_numbers() {
                    @let is_current = page.is_current(n);
                    div.page-number.current[is_current] {
                        a href=(page.link_target(n)) aria-current=[is_current.then_some("page")] {
                            (n)
                        }
                    }
                }
            }
        }
    }
}

fn portfolio_grid(ctx: &RenderContext<'_>) -> Markup {
    let prefix = &ctx.config().routes.portfolio;
    html! {
        div.portfolio-items {
            @for entry in &ctx.manifest.portfolio {
                div.portfolio-item {
                    h2 { (entry.item.title) }
                    @if let Some(src) = &entry.featured_image {
                        img src=(src) alt="Thumbnail";
                    }
                    @if !entry.item.excerpt.is_empty() {
                        div { (rich(&entry.item.excerpt, ctx.format())) }
                    }
                    a href=(naming::join_route(prefix, &entry.item.slug)) { "Read more" }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Front page when the CMS has no `home` page.
fn render_home(title: &str, route: &str, ctx: &RenderContext<'_>) -> Markup {
    let content = html! {
        (portfolio_grid(ctx))
    };
    base_document(title, route, ctx, content)
}

fn render_page(page: &Page, title: &str, route: &str, ctx: &RenderContext<'_>) -> Markup {
    let content = html! {
        h1 { (page.item.title) }
        div.page-body { (rich(&page.item.body, ctx.format())) }
        @if page.template == Some(PageTemplate::PortfolioUnderContent) {
            (portfolio_grid(ctx))
        }
    };
    base_document(title, route, ctx, content)
}

/// One page of the blog listing.
fn render_listing(
    page: &PageDescriptor<'_, ContentItem>,
    title: &str,
    ctx: &RenderContext<'_>,
) -> Markup {
    let content = html! {
        @for post in page.items {
            div.post-summary {
                h3 { (post.title) }
                small { (post.date) }
                @if !post.excerpt.is_empty() {
                    div.excerpt { (rich(&post.excerpt, ctx.format())) }
                }
                div {
                    a href=(post_link(post, ctx)) { "Read more..." }
                }
            }
        }
        (pagination_strip(page))
    };
    base_document(title, &page.route(), ctx, content)
}

fn render_empty_listing(title: &str, route: &str, ctx: &RenderContext<'_>) -> Markup {
    let content = html! {
        p.empty-listing { "No posts yet." }
    };
    base_document(title, route, ctx, content)
}

fn render_post(post: &ContentItem, title: &str, route: &str, ctx: &RenderContext<'_>) -> Markup {
    let content = html! {
        article.post {
            h1 { (post.title) }
            @if !post.date.is_empty() {
                small { (post.date) }
            }
            div.post-body { (rich(&post.body, ctx.format())) }
        }
    };
    base_document(title, route, ctx, content)
}

fn render_portfolio_item(
    item: &PortfolioItem,
    title: &str,
    route: &str,
    ctx: &RenderContext<'_>,
) -> Markup {
    let content = html! {
        h1 { (item.item.title) }
        @if let Some(url) = &item.portfolio_url {
            strong { "Website url: " }
            a href=(url) target="_blank" rel="noreferrer" { (url) }
        }
        @if let Some(src) = &item.featured_image {
            div {
                img.featured-image src=(src) alt="";
            }
        }
        div.portfolio-content { (rich(&item.item.body, ctx.format())) }
    };
    base_document(title, route, ctx, content)
}

// ============================================================================
// Tests
// ============================================================================
