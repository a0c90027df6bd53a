//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the content root overrides any subset of
//! them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [blog]
//! posts_per_page = 10       # Posts per listing page (must be > 0)
//!
//! [routes]
//! blog = "/blog"            # Listing root; page N lives at /blog/N
//! post = "/post"            # Single posts at /post/<slug>
//! portfolio = "/portfolio"  # Portfolio entries at /portfolio/<slug>
//!
//! [content]
//! format = "html"           # "html" or "markdown"
//!
//! [theme]
//! max_width = "960px"
//! font_family = "'Open Sans', sans-serif"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! border = "#eeeeee"
//! link = "#031b4d"
//! link_hover = "#000000"
//! menu_background = "#031b4d"
//! menu_text = "#ffffff"
//!
//! [colors.dark]
//! # same keys as [colors.light]
//!
//! [processing]
//! max_processes = 4         # Max render threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Blog listing settings.
    pub blog: BlogConfig,
    /// Route prefixes for generated pages.
    pub routes: RoutesConfig,
    /// How rich-text bodies from the content source are interpreted.
    pub content: ContentConfig,
    /// Layout settings.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blog.posts_per_page == 0 {
            return Err(ConfigError::Validation(
                "blog.posts_per_page must be at least 1".into(),
            ));
        }
        for (key, route) in [
            ("routes.blog", &self.routes.blog),
            ("routes.post", &self.routes.post),
            ("routes.portfolio", &self.routes.portfolio),
        ] {
            validate_route(key, route)?;
        }
        Ok(())
    }
}

fn validate_route(key: &str, route: &str) -> Result<(), ConfigError> {
    if !route.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{key} must start with '/': {route:?}"
        )));
    }
    if route == "/" || route.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{key} must name a path below the site root without a trailing '/': {route:?}"
        )));
    }
    if route.split('/').skip(1).any(|segment| segment.is_empty() || segment == "..") {
        return Err(ConfigError::Validation(format!(
            "{key} contains an empty or parent segment: {route:?}"
        )));
    }
    Ok(())
}

/// Blog listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Number of posts on each listing page.
    pub posts_per_page: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self { posts_per_page: 10 }
    }
}

/// Route prefixes. Each must start with `/` and have no trailing slash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// Root of the paginated blog listing.
    pub blog: String,
    /// Prefix for single post pages.
    pub post: String,
    /// Prefix for portfolio entry pages.
    pub portfolio: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            blog: "/blog".to_string(),
            post: "/post".to_string(),
            portfolio: "/portfolio".to_string(),
        }
    }
}

/// Interpretation of `excerpt` and `body` fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// Pre-sanitized HTML, emitted verbatim.
    #[default]
    Html,
    /// Markdown, converted to HTML at render time.
    Markdown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub format: ContentFormat,
}

/// Layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Maximum width of the menu bar and content column (CSS value).
    pub max_width: String,
    /// Body font stack (CSS value).
    pub font_family: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            max_width: "960px".to_string(),
            font_family: "'Open Sans', sans-serif".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Dates, captions, the page strip.
    pub text_muted: String,
    /// Card and page-number borders; also the current page highlight.
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Main menu bar background.
    pub menu_background: String,
    /// Main menu bar text and links.
    pub menu_text: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#eeeeee".to_string(),
            link: "#031b4d".to_string(),
            link_hover: "#000000".to_string(),
            menu_background: "#031b4d".to_string(),
            menu_text: "#ffffff".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#9db4e8".to_string(),
            link_hover: "#ffffff".to_string(),
            menu_background: "#010d26".to_string(),
            menu_text: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of render threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Press Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Blog listing
# ---------------------------------------------------------------------------
[blog]
# Posts shown on each listing page. Page 1 lives at the blog route,
# page N at <blog route>/N.
posts_per_page = 10

# ---------------------------------------------------------------------------
# Routes
# ---------------------------------------------------------------------------
[routes]
# Each route starts with "/" and has no trailing slash.
blog = "/blog"
post = "/post"
portfolio = "/portfolio"

# ---------------------------------------------------------------------------
# Content
# ---------------------------------------------------------------------------
[content]
# "html": excerpts and bodies are pre-sanitized HTML, emitted verbatim.
# "markdown": excerpts and bodies are converted from Markdown.
format = "html"

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
max_width = "960px"
font_family = "'Open Sans', sans-serif"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"
border = "#eeeeee"
link = "#031b4d"
link_hover = "#000000"
menu_background = "#031b4d"
menu_text = "#ffffff"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#9db4e8"
link_hover = "#ffffff"
menu_background = "#010d26"
menu_text = "#ffffff"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render threads.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = color_vars(&colors.light, "    "),
        dark = color_vars(&colors.dark, "        "),
    )
}

fn color_vars(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
        ("--color-menu-bg", &scheme.menu_background),
        ("--color-menu-text", &scheme.menu_text),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --max-width: {max_width};
    --font-family: {font_family};
}}"#,
        max_width = theme.max_width,
        font_family = theme.font_family,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.blog.posts_per_page, 10);
        assert_eq!(config.routes.blog, "/blog");
        assert_eq!(config.routes.post, "/post");
        assert_eq!(config.routes.portfolio, "/portfolio");
        assert_eq!(config.content.format, ContentFormat::Html);
        assert_eq!(config.theme.max_width, "960px");
        assert_eq!(config.colors.light.menu_background, "#031b4d");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[blog]
posts_per_page = 3
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.blog.posts_per_page, 3);
        assert_eq!(config.routes.blog, "/blog");
        assert_eq!(config.colors.light.background, "#ffffff");
    }

    #[test]
    fn parse_markdown_format() {
        let config: SiteConfig = toml::from_str("[content]\nformat = \"markdown\"\n").unwrap();
        assert_eq!(config.content.format, ContentFormat::Markdown);
    }

    #[test]
    fn unknown_format_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[content]\nformat = \"rst\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_posts_per_page() {
        let mut config = SiteConfig::default();
        config.blog.posts_per_page = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_route_without_leading_slash() {
        let mut config = SiteConfig::default();
        config.routes.blog = "blog".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_route_with_trailing_slash() {
        let mut config = SiteConfig::default();
        config.routes.post = "/post/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_root_route_rejected() {
        let mut config = SiteConfig::default();
        config.routes.portfolio = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_nested_route_ok() {
        let mut config = SiteConfig::default();
        config.routes.blog = "/news/archive".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_parent_segment_rejected() {
        let mut config = SiteConfig::default();
        config.routes.blog = "/news/../etc".to_string();
        assert!(config.validate().is_err());
        config.routes.blog = "/news//archive".to_string();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.blog.posts_per_page, 10);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[routes]
blog = "/news"

[colors.light]
menu_background = "#123456"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.routes.blog, "/news");
        assert_eq!(config.routes.post, "/post");
        assert_eq!(config.colors.light.menu_background, "#123456");
        assert_eq!(config.colors.light.text, "#111111");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[blog]\nposts_per_page = 0\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[blog]\nposts_per_pgae = 5\n",
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[images]\nquality = 90\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base = stock_defaults_value();
        let overlay: toml::Value =
            toml::from_str("[colors.dark]\nlink = \"#ff0000\"\n").unwrap();
        let config: SiteConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(config.colors.dark.link, "#ff0000");
        assert_eq!(config.colors.dark.background, "#0a0a0a");
        assert_eq!(config.colors.light.link, "#031b4d");
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[routes]\nblog = \"blog\"\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // processing
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_constrained_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // stock config and CSS
    // =========================================================================

    #[test]
    fn stock_config_toml_matches_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.blog.posts_per_page, defaults.blog.posts_per_page);
        assert_eq!(config.routes.blog, defaults.routes.blog);
        assert_eq!(config.colors.dark.link, defaults.colors.dark.link);
        assert_eq!(config.colors.light.menu_text, defaults.colors.light.menu_text);
        assert_eq!(config.theme.font_family, defaults.theme.font_family);
        assert!(config.processing.max_processes.is_none());
    }

    #[test]
    fn color_css_has_both_schemes() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0;"));
        assert!(css.contains("--color-bg: #1a1a1a;"));
        assert!(css.contains("--color-menu-bg:"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
    }

    #[test]
    fn theme_css_variables() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--max-width: 960px;"));
        assert!(css.contains("--font-family: 'Open Sans', sans-serif;"));
    }
}
