use clap::{Parser, Subcommand};
use simple_press::{config, generate, output, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simple-press")]
#[command(about = "Static site generator for CMS-exported blog and portfolio sites")]
#[command(long_about = "\
Static site generator for CMS-exported blog and portfolio sites

The CMS exports a JSON snapshot of the site; simple-press renders it to
plain HTML. Blog posts are split into numbered listing pages.

Content structure:

  content/
  ├── content.json     # CMS snapshot: site, menu, pages, posts, portfolio
  ├── config.toml      # Site config (optional)
  └── assets/          # Copied verbatim to the output root

Routes (prefixes configurable in config.toml):

  /                    # CMS page with slug \"home\", or the portfolio grid
  /<slug>              # CMS pages
  /blog, /blog/2, ...  # Paginated blog listing
  /post/<slug>         # Single posts
  /portfolio/<slug>    # Portfolio entries

Run 'simple-press gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for the intermediate manifest
    #[arg(long, default_value = ".simple-press-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read the content snapshot into a manifest
    Scan,
    /// Produce the HTML site from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate the content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let manifest_path = cli.temp_dir.join("manifest.json");

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir, &manifest_path)?;
            output::print_scan_output(&manifest);
        }
        Command::Generate => {
            let manifest = generate::load_manifest(&manifest_path)?;
            init_thread_pool(&manifest.config.processing);
            let report = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir, &manifest_path)?;
            output::print_scan_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn write_manifest(
    manifest: &scan::Manifest,
    temp_dir: &Path,
    manifest_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(manifest_path, json)?;
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
