use clap::{Parser, Subcommand};
use env_logger::Env;
use simple_folio::{config, content, generate, markup, output, render};
use std::path::PathBuf;

fn version_string() -> &'static str {
    match (env!("FOLIO_RELEASE"), env!("FOLIO_COMMIT")) {
        ("true", _) => env!("CARGO_PKG_VERSION"),
        (_, "") => "dev@unknown",
        // Leaked once at startup
        (_, commit) => Box::leak(format!("dev@{commit}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Static site generator for portfolio, resume and blog sites")]
#[command(long_about = "\
Static site generator for portfolio, resume and blog sites

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── resume.toml                  # Resume for the home page (optional)
  ├── blog/
  │   └── hello-world.md           # Post: +++ TOML front matter +++, then body
  ├── projects/
  │   └── contract-search.toml     # Project
  └── assets/                      # Copied to the output root

Post bodies use markdown-lite: ## headings, - lists, ``` code, > quotes,
*callouts*, **bold**, `code`, [links](url) and {{youtube:ID}} embeds.

Run 'simple-folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load content and write the site
    Build {
        /// Rewrite every file, ignoring the write cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Validate the content directory without building
    Check,
    /// Render one markdown-lite file to HTML on stdout
    Render { file: PathBuf },
    /// Print the blocks of one markdown-lite file as JSON
    Blocks { file: PathBuf },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { no_cache } => {
            println!("==> Loading {}", cli.source.display());
            let manifest = content::load(&cli.source)?;
            init_thread_pool(&manifest.config.processing);

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest, &cli.source, &cli.output, !no_cache)?;
            output::print_build_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = content::load(&cli.source)?;
            output::print_content_output(&manifest);
            println!("==> Content is valid");
        }
        Command::Render { file } => {
            let source = std::fs::read_to_string(&file)?;
            let body = content::split_front_matter(&source).map_or(source.as_str(), |(_, b)| b);
            println!("{}", render::document(body).into_string());
        }
        Command::Blocks { file } => {
            let source = std::fs::read_to_string(&file)?;
            let body = content::split_front_matter(&source).map_or(source.as_str(), |(_, b)| b);
            let blocks = markup::scan(body);
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    log::debug!("rendering with {threads} threads");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
