use clap::{Parser, Subcommand};
use odontoa_seo::types::ContentType;
use odontoa_seo::validate::{self, ValidationMode};
use odontoa_seo::{config, content, generate, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "odontoa-seo")]
#[command(about = "Static pages with validated schema.org structured data")]
#[command(long_about = "\
Static pages with validated schema.org structured data

Renders blog posts and glossary terms exported from the CMS to static HTML.
Every page carries exactly four JSON-LD objects (WebPage, BreadcrumbList,
Article or DefinedTerm, FAQPage) that are validated before they are emitted.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── blog/                        # Blog posts, one JSON document per file
  │   └── kako-odabrati-cetkicu.json
  └── glossary/                    # Glossary terms
      ├── plomba.json
      └── export.json              # Arrays work too; `_type` picks the kind

Run 'odontoa-seo gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Drop JSON-LD from pages that fail structural validation
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every record, section listings, sitemap.xml and robots.txt
    Build,
    /// Validate structured data for every record without writing anything
    Check,
    /// Print the JSON-LD for one record
    Schema {
        /// blog or glossary
        content_type: String,
        slug: String,
    },
    /// Extract and validate JSON-LD from a rendered HTML page
    Inspect { file: PathBuf },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let site_config = load_site_config(&cli.source, cli.strict)?;
            init_thread_pool(&site_config.processing);
            println!("==> Loading {}", cli.source.display());
            let records = content::load_records(&cli.source)?;
            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::build_site(&records, &site_config, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = load_site_config(&cli.source, cli.strict)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", cli.source.display());
            let records = content::load_records(&cli.source)?;
            let pages = generate::check_records(&records, &site_config)?;
            output::print_check_output(&pages);
            let failed = pages.iter().filter(|p| p.has_errors()).count();
            if failed > 0 {
                println!("==> Structured data invalid on {failed} page(s)");
                return Ok(ExitCode::FAILURE);
            }
            println!("==> Structured data is valid");
        }
        Command::Schema { content_type, slug } => {
            let content_type = ContentType::from_name(&content_type)
                .ok_or_else(|| format!("unknown content type {content_type:?} (blog, glossary)"))?;
            let site_config = load_site_config(&cli.source, cli.strict)?;
            let records = content::load_records(&cli.source)?;
            let record = content::find_record(&records, content_type, &slug)
                .ok_or_else(|| format!("no {content_type} record with slug {slug:?}"))?;
            let set = generate::Renderer::new(&site_config).structured_data(record)?;
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        Command::Inspect { file } => {
            let html = std::fs::read_to_string(&file)?;
            let report = validate::inspect_html(&html);
            output::print_inspect_output(&file, &report);
            if report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `config.toml` from the content root; `--strict` forces blocking mode.
fn load_site_config(
    source: &Path,
    strict: bool,
) -> Result<config::SiteConfig, config::ConfigError> {
    let mut site_config = config::load_config(source)?;
    if strict {
        site_config.validation.mode = ValidationMode::Blocking;
    }
    Ok(site_config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
