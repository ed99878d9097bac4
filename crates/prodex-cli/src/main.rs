mod run;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use prodex_render::{HttpRenderer, RenderSettings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prodex-cli")]
#[command(about = "Extract product title, image, price and currency from a web page")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, global = true, env = "PRODEX_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract from an HTML file already on disk
    File {
        /// Path to the HTML document
        path: PathBuf,
        /// URL the document was served from; relative image paths resolve against it
        #[arg(long, default_value = "")]
        base_url: String,
    },
    /// Fetch a product page and extract from it
    Url {
        /// Absolute http(s) URL of the product page
        url: String,
        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct RenderArgs {
    /// Per-request timeout in seconds
    #[arg(long, env = "PRODEX_RENDER_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
    /// User-Agent header sent with every request
    #[arg(
        long,
        env = "PRODEX_RENDER_USER_AGENT",
        default_value = "prodex/0.1 (product-extraction)"
    )]
    user_agent: String,
    /// Retries after the first failure for transient errors
    #[arg(long, env = "PRODEX_RENDER_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,
    /// Base delay for exponential backoff, in milliseconds
    #[arg(long, env = "PRODEX_RENDER_BACKOFF_BASE_MS", default_value_t = 500)]
    backoff_base_ms: u64,
}

impl From<RenderArgs> for RenderSettings {
    fn from(args: RenderArgs) -> Self {
        Self {
            timeout_secs: args.timeout_secs,
            user_agent: args.user_agent,
            max_retries: args.max_retries,
            backoff_base_ms: args.backoff_base_ms,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::File { path, base_url } => {
            let record = run::run_file(&path, &base_url)?;
            run::print_json(&record)?;
        }
        Commands::Url { url, render } => {
            if render.timeout_secs == 0 {
                anyhow::bail!("--timeout-secs must be greater than zero");
            }
            let renderer = HttpRenderer::new(render.into())?;
            let report = run::run_url(&renderer, &url).await?;
            run::print_json(&report)?;
        }
    }

    Ok(())
}
