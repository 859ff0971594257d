use clap::{Parser, Subcommand};
use photofunia_client::{Config, PhotoFuniaClient, TracingLogger};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "funiactl", about = "Apply PhotoFunia effects to local images", version)]
struct Cli {
    /// Override PHOTOFUNIA_URL
    #[arg(global = true, long)]
    base_url: Option<String>,

    /// Override PHOTOFUNIA_TIMEOUT_SECS
    #[arg(global = true, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the effective environment before running
    #[arg(global = true, long)]
    show_env: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the "fat maker" effect
    Fatify {
        /// Input image
        input: PathBuf,
        /// Output path (defaults to ./<stem>-fatify.jpg)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Apply the clown effect
    Clownify {
        /// Input image
        input: PathBuf,
        /// Add a clown hat
        #[arg(long)]
        hat: bool,
        /// Output path (defaults to ./<stem>-clownify.jpg)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Config::dotenv_load();
    let cli = Cli::parse();
    if cli.show_env {
        Config::print_env_vars();
    }

    let mut conf = Config::new();
    if let Some(url) = cli.base_url {
        conf.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        conf.timeout = Duration::from_secs(secs);
    }

    let mut client = PhotoFuniaClient::from_config(&conf)?.with_logger(TracingLogger);

    let (input, out, result) = match cli.command {
        Commands::Fatify { input, out } => {
            let file = tokio::fs::File::open(&input).await?;
            let result = client.fatify(file).await;
            let out = out.unwrap_or_else(|| default_output(&input, "fatify"));
            (input, out, result)
        }
        Commands::Clownify { input, hat, out } => {
            let file = tokio::fs::File::open(&input).await?;
            let result = client.clownify(file, hat).await;
            let out = out.unwrap_or_else(|| default_output(&input, "clownify"));
            (input, out, result)
        }
    };

    match result {
        Ok(bytes) => {
            tokio::fs::write(&out, &bytes).await?;
            println!("Saved {} ({} bytes) from {}", out.display(), bytes.len(), input.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = std::error::Error::source(cause);
            }
            std::process::exit(1);
        }
    }
}

fn default_output(input: &Path, effect: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    PathBuf::from(format!("{}-{}.jpg", stem, effect))
}
