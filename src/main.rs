use anyhow::{Context, Result};
use clap::Parser;
use product_lister::{Fetcher, HttpOptions, ProductSummary};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scrapes product listing pages and prints each page's products,
/// page sizes, descriptions and unit price total as JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Listing page URL(s) to scrape; each is printed as one JSON document
    #[arg(required = true, value_name = "URL")]
    urls: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Truncate response bodies longer than this many bytes
    #[arg(long, value_name = "BYTES", default_value_t = HttpOptions::default().max_body_size)]
    max_body_size: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,product_lister=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let options = HttpOptions::new()
        .allow_insecure(args.insecure)
        .max_body_size(args.max_body_size);
    let fetcher = Fetcher::new(options).context("failed to build HTTP client")?;

    for url in &args.urls {
        let summary = ProductSummary::fetch_with(&fetcher, url)
            .await
            .with_context(|| format!("failed to scrape {}", url))?;

        let json = if args.pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        };
        println!("{}", json);
    }

    Ok(())
}
