use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use screenshotlayer_client::screenshotlayer::{CaptureRequest, Client, ClientConfig};
use tracing_subscriber::EnvFilter;

/// Capture a web page through the screenshotlayer API.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Page to capture.
    url: String,

    #[arg(long, env = "SCREENSHOTLAYER_ACCESS_KEY", hide_env_values = true)]
    access_key: String,

    /// API endpoint, defaults to the public service.
    #[arg(long, env = "SCREENSHOTLAYER_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, env = "SCREENSHOTLAYER_HTTPS")]
    https: bool,

    /// Where to write the image.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the request URL and exit.
    #[arg(long)]
    print_url: bool,

    #[arg(long)]
    fullpage: Option<String>,
    #[arg(long)]
    width: Option<String>,
    #[arg(long)]
    viewport: Option<String>,
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    secret_key: Option<String>,
    #[arg(long)]
    css_url: Option<String>,
    #[arg(long)]
    delay: Option<String>,
    #[arg(long)]
    ttl: Option<String>,
    #[arg(long)]
    force: Option<String>,
    #[arg(long)]
    placeholder: Option<String>,
    #[arg(long)]
    user_agent: Option<String>,
    #[arg(long)]
    accept_lang: Option<String>,
    #[arg(long)]
    export: Option<String>,
}

impl Args {
    fn config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            access_key: self.access_key.clone(),
            https: self.https,
        }
    }

    fn request(&self) -> CaptureRequest {
        CaptureRequest {
            url: Some(self.url.clone()),
            fullpage: self.fullpage.clone(),
            width: self.width.clone(),
            viewport: self.viewport.clone(),
            format: self.format.clone(),
            secret_key: self.secret_key.clone(),
            css_url: self.css_url.clone(),
            delay: self.delay.clone(),
            ttl: self.ttl.clone(),
            force: self.force.clone(),
            placeholder: self.placeholder.clone(),
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_lang.clone(),
            export: self.export.clone(),
        }
    }

    fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let ext = match self.format.as_deref() {
                Some(format) if !format.is_empty() => format.to_lowercase(),
                _ => "png".to_string(),
            };

            PathBuf::from(format!(
                "screenshot-{}.{ext}",
                Utc::now().format("%Y%m%dT%H%M%SZ")
            ))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let client = Client::new(&args.config()).context("Invalid API configuration")?;
    let request = args.request();

    if args.print_url {
        println!("{}", client.url_for(&request));
        return Ok(());
    }

    println!("Capturing {}", args.url);

    let image = client.capture(&request).await?;

    let output = args.output();
    tokio::fs::write(&output, &image)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Saved {} bytes to {}", image.len(), output.display());

    Ok(())
}
