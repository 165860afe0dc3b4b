//! Client for the screenshotlayer capture API.
//!
//! ```no_run
//! use screenshotlayer_client::screenshotlayer::{CaptureRequest, Client, ClientConfig};
//!
//! # async fn example() -> screenshotlayer_client::screenshotlayer::Result<()> {
//! let client = Client::new(&ClientConfig::new("your_access_key"))?;
//! let png = client.capture(&CaptureRequest::new("https://example.com")).await?;
//! # Ok(())
//! # }
//! ```

pub mod screenshotlayer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
