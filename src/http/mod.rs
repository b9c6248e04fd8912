//! HTTP client used to fetch release archives.

mod client;
mod status;

pub use client::HttpClient;
pub use status::{HttpStatusError, check_status};
