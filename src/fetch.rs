//! Listing page acquisition.
//!
//! `ListingSource` is the seam between the monitor and the network, so
//! tests can feed fixture HTML without a server. The HTTP implementation
//! fetches the flight-only listing with the same query shape and header set
//! the site serves to a regular browser session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::RouteConfig;

const URL_TEMPLATE: &str = "https://www.tui.fi/lms/all?start=0&airport={airport}&date=&destination={destination}&resort=&duration={duration}&location=&selection=flightonly&pagesize=100&sorting=date";

#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the raw listing HTML. Any failure comes back as one
    /// descriptive error for the throttle path.
    async fn fetch_listing(&self) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub struct HttpListingSource {
    client: reqwest::Client,
    url: String,
}

impl HttpListingSource {
    pub fn new(route: &RouteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            url: listing_url(route),
        })
    }
}

fn listing_url(route: &RouteConfig) -> String {
    URL_TEMPLATE
        .replace("{airport}", &route.airport)
        .replace("{destination}", &route.destination)
        .replace("{duration}", &route.duration)
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Accept",
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    headers.insert("Accept-Language", HeaderValue::from_static("fi-FI,fi;q=0.9"));
    headers.insert("Cache-Control", HeaderValue::from_static("max-age=0"));
    headers.insert(
        "User-Agent",
        HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
    );
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_listing(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("fetch listing page")?;
        let resp = resp.error_for_status().context("listing page status")?;
        resp.text().await.context("read listing body")
    }

    fn name(&self) -> &'static str {
        "HttpListingSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_fills_route_parameters() {
        let route = RouteConfig {
            airport: "HEL".into(),
            destination: "GR".into(),
            duration: "7".into(),
        };
        let url = listing_url(&route);
        assert!(url.contains("airport=HEL"));
        assert!(url.contains("destination=GR"));
        assert!(url.contains("duration=7"));
        assert!(url.contains("selection=flightonly"));
    }
}
