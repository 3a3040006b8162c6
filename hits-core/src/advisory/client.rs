//! HTTP client for the HITS advisory API

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;

use crate::config::AdvisoryConfig;
use crate::error::{Error, Result};
use crate::HITS_VERSION;

use super::types::{CrimeReport, LocationAdvisory};

/// HTTP client for the HITS API
///
/// The server address is passed per call rather than stored, so a changed
/// preference applies to the very next request.
pub struct AdvisoryClient {
    http_client: reqwest::Client,
    hours: u32,
}

impl AdvisoryClient {
    /// Create a new advisory client from configuration
    pub fn new(config: &AdvisoryConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent())
                .map_err(|e| Error::Config(format!("invalid user agent: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            hours: config.hours,
        })
    }

    /// Submit a crime report
    ///
    /// Returns true if the server accepted it (HTTP 200). Any other status is
    /// `Ok(false)`; transport failures are errors.
    pub async fn submit_crime(&self, report: &CrimeReport, server: &str) -> Result<bool> {
        let url = report_crime_url(server);

        let response = self.http_client.post(&url).json(report).send().await?;

        let status = response.status();
        if status == StatusCode::OK {
            tracing::info!(
                criminal = %report.criminal,
                system = ?report.star_system,
                offence = ?report.offence,
                "Crime reported"
            );
            Ok(true)
        } else {
            tracing::debug!(
                status = %status,
                criminal = %report.criminal,
                "Crime report not accepted"
            );
            Ok(false)
        }
    }

    /// Fetch the advisory for a star system
    ///
    /// Returns None for any status other than HTTP 200.
    pub async fn check_location(
        &self,
        system: &str,
        server: &str,
    ) -> Result<Option<LocationAdvisory>> {
        let url = location_url(server, system, self.hours);

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(status = %status, system = %system, "No location advisory");
            return Ok(None);
        }

        let advisory: LocationAdvisory = response.json().await?;
        tracing::debug!(system = %system, ?advisory, "Location advisory received");
        Ok(Some(advisory))
    }

    /// Trailing window requested for location reports, in hours
    pub fn hours(&self) -> u32 {
        self.hours
    }
}

/// `User-Agent` value identifying this plugin to the HITS server
pub fn user_agent() -> String {
    format!("EDMC-HITS-{}", HITS_VERSION)
}

fn base_url(server: &str) -> String {
    format!("http://{}", server.trim().trim_end_matches('/'))
}

fn report_crime_url(server: &str) -> String {
    format!("{}/hits/v1/reportCrime", base_url(server))
}

fn location_url(server: &str, system: &str, hours: u32) -> String {
    format!(
        "{}/hits/v1/location/{}?hours={}",
        base_url(server),
        urlencoding::encode(system),
        hours
    )
}
