//! Request and response payloads for the HITS API

use serde::{Deserialize, Serialize};

/// Kind of player-caused hostile act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Offence {
    Interdiction,
    Murder,
}

/// Body of `POST /hits/v1/reportCrime`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeReport {
    /// Commander name without the `Cmdr ` prefix
    pub criminal: String,
    /// Current system as known to the host; `null` on the wire when unknown
    pub star_system: Option<String>,
    /// Journal timestamp of the offending entry, passed through verbatim
    pub timestamp: String,
    pub offence: Offence,
}

/// Response of `GET /hits/v1/location/{system}`
///
/// The advice and the traffic totals are independent: either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAdvisory {
    /// Warning text; empty or null means the system is considered low risk
    #[serde(default, deserialize_with = "present_or_null")]
    pub advice: Option<Option<String>>,
    /// Present (even as null) when the server has traffic totals
    #[serde(default, deserialize_with = "present_or_null")]
    pub total_visits: Option<Option<u64>>,
    #[serde(default)]
    pub period_hours: Option<u64>,
    #[serde(default)]
    pub destroyed: Option<u64>,
    #[serde(default)]
    pub arrived: Option<u64>,
}

/// Keep an explicit `null` distinct from a missing key.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl LocationAdvisory {
    /// Warning text, if the server flagged the system
    ///
    /// `None` when the key is missing entirely; `Some("")` when the server
    /// sent an empty or null advice (the low-risk case).
    pub fn advice(&self) -> Option<&str> {
        self.advice
            .as_ref()
            .map(|advice| advice.as_deref().unwrap_or(""))
    }

    /// Whether the response carries traffic totals
    pub fn has_traffic(&self) -> bool {
        self.total_visits.is_some()
    }
}
