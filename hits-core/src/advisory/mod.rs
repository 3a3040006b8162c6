//! HITS advisory service
//!
//! Two requests against a HITS server (`host:port`, plain HTTP):
//!
//! - `POST /hits/v1/reportCrime` submits a [`CrimeReport`]
//! - `GET /hits/v1/location/{system}?hours=N` fetches a [`LocationAdvisory`]
//!
//! Both carry a `User-Agent: EDMC-HITS-{version}` header. Neither retries;
//! callers decide what a failure means for the user.

mod client;
mod types;

pub use client::AdvisoryClient;
pub use types::{CrimeReport, LocationAdvisory, Offence};
