//! Station feed: the latest reading for a monitoring station

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::AqiClient;
use crate::context::Context;
use crate::error::Result;

/// Route prefix for station feeds, relative to the base URL
const FEED_ROUTE: &str = "feed/";

/// An air quality measurement for a single station
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Overall air quality index
    pub aqi: i64,
}

impl From<&FeedResponse> for Measurement {
    fn from(feed: &FeedResponse) -> Self {
        Self { aqi: feed.data.aqi }
    }
}

// =============================================================================
// Feed Envelope
// =============================================================================

/// Full response body of the station feed endpoint
///
/// Only `status` and `data.aqi` are guaranteed; everything else is filled in
/// when the service provides it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedResponse {
    pub status: String,
    pub data: FeedData,
}

impl FeedResponse {
    /// Whether the service reported success
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Station data within a feed response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedData {
    pub aqi: i64,
    /// Station index assigned by the service
    #[serde(default)]
    pub idx: i64,
    #[serde(default)]
    pub attributions: Vec<Attribution>,
    #[serde(default)]
    pub city: City,
    /// Pollutant driving the overall index, e.g. `pm25`
    #[serde(default, rename = "dominentpol")]
    pub dominant_pollutant: String,
    /// Individual index per pollutant or weather measure, keyed by name
    #[serde(default)]
    pub iaqi: BTreeMap<String, Reading>,
    #[serde(default)]
    pub time: ObservationTime,
    #[serde(default)]
    pub debug: DebugInfo,
}

impl FeedData {
    /// Individual index for one pollutant, e.g. `"pm10"`
    pub fn pollutant(&self, name: &str) -> Option<f64> {
        self.iaqi.get(name).map(|r| r.v)
    }
}

/// Data source credited for a reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
}

/// Monitoring station location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Latitude and longitude
    #[serde(default)]
    pub geo: Vec<f64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A single measured value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub v: f64,
}

/// When the reading was taken
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationTime {
    /// Local time at the station
    #[serde(default)]
    pub s: String,
    /// Station UTC offset
    #[serde(default)]
    pub tz: String,
    /// Unix timestamp
    #[serde(default)]
    pub v: i64,
}

/// Server-side bookkeeping attached to a feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default)]
    pub sync: Option<DateTime<FixedOffset>>,
}

// =============================================================================
// Feed Operations
// =============================================================================

impl AqiClient {
    /// Fetch the full feed envelope for a station
    ///
    /// `station` is used verbatim as part of the path, so slash-separated
    /// identifiers like `"beijing/daxing"` are allowed.
    #[instrument(skip(self, ctx))]
    pub async fn feed(&self, ctx: &Context, station: &str) -> Result<FeedResponse> {
        let path = format!("{}{}/", FEED_ROUTE, station);
        let request = self.build_request(Method::GET, &path, None::<&()>)?;

        let mut feed = FeedResponse::default();
        self.dispatch(ctx, request, Some(&mut feed)).await?;
        Ok(feed)
    }

    /// Fetch the latest reading for a station
    #[instrument(skip(self, ctx))]
    pub async fn latest(&self, ctx: &Context, station: &str) -> Result<Measurement> {
        let feed = self.feed(ctx, station).await?;
        Ok(Measurement::from(&feed))
    }
}
