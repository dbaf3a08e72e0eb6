use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// A single observed (or synthesized) price for a product on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Where a price series came from. Synthetic series are placeholders and must
/// never be presented as observed prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistorySource {
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "synthetic")]
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
    pub source: HistorySource,
}

impl PriceSeries {
    pub fn is_synthetic(&self) -> bool {
        self.source == HistorySource::Synthetic
    }

    /// Absolute and percentage change between the first and last point.
    pub fn change(&self) -> Option<PriceChange> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if self.points.len() < 2 {
            return None;
        }

        let absolute = last.price - first.price;
        let percent = if first.price != 0.0 {
            absolute / first.price * 100.0
        } else {
            0.0
        };

        Some(PriceChange { absolute, percent })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub absolute: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Week => write!(f, "7d"),
            TimeRange::Month => write!(f, "30d"),
            TimeRange::Quarter => write!(f, "90d"),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" | "7" => Ok(TimeRange::Week),
            "30d" | "30" => Ok(TimeRange::Month),
            "90d" | "90" => Ok(TimeRange::Quarter),
            _ => Err(format!("Invalid time range: {} (expected 7d, 30d or 90d)", s)),
        }
    }
}
