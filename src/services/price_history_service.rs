use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::external::tracker_api::{ApiError, ProductApi};
use crate::models::{HistorySource, PricePoint, PriceSeries, Product, TimeRange};
use crate::services::product_store::FallbackPolicy;

const START_MARKUP: f64 = 1.1;
const JITTER_MIN: f64 = 0.98;
const JITTER_MAX: f64 = 1.02;

/// Placeholder history for a product without real data: one point per day
/// over `range`, drifting down from `current_price * 1.1` to exactly
/// `current_price` on `end_date`. Not a price model.
pub fn generate_fallback_history<R: Rng>(
    current_price: f64,
    range: TimeRange,
    end_date: NaiveDate,
    rng: &mut R,
) -> PriceSeries {
    let days = range.days();
    let start_price = current_price * START_MARKUP;

    let points = (0..=days)
        .map(|i| {
            let date = end_date - Duration::days(i64::from(days - i));
            let price = if i == 0 {
                start_price
            } else if i == days {
                current_price
            } else {
                let progress = f64::from(i) / f64::from(days);
                let base = start_price + (current_price - start_price) * progress;
                round_cents(base * rng.random_range(JITTER_MIN..=JITTER_MAX))
            };
            PricePoint { date, price }
        })
        .collect();

    PriceSeries {
        points,
        source: HistorySource::Synthetic,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A chart-ready series plus the reason real data could not be shown, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub series: PriceSeries,
    pub error: Option<String>,
}

/// Loads the price chart of the selected product.
///
/// Starting a load cancels the previous one, so a slow response for an old
/// selection can never replace the chart of a newer one.
pub struct PriceHistoryService {
    api: Arc<dyn ProductApi>,
    policy: FallbackPolicy,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl PriceHistoryService {
    pub fn new(api: Arc<dyn ProductApi>, policy: FallbackPolicy) -> Self {
        Self {
            api,
            policy,
            in_flight: Mutex::new(None),
        }
    }

    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.in_flight.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel whatever load is running, e.g. when the selection is cleared.
    pub fn cancel(&self) {
        if let Some(token) = self.in_flight.lock().take() {
            token.cancel();
        }
    }

    pub async fn load(&self, product: &Product, range: TimeRange) -> Result<HistoryView, AppError> {
        let token = self.begin();

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(AppError::Cancelled),
            result = self.api.get_price_history(product.id) => result,
        };

        if token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        match result {
            Ok(mut points) if !points.is_empty() => {
                points.sort_by_key(|p| p.date);
                let keep = range.days() as usize + 1;
                if points.len() > keep {
                    points.drain(..points.len() - keep);
                }
                debug!("Loaded {} history points for product {}", points.len(), product.id);
                Ok(HistoryView {
                    series: PriceSeries {
                        points,
                        source: HistorySource::Api,
                    },
                    error: None,
                })
            }
            Ok(_) if !self.policy.is_enabled() => Ok(HistoryView {
                series: PriceSeries {
                    points: Vec::new(),
                    source: HistorySource::Api,
                },
                error: None,
            }),
            Ok(_) => Ok(self.synthetic(product, range, "No price history recorded yet".to_string())),
            // The session is already gone; nothing may be drawn for it
            Err(e @ ApiError::Unauthorized) => Err(e.into()),
            Err(e) if self.policy.is_enabled() => {
                warn!("Price history for product {} unavailable: {}", product.id, e);
                Ok(self.synthetic(product, range, format!("Price history unavailable: {}", e)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn synthetic(&self, product: &Product, range: TimeRange, error: String) -> HistoryView {
        let today = Utc::now().date_naive();
        HistoryView {
            series: generate_fallback_history(product.current_price, range, today, &mut rand::rng()),
            error: Some(error),
        }
    }
}
