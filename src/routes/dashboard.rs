use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{ProductEditForm, ProductForm, ProductId, TimeRange};
use crate::routes::require_dashboard;
use crate::services::product_store::{Origin, ProductStore};
use crate::state::AppState;
use crate::views::{render_price_chart, render_product_list, render_stats_cards, render_welcome};

pub const DEMO_DATA_NOTICE: &str =
    "Could not reach the price tracker API, showing demonstration data.";
pub const SAVED_LOCALLY: &str = "(API unavailable, saved locally)";

fn status_line(done: &str, origin: Origin) -> String {
    match origin {
        Origin::Remote => format!("Product {}.", done),
        Origin::Fallback => format!("Product {}. {}", done, SAVED_LOCALLY),
    }
}

/// Guard the screen and load the product list behind it.
async fn open(state: &AppState) -> Result<(ProductStore, Origin), AppError> {
    require_dashboard(&state.auth_service())?;

    let mut store = state.product_store();
    let origin = store.load().await.map_err(|e| {
        error!("Failed to load products: {}", e);
        e
    })?;
    Ok((store, origin))
}

fn render_board(state: &AppState, store: &ProductStore, origin: Origin) -> String {
    let mut out = vec![render_welcome(state.session.state().user())];
    if origin == Origin::Fallback {
        out.push(DEMO_DATA_NOTICE.to_string());
    }
    out.push(render_stats_cards(&store.stats()));
    out.push(render_product_list(
        store.products(),
        store.selected().map(|p| p.id),
    ));
    out.join("\n")
}

async fn render_history(
    state: &AppState,
    store: &mut ProductStore,
    id: ProductId,
    range: TimeRange,
) -> Result<String, AppError> {
    let product = store.select(id)?.clone();
    let view = state
        .price_history_service()
        .load(&product, range)
        .await
        .map_err(|e| {
            error!("Failed to load price history for product {}: {}", id, e);
            e
        })?;
    Ok(render_price_chart(&product, range, &view))
}

/// Stats cards and product list, plus the chart of `selected` when given.
pub async fn show(
    state: &AppState,
    selected: Option<ProductId>,
    range: TimeRange,
) -> Result<String, AppError> {
    info!("dashboard - Showing dashboard");
    let (mut store, origin) = open(state).await?;

    let chart = match selected {
        Some(id) => Some(render_history(state, &mut store, id, range).await?),
        None => None,
    };

    let mut out = render_board(state, &store, origin);
    if let Some(chart) = chart {
        out.push('\n');
        out.push_str(&chart);
    }
    Ok(out)
}

pub async fn add(state: &AppState, form: ProductForm) -> Result<String, AppError> {
    info!("add - Adding product {}", form.url);
    let request = form.validate()?;
    let (mut store, origin) = open(state).await?;

    let mutation = store.add(request).await.map_err(|e| {
        error!("Failed to add product: {}", e);
        e
    })?;
    if mutation.origin == Origin::Fallback {
        warn!("Product {} only exists locally", mutation.product.id);
    }

    Ok(format!(
        "{}\n{}",
        status_line("added", mutation.origin),
        render_board(state, &store, origin)
    ))
}

pub async fn edit(
    state: &AppState,
    id: ProductId,
    form: ProductEditForm,
) -> Result<String, AppError> {
    info!("edit - Updating product {}", id);
    let (mut store, origin) = open(state).await?;

    let existing = store.get(id).ok_or(AppError::NotFound(id))?;
    let request = form.validate_against(existing)?;
    let mutation = store.update(id, request).await.map_err(|e| {
        error!("Failed to update product {}: {}", id, e);
        e
    })?;

    Ok(format!(
        "{}\n{}",
        status_line("updated", mutation.origin),
        render_board(state, &store, origin)
    ))
}

pub async fn remove(state: &AppState, id: ProductId) -> Result<String, AppError> {
    info!("remove - Deleting product {}", id);
    let (mut store, origin) = open(state).await?;

    if store.get(id).is_none() {
        return Err(AppError::NotFound(id));
    }
    let removed = store.remove(id).await.map_err(|e| {
        error!("Failed to delete product {}: {}", id, e);
        e
    })?;

    Ok(format!(
        "{}\n{}",
        status_line("removed", removed),
        render_board(state, &store, origin)
    ))
}

pub async fn history(
    state: &AppState,
    id: ProductId,
    range: TimeRange,
) -> Result<String, AppError> {
    info!("history - Price history for product {} over {}", id, range);
    let (mut store, _) = open(state).await?;
    render_history(state, &mut store, id, range).await
}
