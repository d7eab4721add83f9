use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::{
    http::StatusCode,
    reply::{Reply, Response},
    Filter, Rejection,
};

use crate::{
    cascade,
    columns::ColumnLabels,
    config::Config,
    error::DataUnavailable,
    fetch::Loader,
    html::DASHBOARD_HTML,
    i18n::{Locale, Theme},
    session::{Session, SessionQuery},
    view,
};

/// Shared, process-wide state behind every route.
pub struct AppState {
    pub loader: Loader,
    pub labels: ColumnLabels,
    pub default_locale: Locale,
    pub default_theme: Theme,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_loader(Loader::new(config)?, config))
    }

    pub fn with_loader(loader: Loader, config: &Config) -> Self {
        Self {
            loader,
            labels: config.columns.clone(),
            default_locale: config.default_locale,
            default_theme: config.default_theme,
        }
    }

    fn session(&self, query: SessionQuery) -> Session {
        Session::from_query(query, self.default_locale, self.default_theme)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "landuse-search"
    })))
}

async fn get_view(query: SessionQuery, state: Arc<AppState>) -> Result<Response, Rejection> {
    let session = state.session(query);
    Ok(view_response(&state, &session).await)
}

async fn refresh(query: SessionQuery, state: Arc<AppState>) -> Result<Response, Rejection> {
    let session = state.session(query);
    state.loader.invalidate().await;
    Ok(view_response(&state, &session).await)
}

async fn export_csv(query: SessionQuery, state: Arc<AppState>) -> Result<Response, Rejection> {
    let session = state.session(query);
    let dataset = match state.loader.load().await {
        Ok(dataset) => dataset,
        Err(e) => return Ok(unavailable(&e, &session)),
    };

    match cascade::run(&dataset.table, &state.labels, &session.filters)
        .and_then(|result| result.table.to_csv())
    {
        Ok(bytes) => {
            info!(bytes = bytes.len(), "exporting filtered table");
            let reply = warp::reply::with_header(bytes, "content-type", "text/csv; charset=utf-8");
            let reply = warp::reply::with_header(
                reply,
                "content-disposition",
                "attachment; filename=\"landuse-search.csv\"",
            );
            Ok(reply.into_response())
        }
        Err(e) => Ok(internal_error("export failed", e)),
    }
}

async fn view_response(state: &AppState, session: &Session) -> Response {
    let dataset = match state.loader.load().await {
        Ok(dataset) => dataset,
        Err(e) => return unavailable(&e, session),
    };
    match view::render(&dataset, session, &state.labels) {
        Ok(v) => warp::reply::json(&v).into_response(),
        Err(e) => render_failed(&e, session),
    }
}

fn render_failed(err: &anyhow::Error, session: &Session) -> Response {
    error!("render failed: {:?}", err);
    warp::reply::with_status(
        warp::reply::json(&view::render_failure(err, session)),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response()
}

fn unavailable(err: &DataUnavailable, session: &Session) -> Response {
    warn!(kind = err.kind(), "data unavailable: {}", err);
    warp::reply::with_status(
        warp::reply::json(&view::render_error(err, session)),
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .into_response()
}

fn internal_error(what: &str, err: anyhow::Error) -> Response {
    error!("{}: {:?}", what, err);
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: what.to_string(),
            details: Some(format!("{:#}", err)),
        }),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response()
}

/// Every HTTP route of the dashboard.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_state = warp::any().map(move || Arc::clone(&state));

    let page = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(DASHBOARD_HTML));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let view = warp::path!("api" / "view")
        .and(warp::get())
        .and(warp::query::<SessionQuery>())
        .and(with_state.clone())
        .and_then(get_view);

    let refresh = warp::path!("api" / "refresh")
        .and(warp::post())
        .and(warp::query::<SessionQuery>())
        .and(with_state.clone())
        .and_then(refresh);

    let export = warp::path!("api" / "export.csv")
        .and(warp::get())
        .and(warp::query::<SessionQuery>())
        .and(with_state)
        .and_then(export_csv);

    page.or(health)
        .or(view)
        .or(refresh)
        .or(export)
        .with(warp::trace::request())
}

/// Warm the cache, then serve until the process is stopped.
pub async fn serve(config: &Config) -> Result<()> {
    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config)?);

    match state.loader.load().await {
        Ok(dataset) => info!(
            url = state.loader.url(),
            rows = dataset.table.num_rows(),
            columns = dataset.table.num_columns(),
            "initial load complete"
        ),
        Err(e) => warn!("initial load failed, will retry on first request: {}", e),
    }

    info!("Server starting on {}", addr);
    info!("Dashboard: http://{}/", addr);
    info!("Health check: http://{}/health", addr);

    warp::serve(routes(state)).run(addr).await;
    Ok(())
}
