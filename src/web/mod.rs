mod assets;

use std::{convert::Infallible, net::SocketAddr, ops::ControlFlow, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_stream::{wrappers::ReceiverStream, Stream};
use tracing::{debug, error, info, warn};

use crate::{
    config::{SimulationConfig, SliderBounds},
    error::SimulationError,
    pipeline::{self, RunObserver},
    population::PopulationSummary,
    report::SimulationReport,
};

pub struct WebServerConfig {
    pub base: SimulationConfig,
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
struct AppState {
    base: SimulationConfig,
    bounds: SliderBounds,
}

/// Control values sent by the page; missing values fall back to the
/// server's base configuration.
#[derive(Debug, Default, Deserialize)]
pub struct RunParams {
    pub max_sample_size: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
struct Defaults {
    slider: SliderBounds,
    seed: u64,
}

#[derive(Serialize)]
struct PointEvent {
    sample_size: usize,
    sample_mean: f64,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        let status = match err {
            SimulationError::Configuration { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SimulationError::Lookup { .. } | SimulationError::Cancelled { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Applies the interactive bounds to the request and merges it over `base`.
pub fn resolve_config(
    base: &SimulationConfig,
    bounds: &SliderBounds,
    params: &RunParams,
) -> Result<SimulationConfig, SimulationError> {
    let max_sample_size = bounds.check(params.max_sample_size.unwrap_or(bounds.default))?;
    let config = base
        .clone()
        .with_max_sample_size(max_sample_size)
        .with_seed(params.seed.unwrap_or(base.seed));
    config.validate()?;
    Ok(config)
}

/// Slider bounds for the dashboard, defaulting to the base configuration's
/// sample size. Fails when that size cannot be selected on the slider.
pub fn dashboard_bounds(base: &SimulationConfig) -> Result<SliderBounds> {
    base.validate().context("Invalid base configuration")?;
    let bounds = SliderBounds::default()
        .with_default(base.max_sample_size)
        .context("Base max_sample_size is not selectable on the dashboard slider")?;
    Ok(bounds)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig { base, host, port } = config;
    let bounds = dashboard_bounds(&base)?;
    let state = Arc::new(AppState { base, bounds });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/defaults", get(defaults))
        .route("/api/simulate", get(simulate))
        .route("/api/stream", get(stream))
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Kangaroo LLN dashboard live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down web UI...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    serve(&assets::STYLES)
}

async fn script() -> impl IntoResponse {
    serve(&assets::APP_JS)
}

fn serve(asset: &'static assets::Asset) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, asset.content_type)], asset.body)
}

async fn defaults(State(state): State<Arc<AppState>>) -> Json<Defaults> {
    Json(Defaults {
        slider: state.bounds,
        seed: state.base.seed,
    })
}

async fn simulate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RunParams>,
) -> Result<Json<SimulationReport>, ApiError> {
    let config = resolve_config(&state.base, &state.bounds, &params).map_err(|err| {
        warn!(%err, "rejected simulation request");
        ApiError::from(err)
    })?;

    let report = tokio::task::spawn_blocking(move || pipeline::run(&config))
        .await
        .map_err(|err| {
            error!(?err, "simulation task failed");
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "simulation task failed".to_string(),
            }
        })??;

    Ok(Json(report))
}

async fn stream(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RunParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let config = resolve_config(&state.base, &state.bounds, &params).map_err(|err| {
        warn!(%err, "rejected stream request");
        ApiError::from(err)
    })?;

    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(256);

    tokio::task::spawn_blocking(move || {
        let mut observer = StreamObserver { tx: tx.clone() };
        let final_event = match pipeline::run_with_observer(&config, &mut observer) {
            Ok(report) => serde_json::to_string(&report)
                .map(|payload| Event::default().event("report").data(payload))
                .unwrap_or_else(|err| Event::default().event("error").data(err.to_string())),
            Err(SimulationError::Cancelled { completed }) => {
                debug!(completed, "stream client went away");
                return;
            }
            Err(err) => {
                error!(%err, "streamed simulation failed");
                Event::default().event("error").data(err.to_string())
            }
        };
        let _ = tx.blocking_send(Ok(final_event));
    });

    Ok(Sse::new(ReceiverStream::new(rx)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    ))
}

/// Forwards run progress as SSE frames and stops the run once the client
/// has disconnected.
struct StreamObserver {
    tx: mpsc::Sender<Result<Event, Infallible>>,
}

impl StreamObserver {
    fn send<T: Serialize>(&self, event: &str, payload: &T) -> ControlFlow<()> {
        let Ok(data) = serde_json::to_string(payload) else {
            return ControlFlow::Continue(());
        };
        match self.tx.blocking_send(Ok(Event::default().event(event).data(data))) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

impl RunObserver for StreamObserver {
    fn population(&mut self, summary: &PopulationSummary) -> ControlFlow<()> {
        self.send("population", summary)
    }

    fn sample(&mut self, sample_size: usize, sample_mean: f64) -> ControlFlow<()> {
        self.send(
            "point",
            &PointEvent {
                sample_size,
                sample_mean,
            },
        )
    }
}
