use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use axum::http::StatusCode;
use prometheus::{Encoder, TextEncoder, IntCounterVec, Opts, Registry, HistogramVec, HistogramOpts};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct MetricsPlugin {
    registry: Arc<Registry>,
    pub request_counter: Arc<IntCounterVec>,
    pub request_duration: Arc<HistogramVec>,
}

#[derive(Clone)]
struct RouteMetrics {
    metrics: MetricsPlugin,
    plugin: &'static str,
}

impl MetricsPlugin {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let ctr_opts = Opts::new("requests_total", "Total HTTP requests");
        let counter = IntCounterVec::new(ctr_opts, &["method", "plugin", "status"])?;
        registry.register(Box::new(counter.clone()))?;

        let hist_opts = HistogramOpts::new("request_duration_seconds", "HTTP request latencies in seconds");
        let histogram = HistogramVec::new(hist_opts, &["method", "plugin"])?;
        registry.register(Box::new(histogram.clone()))?;

        #[cfg(target_os = "linux")]
        {
            let collector = prometheus::process_collector::ProcessCollector::for_self();
            registry.register(Box::new(collector)).ok();
        }

        Ok(MetricsPlugin {
            registry: Arc::new(registry),
            request_counter: Arc::new(counter),
            request_duration: Arc::new(histogram),
        })
    }

    /// Wraps a plugin router so each request is counted and timed under the plugin's name.
    pub fn instrument(&self, router: Router, plugin: &'static str) -> Router {
        let state = RouteMetrics { metrics: self.clone(), plugin };
        router.layer(middleware::from_fn_with_state(state, track))
    }

    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn router(&self) -> Router {
        let metrics = self.clone();
        Router::new().route("/", get(move || {
            let body = metrics.render();
            async move {
                match body {
                    Ok(text) => (StatusCode::OK, text).into_response(),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to encode metrics");
                        StatusCode::INTERNAL_SERVER_ERROR.into_response()
                    }
                }
            }
        }))
    }
}

async fn track(State(route): State<RouteMetrics>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let started = Instant::now();
    let resp = next.run(req).await;

    let status = resp.status().as_u16().to_string();
    route.metrics
        .request_counter
        .with_label_values(&[method.as_str(), route.plugin, status.as_str()])
        .inc();
    route.metrics
        .request_duration
        .with_label_values(&[method.as_str(), route.plugin])
        .observe(started.elapsed().as_secs_f64());
    resp
}
