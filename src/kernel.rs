use axum::Router;
use async_trait::async_trait;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::plugins::metrics::MetricsPlugin;


#[async_trait]
pub trait Plugin: Send + Sync {
    
    async fn router(&self) -> Router;
    
    fn name(&self) -> &'static str;
    /// Optional lifecycle hook called when the kernel starts.
    async fn on_start(&self) {}
    /// Optional lifecycle hook called on shutdown.
    async fn on_shutdown(&self) {}
}

/// Builds the application router by mounting each plugin under `/{plugin.name()}`.
///
/// When `metrics` is given, every plugin router is instrumented with the plugin name as label.
/// The `/metrics` endpoint itself is not mounted here.
pub async fn build_app(plugins: &[Box<dyn Plugin>], metrics: Option<MetricsPlugin>) -> Router {
    let mut app = Router::new();

    for plugin in plugins.iter() {
        info!("starting plugin {}", plugin.name());
        plugin.on_start().await;
        let mut router = plugin.router().await;
        if let Some(m) = metrics.as_ref() {
            router = m.instrument(router, plugin.name());
        }
        // mount plugin under its name to namespace routes
        app = app.nest(&format!("/{}", plugin.name()), router);
    }

    app.layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http())
}
