use axum::Router;
use blogs_api_kernel::config::Config;
use blogs_api_kernel::db;
use blogs_api_kernel::kernel::{build_app, Plugin};
use blogs_api_kernel::plugins::blogs::{BlogsPlugin, MongoBlogRepo};
use blogs_api_kernel::plugins::metrics::MetricsPlugin;
use blogs_api_kernel::plugins::users::{MongoUserRepo, UsersPlugin};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // one connection for the lifetime of the process, shared by every plugin
    let db = db::init_db(&config.db_url, config.db_name.as_deref()).await?;

    let blogs_plugin = BlogsPlugin::new(MongoBlogRepo::new(&db).into_arc());
    let users_plugin = UsersPlugin::new(MongoUserRepo::new(&db).into_arc());
    let metrics_plugin = MetricsPlugin::new()?;
    let plugins_vec: Vec<Box<dyn Plugin>> = vec![
        Box::new(blogs_plugin),
        Box::new(users_plugin),
    ];

    let plugin_names: Vec<&'static str> = plugins_vec.iter().map(|p| p.name()).collect();
    tracing::info!("mounting plugins: {:?}", plugin_names);

    let mut app: Router = build_app(&plugins_vec, Some(metrics_plugin.clone())).await;

    // expose metrics at /metrics (not instrumented to avoid double-counting)
    app = app.nest("/metrics", metrics_plugin.router());

    let addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
            for p in plugins_vec.iter() {
                p.on_shutdown().await;
            }
        })
        .await?;

    Ok(())
}
