#![allow(dead_code)]

use tokio::net::TcpListener;
use blogs_api_kernel::db;
use blogs_api_kernel::kernel::{build_app, Plugin};
use blogs_api_kernel::plugins::blogs::{BlogsPlugin, DynBlogRepo, InMemoryBlogRepo, MongoBlogRepo};
use blogs_api_kernel::plugins::users::{DynUserRepo, InMemoryUserRepo, MongoUserRepo, UsersPlugin};

/// Drops the per-test database when the test ends.
pub struct TestDbGuard {
    db: mongodb::Database,
}

impl Drop for TestDbGuard {
    fn drop(&mut self) {
        let db = self.db.clone();
        // best effort: the runtime may already be gone
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = db.drop().await;
            });
        }
    }
}

pub fn in_memory_repos() -> (DynBlogRepo, DynUserRepo) {
    (InMemoryBlogRepo::new().into_arc(), InMemoryUserRepo::new().into_arc())
}

/// Connects to `TEST_DB_URL` with a unique database name, or returns `None` when unset or unreachable.
pub async fn mongo_repos() -> Option<(DynBlogRepo, DynUserRepo, TestDbGuard)> {
    let url = match std::env::var("TEST_DB_URL") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("SKIPPING: TEST_DB_URL not set");
            return None;
        }
    };
    let name = format!("blogs_test_{}", uuid::Uuid::new_v4().simple());
    let db = match db::init_db(&url, Some(&name)).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("SKIPPING: cannot connect to {}: {}", url, e);
            return None;
        }
    };
    let repos = (MongoBlogRepo::new(&db).into_arc(), MongoUserRepo::new(&db).into_arc());
    Some((repos.0, repos.1, TestDbGuard { db }))
}

pub async fn spawn_app(blogs: DynBlogRepo, users: DynUserRepo) -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(BlogsPlugin::new(blogs)), Box::new(UsersPlugin::new(users))];
    let app = build_app(&plugins, None).await;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{}", addr), server_handle))
}
