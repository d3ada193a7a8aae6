use axum::{Router, routing::get, Extension};
use crate::kernel::Plugin;
use crate::plugins::blogs::handlers::*;
use crate::plugins::blogs::repo::DynBlogRepo;

pub struct BlogsPlugin { pub repo: DynBlogRepo }

impl BlogsPlugin {
    pub fn new(repo: DynBlogRepo) -> Self { Self { repo } }
}

#[async_trait::async_trait]
impl Plugin for BlogsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", get(list_blogs).post(create_blog))
            .route("/:id", get(get_blog).patch(update_blog).delete(delete_blog))
            .layer(Extension(self.repo.clone()))
    }

    fn name(&self) -> &'static str { "api/blogs" }
}
