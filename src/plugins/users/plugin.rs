use axum::{Router, routing::{post, get}, Extension};
use crate::kernel::Plugin;
use crate::plugins::users::handlers::{create_user, get_user};
use crate::plugins::users::repo::DynUserRepo;

pub struct UsersPlugin {
    pub repo: DynUserRepo,
}

impl UsersPlugin {
    pub fn new(repo: DynUserRepo) -> Self {
        Self { repo }
    }
}

#[async_trait::async_trait]
impl Plugin for UsersPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_user))
            .route("/:user_id", get(get_user))
            .layer(Extension(self.repo.clone()))
    }

    fn name(&self) -> &'static str {
        "api/users"
    }
}
