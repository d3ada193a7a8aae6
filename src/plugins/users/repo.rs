use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{parse_object_id, Db, RepoError, USERS_COLLECTION};
use crate::plugins::users::models::{CreateUser, UserDto};

pub const ENTITY: &str = "User";

#[async_trait]
pub trait UserRepo: Send + Sync + 'static {
    /// Looks a user up by the external `user_id`, not the store identifier.
    async fn get_user(&self, user_id: &str) -> Result<UserDto, RepoError>;
    async fn insert_user(&self, user: CreateUser) -> Result<UserDto, RepoError>;
}

pub type DynUserRepo = Arc<dyn UserRepo>;

mod mongo {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    pub struct UserDocument {
        #[serde(rename = "_id")]
        id: ObjectId,
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(default)]
        user_blogs: Vec<ObjectId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_picture: Option<String>,
    }

    impl From<UserDocument> for UserDto {
        fn from(d: UserDocument) -> Self {
            Self {
                id: d.id.to_hex(),
                user_id: d.user_id,
                username: d.username,
                user_blogs: d.user_blogs.into_iter().map(|id| id.to_hex()).collect(),
                user_picture: d.user_picture,
            }
        }
    }

    impl UserDocument {
        fn from_dto(u: UserDto) -> Result<Self, RepoError> {
            let user_blogs = u
                .user_blogs
                .iter()
                .map(|id| parse_object_id(id, "Blog"))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self {
                id: parse_object_id(&u.id, ENTITY)?,
                user_id: u.user_id,
                username: u.username,
                user_blogs,
                user_picture: u.user_picture,
            })
        }
    }

    pub struct MongoUserRepo {
        coll: Collection<UserDocument>,
    }

    impl MongoUserRepo {
        pub fn new(db: &Db) -> Self {
            Self { coll: db.collection(USERS_COLLECTION) }
        }

        pub fn into_arc(self) -> DynUserRepo {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl UserRepo for MongoUserRepo {
        async fn get_user(&self, user_id: &str) -> Result<UserDto, RepoError> {
            self.coll
                .find_one(doc! { "user_id": user_id })
                .await?
                .map(UserDto::from)
                .ok_or(RepoError::not_found(ENTITY))
        }

        // duplicates are caught by the unique index on `user_id`
        async fn insert_user(&self, user: CreateUser) -> Result<UserDto, RepoError> {
            let user = user.into_user()?;
            let document = UserDocument::from_dto(user.clone())?;
            self.coll.insert_one(&document).await?;
            Ok(user)
        }
    }
}

pub use mongo::MongoUserRepo;

mod inmem {
    use super::*;

    /// Users keyed by `user_id`, mirroring the unique index of the real collection.
    #[derive(Default)]
    pub struct InMemoryUserRepo {
        users: RwLock<HashMap<String, UserDto>>,
    }

    impl InMemoryUserRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn into_arc(self) -> DynUserRepo {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl UserRepo for InMemoryUserRepo {
        async fn get_user(&self, user_id: &str) -> Result<UserDto, RepoError> {
            self.users
                .read()
                .get(user_id)
                .cloned()
                .ok_or(RepoError::not_found(ENTITY))
        }

        async fn insert_user(&self, user: CreateUser) -> Result<UserDto, RepoError> {
            let user = user.into_user()?;
            let mut users = self.users.write();
            if users.contains_key(&user.user_id) {
                return Err(RepoError::DuplicateKey(format!("user_id {:?} already exists", user.user_id)));
            }
            users.insert(user.user_id.clone(), user.clone());
            Ok(user)
        }
    }
}

pub use inmem::InMemoryUserRepo;
