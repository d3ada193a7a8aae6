use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use thiserror::Error;

pub type Db = Database;

pub const DEFAULT_DB_NAME: &str = "blogs";
pub const BLOGS_COLLECTION: &str = "blogs";
pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Connects to the document store and prepares the collections.
///
/// The database is `name` when given, else the one named in the connection string,
/// else [`DEFAULT_DB_NAME`].
pub async fn init_db(database_url: &str, name: Option<&str>) -> anyhow::Result<Db> {
    let client = Client::with_uri_str(database_url).await?;
    let db = match name {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DB_NAME)),
    };

    ensure_indexes(&db).await?;
    tracing::info!("connected to database {}", db.name());

    Ok(db)
}

/// `user_id` is the external key of a user and must be unique across the collection.
pub async fn ensure_indexes(db: &Db) -> Result<(), RepoError> {
    let index = IndexModel::builder()
        .keys(doc! { "user_id": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<Document>(USERS_COLLECTION).create_index(index).await?;
    Ok(())
}

/// Failures of the repository layer, independent of the backend.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("schema violation: {0}")]
    Schema(String),

    #[error("mongodb error: {0}")]
    Mongo(mongodb::error::Error),

    #[error("bson serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),
}

impl RepoError {
    pub fn not_found(entity: &'static str) -> Self {
        RepoError::NotFound { entity }
    }
}

impl From<mongodb::error::Error> for RepoError {
    fn from(e: mongodb::error::Error) -> Self {
        if is_duplicate_key(&e) {
            return RepoError::DuplicateKey(e.to_string());
        }
        RepoError::Mongo(e)
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE
    )
}

/// Parses a path identifier. A malformed id cannot name any stored document,
/// so it is reported as not found for `entity`.
pub fn parse_object_id(id: &str, entity: &'static str) -> Result<ObjectId, RepoError> {
    ObjectId::parse_str(id).map_err(|_| {
        tracing::debug!("rejecting malformed {} id {:?}", entity, id);
        RepoError::not_found(entity)
    })
}
