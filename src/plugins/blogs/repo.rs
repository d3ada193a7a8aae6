use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::{parse_object_id, Db, RepoError, BLOGS_COLLECTION};
use crate::plugins::blogs::models::{BlogDto, BlogPatch, Comment, NewBlog};

pub const ENTITY: &str = "Blog";

/// Store operations behind the blog routes. Each call is a single store operation.
#[async_trait]
pub trait BlogRepo: Send + Sync + 'static {
    async fn list_blogs(&self) -> Result<Vec<BlogDto>, RepoError>;
    async fn get_blog(&self, id: &str) -> Result<BlogDto, RepoError>;
    async fn insert_blog(&self, blog: NewBlog) -> Result<BlogDto, RepoError>;
    async fn update_blog(&self, id: &str, patch: BlogPatch) -> Result<BlogDto, RepoError>;
    async fn delete_blog(&self, id: &str) -> Result<BlogDto, RepoError>;
}

pub type DynBlogRepo = Arc<dyn BlogRepo>;

mod mongo {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    pub struct CommentDocument {
        #[serde(default)]
        cid: String,
        #[serde(default)]
        username: String,
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<bson::DateTime>,
        #[serde(default)]
        likes: i64,
        #[serde(default)]
        edited: bool,
        #[serde(default, rename = "likedBy")]
        liked_by: Vec<String>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct BlogDocument {
        #[serde(rename = "_id")]
        id: ObjectId,
        #[serde(default)]
        title: String,
        #[serde(default)]
        body: String,
        #[serde(default)]
        author: String,
        #[serde(default)]
        comments: Vec<CommentDocument>,
        date: bson::DateTime,
    }

    fn to_chrono(d: bson::DateTime) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(d.timestamp_millis()).unwrap_or_default()
    }

    fn from_chrono(d: DateTime<Utc>) -> bson::DateTime {
        bson::DateTime::from_millis(d.timestamp_millis())
    }

    impl From<Comment> for CommentDocument {
        fn from(c: Comment) -> Self {
            Self {
                cid: c.cid,
                username: c.username,
                text: c.text,
                date: c.date.map(from_chrono),
                likes: c.likes,
                edited: c.edited,
                liked_by: c.liked_by,
            }
        }
    }

    impl From<CommentDocument> for Comment {
        fn from(c: CommentDocument) -> Self {
            Self {
                cid: c.cid,
                username: c.username,
                text: c.text,
                date: c.date.map(to_chrono),
                likes: c.likes,
                edited: c.edited,
                liked_by: c.liked_by,
            }
        }
    }

    impl From<BlogDocument> for BlogDto {
        fn from(d: BlogDocument) -> Self {
            Self {
                id: d.id.to_hex(),
                title: d.title,
                body: d.body,
                author: d.author,
                comments: d.comments.into_iter().map(Comment::from).collect(),
                date: to_chrono(d.date),
            }
        }
    }

    impl BlogDocument {
        fn from_dto(b: BlogDto) -> Result<Self, RepoError> {
            Ok(Self {
                id: parse_object_id(&b.id, ENTITY)?,
                title: b.title,
                body: b.body,
                author: b.author,
                comments: b.comments.into_iter().map(CommentDocument::from).collect(),
                date: from_chrono(b.date),
            })
        }
    }

    pub struct MongoBlogRepo {
        coll: Collection<BlogDocument>,
    }

    impl MongoBlogRepo {
        pub fn new(db: &Db) -> Self {
            Self { coll: db.collection(BLOGS_COLLECTION) }
        }

        pub fn into_arc(self) -> DynBlogRepo {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl BlogRepo for MongoBlogRepo {
        async fn list_blogs(&self) -> Result<Vec<BlogDto>, RepoError> {
            let docs: Vec<BlogDocument> = self.coll.find(doc! {}).await?.try_collect().await?;
            Ok(docs.into_iter().map(BlogDto::from).collect())
        }

        async fn get_blog(&self, id: &str) -> Result<BlogDto, RepoError> {
            let oid = parse_object_id(id, ENTITY)?;
            self.coll
                .find_one(doc! { "_id": oid })
                .await?
                .map(BlogDto::from)
                .ok_or(RepoError::not_found(ENTITY))
        }

        async fn insert_blog(&self, blog: NewBlog) -> Result<BlogDto, RepoError> {
            let blog = blog.into_blog();
            let document = BlogDocument::from_dto(blog.clone())?;
            self.coll.insert_one(&document).await?;
            Ok(blog)
        }

        async fn update_blog(&self, id: &str, patch: BlogPatch) -> Result<BlogDto, RepoError> {
            let oid = parse_object_id(id, ENTITY)?;
            // `$set: {}` is rejected by the server
            if patch.is_empty() {
                return self.get_blog(id).await;
            }

            let mut set = Document::new();
            if let Some(comments) = patch.comments {
                let comments: Vec<CommentDocument> = comments.into_iter().map(CommentDocument::from).collect();
                set.insert("comments", bson::to_bson(&comments)?);
            }
            if let Some(body) = patch.body {
                set.insert("body", body);
            }

            self.coll
                .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
                .return_document(ReturnDocument::After)
                .await?
                .map(BlogDto::from)
                .ok_or(RepoError::not_found(ENTITY))
        }

        async fn delete_blog(&self, id: &str) -> Result<BlogDto, RepoError> {
            let oid = parse_object_id(id, ENTITY)?;
            self.coll
                .find_one_and_delete(doc! { "_id": oid })
                .await?
                .map(BlogDto::from)
                .ok_or(RepoError::not_found(ENTITY))
        }
    }
}

pub use mongo::MongoBlogRepo;

mod inmem {
    use super::*;

    /// Keeps blogs in insertion order, which is what listing returns.
    #[derive(Default)]
    pub struct InMemoryBlogRepo {
        blogs: RwLock<Vec<BlogDto>>,
    }

    impl InMemoryBlogRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn into_arc(self) -> DynBlogRepo {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl BlogRepo for InMemoryBlogRepo {
        async fn list_blogs(&self) -> Result<Vec<BlogDto>, RepoError> {
            Ok(self.blogs.read().clone())
        }

        async fn get_blog(&self, id: &str) -> Result<BlogDto, RepoError> {
            parse_object_id(id, ENTITY)?;
            self.blogs
                .read()
                .iter()
                .find(|b| b.id == id)
                .cloned()
                .ok_or(RepoError::not_found(ENTITY))
        }

        async fn insert_blog(&self, blog: NewBlog) -> Result<BlogDto, RepoError> {
            let blog = blog.into_blog();
            self.blogs.write().push(blog.clone());
            Ok(blog)
        }

        async fn update_blog(&self, id: &str, patch: BlogPatch) -> Result<BlogDto, RepoError> {
            parse_object_id(id, ENTITY)?;
            let mut blogs = self.blogs.write();
            let blog = blogs
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or(RepoError::not_found(ENTITY))?;
            patch.apply(blog);
            Ok(blog.clone())
        }

        async fn delete_blog(&self, id: &str) -> Result<BlogDto, RepoError> {
            parse_object_id(id, ENTITY)?;
            let mut blogs = self.blogs.write();
            let idx = blogs
                .iter()
                .position(|b| b.id == id)
                .ok_or(RepoError::not_found(ENTITY))?;
            Ok(blogs.remove(idx))
        }
    }
}

pub use inmem::InMemoryBlogRepo;
