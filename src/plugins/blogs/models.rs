use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title, body, and author are required";

/// A comment embedded in a blog. Every field is caller-supplied and stored as given.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Comment {
    #[serde(default)]
    pub cid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub edited: bool,
    #[serde(default, rename = "likedBy")]
    pub liked_by: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BlogDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

/// Body of `POST /api/blogs`. Fields are optional here so that absence is reported as a
/// validation error instead of a body rejection.
#[derive(Deserialize, Debug, Default)]
pub struct BlogCreate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

/// A blog that passed validation and has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    pub title: String,
    pub body: String,
    pub author: String,
}

impl BlogCreate {
    pub fn validate(self) -> Result<NewBlog, &'static str> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }
        match (present(self.title), present(self.body), present(self.author)) {
            (Some(title), Some(body), Some(author)) => Ok(NewBlog { title, body, author }),
            _ => Err(REQUIRED_FIELDS_MESSAGE),
        }
    }
}

impl NewBlog {
    /// Assigns identity and defaults: fresh ObjectId, no comments, creation time as `date`.
    pub fn into_blog(self) -> BlogDto {
        let now = Utc::now();
        // stored timestamps have millisecond precision
        let date = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        BlogDto {
            id: ObjectId::new().to_hex(),
            title: self.title,
            body: self.body,
            author: self.author,
            comments: Vec::new(),
            date,
        }
    }
}

/// Body of `PATCH /api/blogs/:id`. A field that is absent (or null) leaves the stored value alone.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct BlogPatch {
    pub comments: Option<Vec<Comment>>,
    pub body: Option<String>,
}

impl BlogPatch {
    pub fn is_empty(&self) -> bool {
        self.comments.is_none() && self.body.is_none()
    }

    pub fn apply(self, blog: &mut BlogDto) {
        if let Some(comments) = self.comments {
            blog.comments = comments;
        }
        if let Some(body) = self.body {
            blog.body = body;
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BlogMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<BlogDto>,
}
