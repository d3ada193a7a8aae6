use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::db::RepoError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Blog ids. Stored as given, never maintained by the blog routes.
    #[serde(default)]
    pub user_blogs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_picture: Option<String>,
}

/// Body of `POST /api/users`. Nothing is checked by the route itself.
#[derive(Deserialize, Debug, Default)]
pub struct CreateUser {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub user_picture: Option<String>,
}

impl CreateUser {
    /// Builds the stored user. `user_id` is required by the collection schema, so a missing
    /// one is a store failure rather than a validation error.
    pub fn into_user(self) -> Result<UserDto, RepoError> {
        let user_id = self
            .user_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RepoError::Schema("user_id is required".to_string()))?;

        Ok(UserDto {
            id: ObjectId::new().to_hex(),
            user_id,
            username: self.username,
            user_blogs: Vec::new(),
            user_picture: self.user_picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_blogs_start_empty() {
        let user = CreateUser { user_id: Some("auth0|1".into()), username: Some("u".into()), user_picture: None }
            .into_user()
            .unwrap();
        assert!(user.user_blogs.is_empty());
        assert_eq!(user.user_id, "auth0|1");
    }

    #[test]
    fn missing_user_id_violates_schema() {
        let err = CreateUser::default().into_user().unwrap_err();
        assert!(matches!(err, RepoError::Schema(_)));
    }

    #[test]
    fn other_fields_are_optional() {
        let user = CreateUser { user_id: Some("x".into()), ..Default::default() }.into_user().unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("username").is_none());
        assert_eq!(json["user_blogs"], serde_json::json!([]));
    }
}
