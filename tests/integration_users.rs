mod common;
use common::{in_memory_repos, spawn_app};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn users_create_lookup_and_duplicate() -> anyhow::Result<()> {
    let (blogs, users) = in_memory_repos();
    let (base, server_handle) = spawn_app(blogs, users).await?;
    let client = reqwest::Client::new();

    let create = client.post(format!("{}/api/users", base))
        .json(&json!({"user_id":"ext-42","username":"ituser","user_picture":"/img/42.png"}))
        .send()
        .await?;
    assert_eq!(create.status(), StatusCode::CREATED);
    let created: Value = create.json().await?;
    assert_eq!(created["user_blogs"], json!([]));

    // duplicate user_id -> generic server error, no detail leaked
    let dup = client.post(format!("{}/api/users", base))
        .json(&json!({"user_id":"ext-42","username":"someone-else"}))
        .send()
        .await?;
    assert_eq!(dup.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: Value = dup.json().await?;
    assert_eq!(err["error"], "Internal server error");

    let one = client.get(format!("{}/api/users/ext-42", base)).send().await?;
    assert_eq!(one.status(), StatusCode::OK);
    let got: Value = one.json().await?;
    assert_eq!(got, created);

    let missing = client.get(format!("{}/api/users/nobody", base)).send().await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let err: Value = missing.json().await?;
    assert_eq!(err["error"], "User not found");

    server_handle.abort();
    let _ = server_handle.await;
    Ok(())
}
