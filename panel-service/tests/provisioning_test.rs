mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use panel_service::models::{Grant, PermissionLevel, User};
use serde_json::json;

#[tokio::test]
async fn test_admin_creates_server() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, server) = app
        .send(
            Method::POST,
            "/servers",
            Some(&admin),
            Some(json!({
                "name": "Living room",
                "type": "jellyfin",
                "url": "http://10.0.0.2:8096",
                "folders": ["Movies", "Shows"],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(server["name"], "Living room");
    assert_eq!(server["type"], "jellyfin");
    assert_eq!(server["no_credential"], false);
    assert_eq!(server["urls"][0]["url"], "http://10.0.0.2:8096");
    assert_eq!(server["folders"].as_array().unwrap().len(), 2);

    let uri = format!("/servers/{}", server["id"].as_str().unwrap());
    let (status, _) = app.send(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_non_admin_cannot_create_server() {
    let app = TestApp::new();
    let owner = app
        .user_with(Grant::new("srv-1", PermissionLevel::Owner))
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/servers",
            Some(&owner),
            Some(json!({ "name": "Mine", "type": "navidrome" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "This action requires administrator permissions.");

    let (_, servers) = app.send(Method::GET, "/servers", Some(&owner), None).await;
    assert!(servers.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_server_rejects_bad_url() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/servers",
            Some(&admin),
            Some(json!({ "name": "Broken", "type": "subsonic", "url": "not a url" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn test_editor_adds_server_url() {
    let app = TestApp::new();
    app.add_server("srv-1").await;
    let editor = app
        .user_with(Grant::new("srv-1", PermissionLevel::Editor))
        .await;
    let viewer = app.viewer_of("srv-1").await;
    let body = json!({ "url": "https://music.example.com" });

    let (status, denied) = app
        .send(Method::POST, "/servers/srv-1/urls", Some(&viewer), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        denied["error"]["message"],
        "This action requires \"Editor\" server permissions."
    );

    let (status, server) = app
        .send(Method::POST, "/servers/srv-1/urls", Some(&editor), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let urls = server["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[1]["url"], "https://music.example.com");
    assert_eq!(urls[1]["enabled"], true);
}

#[tokio::test]
async fn test_provisioned_user_reaches_granted_server_only() {
    let app = TestApp::new();
    app.add_server("srv-1").await;
    app.add_server("srv-2").await;
    let admin = app.admin().await;

    let (status, user) = app
        .send(
            Method::POST,
            "/users",
            Some(&admin),
            Some(json!({ "username": "dana", "display_name": "Dana" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["is_admin"], false);
    let user_id = user["id"].as_str().unwrap();

    let (status, detail) = app
        .send(
            Method::PUT,
            &format!("/users/{}/permissions", user_id),
            Some(&admin),
            Some(json!({
                "server_permissions": [{ "resource_id": "srv-1", "level": "editor" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["server_permissions"][0]["resource_id"], "srv-1");
    assert_eq!(detail["server_permissions"][0]["level"], "editor");

    let (status, issued) = app
        .send(
            Method::POST,
            &format!("/users/{}/tokens", user_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issued["token_type"], "Bearer");
    assert_eq!(issued["expires_in"], 15 * 60);
    let token = issued["access_token"].as_str().unwrap();

    let (status, _) = app
        .send(
            Method::PATCH,
            "/servers/srv-1",
            Some(token),
            Some(json!({ "name": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::GET, "/servers/srv-2", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_permissions_for_unknown_server_are_rejected() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = User::new("erin".to_string(), None);
    let user_id = user.user_id.clone();
    app.state.users.insert_user(user).await.unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/users/{}/permissions", user_id),
            Some(&admin),
            Some(json!({
                "server_permissions": [{ "resource_id": "srv-404", "level": "viewer" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Server not found");

    let (_, detail) = app
        .send(Method::GET, &format!("/users/{}", user_id), Some(&admin), None)
        .await;
    assert!(detail["server_permissions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_only_super_admin_creates_admins() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let root = app
        .login(User::new("root".to_string(), None).with_super_admin(true))
        .await;
    let body = json!({ "username": "frank", "is_admin": true });

    let (status, _) = app
        .send(Method::POST, "/users", Some(&admin), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, user) = app
        .send(Method::POST, "/users", Some(&root), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["is_admin"], true);
}

#[tokio::test]
async fn test_non_admin_cannot_grant_permissions() {
    let app = TestApp::new();
    app.add_server("srv-1").await;
    let owner = app
        .user_with(Grant::new("srv-1", PermissionLevel::Owner))
        .await;
    let owner_id = app.state.tokens.validate(&owner).unwrap().sub;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/users/{}/permissions", owner_id),
            Some(&owner),
            Some(json!({ "server_permissions": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/users/{}/tokens", owner_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
