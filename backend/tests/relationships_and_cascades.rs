//! Likes, follows and attendances, and what disappears with their owners.

// Each suite uses a different subset of the helpers.
#[allow(dead_code)]
mod support;

use actix_web::http::{Method, StatusCode};
use serde_json::json;

use support::{
    PASSWORD, create_photo, fresh_state, get, id_of, init_app, login, register, send,
};

#[actix_web::test]
async fn duplicate_likes_leave_the_count_alone() {
    let app = init_app(fresh_state()).await;
    let ada = register(&app, "ada").await;
    let grace = register(&app, "grace").await;
    let photo = create_photo(&app, &ada, "Harbour").await;
    let like = json!({ "photo": photo });

    let (status, _) = send(&app, Method::POST, "/api/v1/likes", Some(&grace), Some(like.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, error) = send(&app, Method::POST, "/api/v1/likes", Some(&grace), Some(like)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_request");
    assert_eq!(error["details"]["detail"], "possible duplicate");

    let (_, listed) = get(&app, &format!("/api/v1/photos/{photo}"), None).await;
    assert_eq!(listed["likes_count"], 1);
}

#[actix_web::test]
async fn duplicate_follows_leave_the_counts_alone() {
    let app = init_app(fresh_state()).await;
    let ada = register(&app, "ada").await;
    let grace = register(&app, "grace").await;
    let (_, target) = get(&app, "/api/v1/auth/user", Some(&ada)).await;
    let follow = json!({ "followed": target["id"] });

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/followers",
        Some(&grace),
        Some(follow.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["followed_name"], "ada");
    let (status, _) = send(&app, Method::POST, "/api/v1/followers", Some(&grace), Some(follow)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let profile_uri = format!("/api/v1/profiles/{}", target["profile_id"]);
    let (_, profile) = get(&app, &profile_uri, Some(&grace)).await;
    assert_eq!(profile["followers_count"], 1);
    assert_eq!(profile["following_id"], created["id"]);
}

#[actix_web::test]
async fn only_the_liker_can_withdraw_a_like() {
    let app = init_app(fresh_state()).await;
    let ada = register(&app, "ada").await;
    let grace = register(&app, "grace").await;
    let photo = create_photo(&app, &ada, "Harbour").await;
    let (_, like) = send(
        &app,
        Method::POST,
        "/api/v1/likes",
        Some(&grace),
        Some(json!({ "photo": photo })),
    )
    .await;
    let like_uri = format!("/api/v1/likes/{}", id_of(&like));

    let (status, _) = send(&app, Method::DELETE, &like_uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, &like_uri, Some(&grace), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, photo) = get(&app, &format!("/api/v1/photos/{photo}"), None).await;
    assert_eq!(photo["likes_count"], 0);
}

#[actix_web::test]
async fn deleting_a_photo_removes_its_comments_and_likes() {
    let app = init_app(fresh_state()).await;
    let ada = register(&app, "ada").await;
    let grace = register(&app, "grace").await;
    let photo = create_photo(&app, &ada, "Harbour").await;
    let (_, comment) = send(
        &app,
        Method::POST,
        "/api/v1/comments",
        Some(&grace),
        Some(json!({ "photo": photo, "content": "Lovely" })),
    )
    .await;
    let (_, like) = send(
        &app,
        Method::POST,
        "/api/v1/likes",
        Some(&grace),
        Some(json!({ "photo": photo })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/photos/{photo}"),
        Some(&ada),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/v1/photos/{photo}"),
        format!("/api/v1/comments/{}", id_of(&comment)),
        format!("/api/v1/likes/{}", id_of(&like)),
    ] {
        let (status, body) = get(&app, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], "not_found");
    }
}

#[actix_web::test]
async fn deleting_a_profile_removes_the_principal_and_everything_it_owns() {
    let app = init_app(fresh_state()).await;
    let ada = register(&app, "ada").await;
    let grace = register(&app, "grace").await;
    let photo = create_photo(&app, &ada, "Harbour").await;
    let (_, grace_user) = get(&app, "/api/v1/auth/user", Some(&grace)).await;
    let (_, follow) = send(
        &app,
        Method::POST,
        "/api/v1/followers",
        Some(&ada),
        Some(json!({ "followed": grace_user["id"] })),
    )
    .await;
    let (_, ada_user) = get(&app, "/api/v1/auth/user", Some(&ada)).await;
    let profile_uri = format!("/api/v1/profiles/{}", ada_user["profile_id"]);

    let (status, _) = send(&app, Method::DELETE, &profile_uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = login(&app, "ada", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = get(&app, "/api/v1/auth/user", Some(&ada)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    for uri in [
        profile_uri,
        format!("/api/v1/photos/{photo}"),
        format!("/api/v1/followers/{}", id_of(&follow)),
    ] {
        let (status, _) = get(&app, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let grace_profile = format!("/api/v1/profiles/{}", grace_user["profile_id"]);
    let (_, profile) = get(&app, &grace_profile, None).await;
    assert_eq!(profile["followers_count"], 0);
}

#[actix_web::test]
async fn a_stale_session_cannot_write() {
    let app = init_app(fresh_state()).await;
    let ada = register(&app, "ada").await;
    let (_, me) = get(&app, "/api/v1/auth/user", Some(&ada)).await;
    send(
        &app,
        Method::DELETE,
        &format!("/api/v1/profiles/{}", me["profile_id"]),
        Some(&ada),
        None,
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/photos",
        Some(&ada),
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
