use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use blog_core::domain::{Category, Comment, Post, User};
use blog_core::pagination::Paginator;
use blog_core::ports::{BaseRepository, TokenService};
use blog_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

fn state() -> AppState {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "handler-tests".to_string(),
        ..JwtConfig::default()
    });

    AppState::from_parts(
        InMemoryStore::new().repositories(),
        Paginator::new(10),
        Arc::new(tokens),
        Arc::new(Argon2PasswordService::new()),
    )
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn user(state: &AppState, username: &str, is_staff: bool) -> User {
    let mut user = User::new(username.into(), format!("{username}@example.com"), "-".into());
    user.is_staff = is_staff;
    state.blog.repositories().users.create(user).await.unwrap()
}

fn bearer(state: &AppState, user: &User) -> (header::HeaderName, String) {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.roles())
        .unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

async fn post(state: &AppState, author: &User, title: &str, age: Duration) -> Post {
    let post = Post::new(author.id, title.into(), "Body".into(), Utc::now() - age);
    state.blog.repositories().posts.create(post).await.unwrap()
}

fn location<B>(res: &ServiceResponse<B>) -> &str {
    res.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

fn post_form(title: &str) -> Value {
    json!({
        "title": title,
        "text": "Some text",
        "pub_date": Utc::now().to_rfc3339(),
    })
}

#[actix_web::test]
async fn test_index_hides_drafts_from_anonymous() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    post(&state, &ann, "Public", Duration::hours(1)).await;
    let mut draft = Post::new(ann.id, "Draft".into(), "Body".into(), Utc::now());
    draft.is_published = false;
    state.blog.repositories().posts.create(draft).await.unwrap();
    let app = app!(state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=abc").to_request(),
    )
    .await;

    assert_eq!(body["page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["title"], "Public");
    assert_eq!(body["items"][0]["author"], "ann");
}

#[actix_web::test]
async fn test_missing_and_malformed_post_ids_are_not_found() {
    let state = state();
    let app = app!(state);

    let missing = format!("/posts/{}/", Uuid::new_v4());
    let res = test::call_service(&app, test::TestRequest::get().uri(&missing).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/posts/nope/").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_anonymous_mutation_redirects_to_login() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/posts/new/")
        .set_json(post_form("Hello"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/posts/new/");
}

#[actix_web::test]
async fn test_anonymous_mutation_redirects_before_reading_body() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let target = post(&state, &ann, "Discuss", Duration::hours(1)).await;
    let comment = state
        .blog
        .repositories()
        .comments
        .create(Comment::new(target.id, ann.id, "Hi".into()))
        .await
        .unwrap();
    let app = app!(state);

    let req = test::TestRequest::post().uri("/posts/new/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/posts/new/");

    let edit = format!("/comments/{}/edit/", comment.id);
    let req = test::TestRequest::post()
        .uri(&edit)
        .set_json(json!({}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/auth/login/?next={edit}"));
}

#[actix_web::test]
async fn test_deleted_account_token_redirects_to_login() {
    let state = state();
    let ghost = user(&state, "ghost", false).await;
    let credentials = bearer(&state, &ghost);
    state.blog.repositories().users.delete(ghost.id).await.unwrap();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/posts/new/")
        .insert_header(credentials)
        .set_json(post_form("Hello"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=/posts/new/");
}

#[actix_web::test]
async fn test_create_post_redirects_to_profile() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/posts/new/")
        .insert_header(bearer(&state, &ann))
        .set_json(post_form("Hello"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/profile/ann/");

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/profile/ann/").to_request(),
    )
    .await;
    assert_eq!(body["profile"]["username"], "ann");
    assert_eq!(body["posts"]["items"][0]["title"], "Hello");
}

#[actix_web::test]
async fn test_invalid_post_is_unprocessable() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/posts/new/")
        .insert_header(bearer(&state, &ann))
        .set_json(post_form(""))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0], "title: this field is required");
}

#[actix_web::test]
async fn test_non_author_edit_bounces_to_detail() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let bob = user(&state, "bob", false).await;
    let original = post(&state, &ann, "Mine", Duration::hours(1)).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", original.id))
        .insert_header(bearer(&state, &bob))
        .set_json(post_form("Hijacked"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/posts/{}/", original.id));

    let stored = state
        .blog
        .repositories()
        .posts
        .find_by_id(original.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, original);
}

#[actix_web::test]
async fn test_non_author_incomplete_form_bounces_to_detail() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let bob = user(&state, "bob", false).await;
    let original = post(&state, &ann, "Mine", Duration::hours(1)).await;
    let comment = state
        .blog
        .repositories()
        .comments
        .create(Comment::new(original.id, ann.id, "Mine too".into()))
        .await
        .unwrap();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", original.id))
        .insert_header(bearer(&state, &bob))
        .set_json(json!({ "title": "Hijack" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/posts/{}/", original.id));

    let req = test::TestRequest::post()
        .uri(&format!("/comments/{}/edit/", comment.id))
        .insert_header(bearer(&state, &bob))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/posts/{}/", original.id));

    let stored = state
        .blog
        .repositories()
        .posts
        .find_by_id(original.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, original);
}

#[actix_web::test]
async fn test_malformed_form_from_author_is_unprocessable() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let original = post(&state, &ann, "Mine", Duration::hours(1)).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", original.id))
        .insert_header(bearer(&state, &ann))
        .set_json(json!({ "title": "Half" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"][0].as_str().unwrap().starts_with("form: "));

    let req = test::TestRequest::post()
        .uri("/posts/new/")
        .insert_header(bearer(&state, &ann))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_author_delete_removes_post() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let doomed = post(&state, &ann, "Doomed", Duration::hours(1)).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", doomed.id))
        .insert_header(bearer(&state, &ann))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/profile/ann/");

    let detail = format!("/posts/{}/", doomed.id);
    let res = test::call_service(&app, test::TestRequest::get().uri(&detail).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_appears_on_detail() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let bob = user(&state, "bob", false).await;
    let target = post(&state, &ann, "Discuss", Duration::hours(1)).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", target.id))
        .insert_header(bearer(&state, &bob))
        .set_json(json!({ "text": "First!" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/posts/{}/", target.id));

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/", target.id))
            .to_request(),
    )
    .await;
    assert_eq!(body["post"]["comment_count"], 1);
    assert_eq!(body["comments"][0]["author"], "bob");
    assert_eq!(
        body["comment_form_action"],
        format!("/posts/{}/comment/", target.id)
    );
}

#[actix_web::test]
async fn test_unpublished_category_is_not_found() {
    let state = state();
    let mut hidden = Category::new("Hidden".into(), "Nothing here".into(), "hidden".into());
    hidden.is_published = false;
    state
        .blog
        .repositories()
        .categories
        .create(hidden)
        .await
        .unwrap();
    let app = app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/category/hidden/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_edit_targets_session_user() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    user(&state, "bob", false).await;
    let app = app!(state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/profile/bob/edit/")
            .insert_header(bearer(&state, &ann))
            .to_request(),
    )
    .await;
    assert_eq!(body["username"], "ann");

    let req = test::TestRequest::post()
        .uri("/profile/bob/edit/")
        .insert_header(bearer(&state, &ann))
        .set_json(json!({ "username": "annie", "email": "annie@example.com" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/profile/annie/");
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "long enough",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": "carol", "password": "wrong password" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": "carol", "password": "long enough" }))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    let token = login["access_token"].as_str().unwrap();

    let me: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/auth/me/")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(me["username"], "carol");
}

#[actix_web::test]
async fn test_admin_requires_admin_role() {
    let state = state();
    let ann = user(&state, "ann", false).await;
    let root = user(&state, "root", true).await;
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/admin/")
        .insert_header(bearer(&state, &ann))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/admin/")
            .insert_header(bearer(&state, &root))
            .to_request(),
    )
    .await;
    assert_eq!(body["data"]["empty_value_display"], "Not set");
    assert_eq!(body["data"]["models"].as_array().unwrap().len(), 4);

    let req = test::TestRequest::post()
        .uri("/admin/categories/")
        .insert_header(bearer(&state, &root))
        .set_json(json!({
            "title": "Travel",
            "description": "Trips",
            "slug": "travel",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/category/travel/").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
