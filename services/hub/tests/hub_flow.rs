//! End-to-end flows through the router against live PostgreSQL and Redis
//!
//! Run with `cargo test -p hub -- --ignored` after exporting `DATABASE_URL`
//! and `REDIS_URL`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, init_pool, run_migrations},
};
use hub::{AppState, MIGRATOR, config::HubConfig, routes::create_router};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    state: AppState,
    _media: TempDir,
}

async fn app() -> TestApp {
    let pool = init_pool(&DatabaseConfig::from_env().unwrap()).await.unwrap();
    run_migrations(&pool, &MIGRATOR).await.unwrap();
    let redis = RedisPool::new(&RedisConfig::from_env().unwrap()).await.unwrap();

    let media = tempfile::tempdir().unwrap();
    let config = HubConfig {
        bind_address: "127.0.0.1:0".to_string(),
        media_root: media.path().to_path_buf(),
        static_root: concat!(env!("CARGO_MANIFEST_DIR"), "/static").into(),
        session_ttl_seconds: 300,
        max_upload_bytes: 64 * 1024,
        seed_password: "changeit".to_string(),
        log_level: "info".to_string(),
        secure_cookies: false,
    };
    let state = AppState::new(pool, redis, config);

    TestApp {
        router: create_router(state.clone()),
        state,
        _media: media,
    }
}

fn unique_username() -> String {
    format!("u{}", &Uuid::new_v4().simple().to_string()[..12])
}

impl TestApp {
    fn pool(&self) -> &PgPool {
        &self.state.db_pool
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn post_multipart(
        &self,
        uri: &str,
        parts: &[(&str, Option<&str>, &[u8])],
        cookie: &str,
    ) -> Response {
        let boundary = "hubtestboundary";
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header(header::COOKIE, cookie)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Register a fresh account and return its username and session cookie
    async fn register(&self) -> (String, String) {
        let username = unique_username();
        let body = format!(
            "username={username}&password=pw-123&repeat_password=pw-123\
             &first_name=Test&last_name=User&email="
        );
        let response = self.post_form("/register/", &body, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response).expect("registration opens a session");
        (username, cookie)
    }

    async fn user_id(&self, username: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(self.pool())
            .await
            .unwrap()
    }

    async fn profile_count(&self, user_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool())
            .await
            .unwrap()
    }
}

fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("hub_session="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_mismatched_passwords_create_no_user() {
    let app = app().await;
    let username = unique_username();
    let body = format!(
        "username={username}&password=a&repeat_password=b&first_name=A&last_name=B"
    );

    let response = app.post_form("/register/", &body, None).await;
    assert_eq!(location(&response), "/error/not_same_passwords");

    let exists = app
        .state
        .user_repository
        .username_exists(&username)
        .await
        .unwrap();
    assert!(!exists);
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_duplicate_username_fails_validation() {
    let app = app().await;
    let (username, _) = app.register().await;

    let body = format!(
        "username={username}&password=x&repeat_password=x&first_name=A&last_name=B"
    );
    let response = app.post_form("/register/", &body, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(session_cookie(&response).is_none());
    assert!(
        body_text(response)
            .await
            .contains("A user with that username already exists.")
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_login_outcomes() {
    let app = app().await;
    let (username, _) = app.register().await;

    let response = app
        .post_form(
            "/login/",
            &format!("username={username}&password=pw-123&next=/dashboard/"),
            None,
        )
        .await;
    assert_eq!(location(&response), "/dashboard/");
    assert!(session_cookie(&response).is_some());

    let response = app
        .post_form("/login/", &format!("username={username}&password=nope"), None)
        .await;
    assert_eq!(location(&response), "/error/invalid_username_or_password");
    assert!(session_cookie(&response).is_none());

    let user_id = app.user_id(&username).await;
    app.state
        .user_repository
        .set_active(user_id, false)
        .await
        .unwrap();
    let response = app
        .post_form("/login/", &format!("username={username}&password=pw-123"), None)
        .await;
    assert_eq!(location(&response), "/error/account_is_not_activated");
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_logout_ends_session() {
    let app = app().await;
    let (_, cookie) = app.register().await;

    assert_eq!(
        app.get("/dashboard/", Some(&cookie)).await.status(),
        StatusCode::OK
    );
    let response = app.get("/logout/", Some(&cookie)).await;
    assert_eq!(location(&response), "/");

    let response = app.get("/dashboard/", Some(&cookie)).await;
    assert_eq!(location(&response), "/?next=/dashboard/");
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_dashboard_keeps_one_profile_per_user() {
    let app = app().await;
    let (username, cookie) = app.register().await;
    let user_id = app.user_id(&username).await;

    let response = app
        .post_multipart(
            "/dashboard/",
            &[
                ("description", None, b"First version".as_slice()),
                ("resume_file", Some("cv.pdf"), b"%PDF-1.4 one".as_slice()),
            ],
            &cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_multipart(
            "/dashboard/",
            &[
                ("description", None, b"Second version".as_slice()),
                ("resume_file", Some(""), b"".as_slice()),
            ],
            &cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(&format!("user_{user_id}&#x2F;cv.pdf")));

    assert_eq!(app.profile_count(user_id).await, 1);
    let profile = app
        .state
        .profile_repository
        .find_by_user(user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.description, "Second version");
    assert_eq!(profile.resume_file, format!("user_{user_id}/cv.pdf"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_profile_picture_upload() {
    let app = app().await;
    let (username, cookie) = app.register().await;
    let user_id = app.user_id(&username).await;

    let response = app
        .post_multipart(
            "/change_profile_pic/",
            &[("picture", Some("me.txt"), b"hello".as_slice())],
            &cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.profile_count(user_id).await, 0);

    let response = app
        .post_multipart(
            "/change_profile_pic/",
            &[("picture", Some("me.png"), b"\x89PNG\r\n\x1a\nimage".as_slice())],
            &cookie,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(&format!("user_{user_id}&#x2F;me.png")));

    let response = app.get("/change_profile_pic/", Some(&cookie)).await;
    assert!(body_text(response).await.contains(&format!("user_{user_id}&#x2F;me.png")));
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_comments_are_listed_newest_first() {
    let app = app().await;
    let (username, cookie) = app.register().await;
    let user_id = app.user_id(&username).await;
    let profile = app
        .state
        .profile_repository
        .get_or_create(user_id)
        .await
        .unwrap()
        .into_profile();

    for content in ["first+comment", "second+comment"] {
        let response = app
            .post_form(
                "/comment/",
                &format!("content={content}&resume_id={}", profile.id),
                Some(&cookie),
            )
            .await;
        assert_eq!(location(&response), format!("/resume/{}/", profile.id));
    }

    let comments = app
        .state
        .comment_repository
        .for_profile(profile.id)
        .await
        .unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment.content, "second comment");
    assert!(comments.iter().all(|c| c.comment.user_id == user_id));
    assert!(comments.iter().all(|c| c.comment.profile_id == profile.id));

    let page = body_text(app.get(&format!("/resume/{}/", profile.id), None).await).await;
    let second = page.find("second comment").unwrap();
    let first = page.find("first comment").unwrap();
    assert!(second < first);
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_missing_resume_is_not_found() {
    let app = app().await;
    let response = app.get("/resume/999999999/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.get("/resume/abc/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_doc_gate() {
    let app = app().await;
    let (username, cookie) = app.register().await;
    let user_id = app.user_id(&username).await;

    let response = app.get("/doc/", Some(&cookie)).await;
    assert_eq!(location(&response), "/error/restricted_section");

    let profile = app
        .state
        .profile_repository
        .get_or_create(user_id)
        .await
        .unwrap()
        .into_profile();
    let response = app.get("/doc/", Some(&cookie)).await;
    assert_eq!(location(&response), "/error/restricted_section");

    app.state
        .profile_repository
        .set_special(profile.id, true)
        .await
        .unwrap();
    let response = app.get("/doc/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_listing_shows_only_profiles_with_resume() {
    let app = app().await;
    let (with_file, cookie) = app.register().await;
    app.post_multipart(
        "/dashboard/",
        &[
            ("description", None, b"Listed bio".as_slice()),
            ("resume_file", Some("cv.pdf"), b"%PDF".as_slice()),
        ],
        &cookie,
    )
    .await;

    let (without_file, cookie) = app.register().await;
    app.post_multipart(
        "/dashboard/",
        &[("description", None, b"Hidden bio".as_slice())],
        &cookie,
    )
    .await;

    let rows = app
        .state
        .profile_repository
        .recent_with_owner(20)
        .await
        .unwrap();
    let cards = hub::listing::build_listing(rows);
    assert!(cards.len() <= 20);
    assert!(cards.iter().all(|c| !c.resume_file.is_empty()));

    let page = body_text(app.get("/", None).await).await;
    assert!(page.contains("Listed bio"));
    assert!(!page.contains("Hidden bio"));

    let with_id = app.user_id(&with_file).await;
    let without_id = app.user_id(&without_file).await;
    assert_eq!(app.profile_count(with_id).await, 1);
    assert_eq!(app.profile_count(without_id).await, 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_seeding_is_idempotent() {
    let app = app().await;
    let users = &app.state.user_repository;
    let profiles = &app.state.profile_repository;

    hub::seed::seed_default_accounts(users, profiles, "changeit").await;
    let second = hub::seed::seed_default_accounts(users, profiles, "changeit").await;
    assert!(second.created.is_empty());
    assert!(second.failed.is_empty());
    assert_eq!(second.existing, vec!["admin", "teacher"]);

    let admin = users.find_by_username("admin").await.unwrap().unwrap();
    assert!(admin.is_superuser);
    let profile = profiles.find_by_user(admin.id).await.unwrap().unwrap();
    assert!(profile.is_special);
}

fn seed_account(username: String) -> hub::seed::DefaultAccount {
    hub::seed::DefaultAccount {
        username: Box::leak(username.into_boxed_str()),
        email: "seeded@resume-hub.com",
        first_name: "Seeded",
        last_name: "Account",
        is_superuser: false,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_seeding_leaves_existing_account_untouched() {
    let app = app().await;
    let (username, cookie) = app.register().await;
    let user_id = app.user_id(&username).await;

    let account = seed_account(username);
    let report = hub::seed::seed_accounts(
        &app.state.user_repository,
        &app.state.profile_repository,
        &[account],
        "changeit",
    )
    .await;
    assert!(report.created.is_empty());
    assert_eq!(report.existing, vec![account.username]);

    assert_eq!(app.profile_count(user_id).await, 0);
    let response = app.get("/doc/", Some(&cookie)).await;
    assert_eq!(location(&response), "/error/restricted_section");

    let profile = app
        .state
        .profile_repository
        .get_or_create(user_id)
        .await
        .unwrap()
        .into_profile();
    hub::seed::seed_accounts(
        &app.state.user_repository,
        &app.state.profile_repository,
        &[account],
        "changeit",
    )
    .await;
    let profile = app
        .state
        .profile_repository
        .find_by_id(profile.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!profile.is_special);
}

#[tokio::test]
#[ignore = "requires PostgreSQL and Redis"]
async fn test_seeding_creates_missing_account_with_special_profile() {
    let app = app().await;
    let account = seed_account(unique_username());

    let report = hub::seed::seed_accounts(
        &app.state.user_repository,
        &app.state.profile_repository,
        &[account],
        "changeit",
    )
    .await;
    assert_eq!(report.created, vec![account.username]);

    let user_id = app.user_id(account.username).await;
    let profile = app
        .state
        .profile_repository
        .find_by_user(user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(profile.is_special);
}
