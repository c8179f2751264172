#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use doubtnlearn_api::adapters::{
    Argon2Hasher, DiskUploadStore, HtmlDashboardRenderer, InMemoryDb, InMemorySessionStore,
};
use doubtnlearn_api::config::Config;
use doubtnlearn_api::web::{build_router, state::AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for .oneshot()
use tracing::Level;

pub const DASHBOARD_TEMPLATE: &str = "<h1>{{user_name}}</h1><p>{{user_email}}</p>\
<section id=\"doubts\">{{doubts}}</section><section id=\"sessions\">{{bookasessions}}</section>";

const BOUNDARY: &str = "----doubtnlearn-test-boundary";

/// The router wired to in-memory adapters and a throwaway directory tree.
pub struct TestApp {
    pub router: Router,
    pub db: Arc<InMemoryDb>,
    pub sessions: Arc<InMemorySessionStore>,
    pub hasher: Arc<Argon2Hasher>,
    pub upload_dir: PathBuf,
    _root: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_session_ttl(3600)
    }

    pub fn with_session_ttl(ttl_secs: i64) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let upload_dir = root.path().join("uploads");
        let views_dir = root.path().join("views");
        let public_dir = root.path().join("public");
        for dir in [&upload_dir, &views_dir, &public_dir] {
            std::fs::create_dir_all(dir).expect("create dir");
        }
        for page in ["login", "signup", "home"] {
            std::fs::write(
                views_dir.join(format!("{page}.html")),
                format!("<html><body>{page} page</body></html>"),
            )
            .expect("write view");
        }
        std::fs::write(public_dir.join("style.css"), "body {}").expect("write css");

        let config = Arc::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            database_url: "memory://".to_string(),
            database_max_connections: 1,
            log_level: Level::DEBUG,
            upload_dir: upload_dir.clone(),
            views_dir,
            public_dir,
            session_ttl_secs: ttl_secs,
            session_cookie_name: "session".to_string(),
            cookie_secure: false,
            max_upload_bytes: 1024 * 1024,
        });

        let db = Arc::new(InMemoryDb::new());
        let sessions = Arc::new(InMemorySessionStore::new(chrono::Duration::seconds(ttl_secs)));
        let hasher = Arc::new(Argon2Hasher::new());
        let state = Arc::new(AppState {
            db: db.clone(),
            sessions: sessions.clone(),
            hasher: hasher.clone(),
            uploads: Arc::new(DiskUploadStore::new(upload_dir.clone())),
            renderer: Arc::new(HtmlDashboardRenderer::new(DASHBOARD_TEMPLATE)),
            config,
        });

        TestApp {
            router: build_router(state),
            db,
            sessions,
            hasher,
            upload_dir,
            _root: root,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub async fn signup(&self, email: &str, password: &str) -> Response<Body> {
        self.signup_as("Asha", email, password).await
    }

    pub async fn signup_as(&self, name: &str, email: &str, password: &str) -> Response<Body> {
        let body = form(&[
            ("name", name),
            ("email", email),
            ("age", "21"),
            ("phone", "555-0100"),
            ("password", password),
            ("domain", "Physics"),
            ("accountType", "Student"),
        ]);
        self.send(post_form("/signup", &body, None)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response<Body> {
        let body = form(&[("email", email), ("password", password)]);
        self.send(post_form("/login", &body, None)).await
    }

    /// Signs up and logs in, returning the `name=value` cookie pair.
    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> String {
        assert_eq!(self.signup_as(name, email, password).await.status(), StatusCode::OK);
        let resp = self.login(email, password).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        session_cookie(&resp).expect("login sets a session cookie")
    }
}

pub fn form(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).expect("urlencode form")
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    post_as(path, "application/x-www-form-urlencoded", body, cookie)
}

/// A POST with an arbitrary content type, for bodies the handlers must refuse.
pub fn post_as(path: &str, content_type: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        data: &'a [u8],
    },
}

pub fn post_multipart(path: &str, parts: &[Part<'_>], cookie: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// The `name=value` pair from a `Set-Cookie` header, if any.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|pair| pair.trim().to_string())
}

pub fn token_of(cookie: &str) -> &str {
    cookie.split_once('=').map(|(_, token)| token).unwrap_or_default()
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    to_bytes(resp.into_body(), 1024 * 1024).await.unwrap().to_vec()
}

pub async fn body_string(resp: Response<Body>) -> String {
    String::from_utf8(body_bytes(resp).await).unwrap()
}
