//! In-process stand-in for the blog-post service.
//!
//! Serves the `/posts` resource with the same HTTP contract the contract
//! suite checks against the public service: JSON bodies, a
//! `application/json; charset=utf-8` content type on every response, `{}`
//! bodies on 404, and a seeded set of 100 posts. Like the public service it
//! does not validate what is posted: any JSON object is stored and echoed
//! back with its new id, whatever the request's content type. Unlike the
//! public service, writes are applied to the in-memory store, so a delete is
//! observable by a later fetch.

use std::{collections::BTreeMap, future::Future, net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{
    net::TcpListener,
    sync::{oneshot, RwLock},
};

/// Content type attached to every response.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Number of posts present in a fresh store.
pub const SEED_POSTS: u64 = 100;

const POSTS_PER_USER: u64 = 10;

/// Shape of the seeded posts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

impl Post {
    fn into_record(self) -> Record {
        let mut record = Record::new();
        record.insert("userId".to_string(), self.user_id.into());
        record.insert("id".to_string(), self.id.into());
        record.insert("title".to_string(), self.title.into());
        record.insert("body".to_string(), self.body.into());
        record
    }
}

/// A stored post: whatever fields were submitted, plus `id`.
pub type Record = Map<String, Value>;

pub type Db = Arc<RwLock<BTreeMap<u64, Record>>>;

/// JSON response body tagged with an explicit utf-8 charset.
pub struct JsonUtf8<T>(pub T);

impl<T: Serialize> IntoResponse for JsonUtf8<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
                bytes,
            )
                .into_response(),
            Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
        }
    }
}

/// Posts 1..=100, ten per user.
pub fn seed() -> BTreeMap<u64, Record> {
    (1..=SEED_POSTS)
        .map(|id| {
            let post = Post {
                user_id: (id - 1) / POSTS_PER_USER + 1,
                id,
                title: format!("post {id}"),
                body: format!("body of post {id}"),
            };
            (id, post.into_record())
        })
        .collect()
}

/// Read a request body as a JSON object. A blank body is an empty object;
/// anything that is not a JSON object is `None`.
pub fn parse_fields(body: &[u8]) -> Option<Record> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Some(Record::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seed()));
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve until `shutdown` resolves.
pub async fn run_until(
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown)
        .await
}

/// A server started by `spawn_background`. Dropping it stops the server.
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // the server thread may already be gone
            let _ = shutdown.send(());
        }
        tracing::debug!(addr = %self.addr, "mock posts server stopping");
    }
}

/// Bind `127.0.0.1:0` and serve from a dedicated thread running its own
/// current-thread runtime. The listener is bound before this returns, so the
/// address accepts connections immediately.
pub fn spawn_background() -> std::io::Result<MockServer> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                tracing::error!(error = %err, "failed to build mock server runtime");
                return;
            }
        };
        let served = rt.block_on(async move {
            let listener = TcpListener::from_std(std_listener)?;
            run_until(listener, async move {
                let _ = shutdown_rx.await;
            })
            .await
        });
        if let Err(err) = served {
            tracing::error!(error = %err, "mock posts server stopped");
        }
    });

    tracing::debug!(%addr, "mock posts server spawned");
    Ok(MockServer {
        addr,
        shutdown: Some(shutdown_tx),
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, JsonUtf8(Record::new())).into_response()
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, JsonUtf8(Record::new())).into_response()
}

async fn list_posts(State(db): State<Db>) -> JsonUtf8<Vec<Record>> {
    let posts = db.read().await;
    JsonUtf8(posts.values().cloned().collect())
}

async fn create_post(State(db): State<Db>, body: Bytes) -> Response {
    let Some(mut record) = parse_fields(&body) else {
        return bad_request();
    };
    let mut posts = db.write().await;
    let id = posts.keys().next_back().map_or(1, |last| last + 1);
    record.insert("id".to_string(), id.into());
    posts.insert(id, record.clone());
    tracing::debug!(id, "post created");
    (StatusCode::CREATED, JsonUtf8(record)).into_response()
}

async fn get_post(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let posts = db.read().await;
    match posts.get(&id) {
        Some(post) => JsonUtf8(post).into_response(),
        None => not_found(),
    }
}

async fn update_post(State(db): State<Db>, Path(id): Path<u64>, body: Bytes) -> Response {
    let mut posts = db.write().await;
    let Some(post) = posts.get_mut(&id) else {
        return not_found();
    };
    let Some(fields) = parse_fields(&body) else {
        return bad_request();
    };
    for (key, value) in fields {
        if key != "id" {
            post.insert(key, value);
        }
    }
    JsonUtf8(&*post).into_response()
}

async fn delete_post(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let mut posts = db.write().await;
    match posts.remove(&id) {
        Some(_) => {
            tracing::debug!(id, "post deleted");
            JsonUtf8(Record::new()).into_response()
        }
        None => not_found(),
    }
}
