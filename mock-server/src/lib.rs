use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-api-key";
pub const MODEL: &str = "gpt-3.5-turbo";
pub const VERSION: &str = "1.0.0";

#[derive(Clone, Debug)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub activity_type: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

#[derive(Clone, Debug)]
pub struct Entry {
    pub name: String,
    pub path: String,
    pub parent: String,
    pub kind: EntryKind,
    pub content: Vec<u8>,
}

impl Entry {
    fn listing(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.kind,
            "path": self.path,
            "size": self.content.len(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct Share {
    pub owner: String,
    pub path: String,
    pub file_name: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: HashMap<String, User>,
    pub activity: HashMap<String, Vec<Activity>>,
    pub files: HashMap<String, Vec<Entry>>,
    pub shares: HashMap<String, Share>,
}

impl Store {
    /// Two users: `test`/`password` and `alice`/`wonderland`.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        for (id, username, password) in [(1, "test", "password"), (2, "alice", "wonderland")] {
            store.users.insert(
                username.to_string(),
                User {
                    id,
                    username: username.to_string(),
                    email: format!("{username}@test.com"),
                    password: password.to_string(),
                },
            );
        }
        store
    }

    fn user(&self, username: &str) -> Result<&User, ApiFailure> {
        self.users
            .get(username)
            .ok_or_else(|| ApiFailure::not_found("User not found"))
    }

    fn folder_exists(&self, username: &str, path: &str) -> bool {
        path == "/"
            || self.files.get(username).is_some_and(|entries| {
                entries
                    .iter()
                    .any(|e| e.kind == EntryKind::Folder && e.path == path)
            })
    }

    fn entry(&self, username: &str, path: &str) -> Result<&Entry, ApiFailure> {
        self.files
            .get(username)
            .and_then(|entries| entries.iter().find(|e| e.path == path))
            .ok_or_else(|| ApiFailure::not_found("File not found"))
    }

    /// Insert `entry`, replacing any existing file at the same path.
    fn put(&mut self, username: &str, entry: Entry) -> Result<(), ApiFailure> {
        let entries = self.files.entry(username.to_string()).or_default();
        match entries.iter().position(|e| e.path == entry.path) {
            Some(i) if entries[i].kind == EntryKind::File && entry.kind == EntryKind::File => {
                entries[i] = entry;
            }
            Some(_) => return Err(ApiFailure::conflict(format!("{} already exists", entry.path))),
            None => entries.push(entry),
        }
        Ok(())
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub api_key: Arc<str>,
    pub db: Db,
}

/// `{"error": message}` with a status code.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiFailure>;

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(Store::seeded())),
    };
    Router::new()
        .route("/api/ai", get(ai_status).post(ai_chat))
        .route("/api/user", get(get_profile).post(login))
        .route(
            "/api/user/{username}/activity",
            get(get_activity).post(log_activity),
        )
        .route("/api/file-manager", get(list_files))
        .route("/api/file-manager/upload", post(upload_file))
        .route("/api/file-manager/download", get(download_file))
        .route("/api/file-manager/remove", delete(remove_file))
        .route("/api/file-manager/create-folder", post(create_folder))
        .route("/api/file-manager/share", get(get_shared_file).post(share_file))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_key(listener, DEFAULT_API_KEY).await
}

pub async fn run_with_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|key| key == &*state.api_key);
    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting request without valid bearer token");
        return ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid API key").into_response();
    }
    next.run(request).await
}

fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{}/{name}", parent.trim_end_matches('/'))
    }
}

fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiFailure::bad_request(format!("{field} is required")));
    }
    Ok(())
}

// --- ai ---

#[derive(Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
}

async fn ai_status() -> Json<Value> {
    Json(json!({ "status": "ok", "model": MODEL, "version": VERSION }))
}

async fn ai_chat(Json(input): Json<ChatRequest>) -> ApiResult<Json<Value>> {
    let last = input
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .ok_or_else(|| ApiFailure::bad_request("Messages array cannot be empty"))?;
    let text = format!("Echo: {}", last.content);
    let total_tokens: usize = input
        .messages
        .iter()
        .map(|m| m.content.split_whitespace().count())
        .sum::<usize>()
        + text.split_whitespace().count();
    Ok(Json(json!({
        "text": text,
        "usage": { "totalTokens": total_tokens },
        "model": input.model.as_deref().unwrap_or(MODEL),
    })))
}

// --- user ---

#[derive(Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct LogActivityRequest {
    pub activity_type: String,
    pub description: String,
}

async fn get_profile(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<Value>> {
    let db = state.db.read().await;
    let user = db.user(&query.username)?;
    Ok(Json(json!({ "id": user.id, "username": user.username, "email": user.email })))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let mut db = state.db.write().await;
    let user = db
        .users
        .get(&input.username)
        .filter(|u| u.password == input.password)
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid username or password"))?;
    let body = json!({ "id": user.id, "username": user.username, "token": Uuid::new_v4() });
    db.activity.entry(input.username).or_default().push(Activity {
        id: Uuid::new_v4(),
        activity_type: "login".to_string(),
        description: "Logged in".to_string(),
    });
    Ok(Json(body))
}

async fn get_activity(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<Value>> {
    let db = state.db.read().await;
    db.user(&username)?;
    let limit = query.limit.unwrap_or(usize::MAX);
    let activities: Vec<&Activity> = db
        .activity
        .get(&username)
        .map(|log| log.iter().rev().take(limit).collect())
        .unwrap_or_default();
    Ok(Json(json!({ "username": username, "activities": activities })))
}

async fn log_activity(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(input): Json<LogActivityRequest>,
) -> ApiResult<(StatusCode, Json<Activity>)> {
    require("activity_type", &input.activity_type)?;
    require("description", &input.description)?;
    let mut db = state.db.write().await;
    db.user(&username)?;
    let activity = Activity {
        id: Uuid::new_v4(),
        activity_type: input.activity_type,
        description: input.description,
    };
    db.activity.entry(username).or_default().push(activity.clone());
    Ok((StatusCode::CREATED, Json(activity)))
}

// --- file manager ---

#[derive(Deserialize)]
pub struct ListQuery {
    pub username: String,
    pub path: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct FileQuery {
    pub username: String,
    pub path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub username: String,
    pub folder_name: String,
    pub parent_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub file_name: String,
}

#[derive(Deserialize)]
pub struct SharedQuery {
    pub code: String,
    pub data: String,
    pub metadata: Option<String>,
}

async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Value>>> {
    let db = state.db.read().await;
    db.user(&query.username)?;
    let path = query.path.as_deref().unwrap_or("/");
    let search = query.search.as_deref().unwrap_or("");
    let entries = db
        .files
        .get(&query.username)
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e.parent == path && e.name.contains(search))
                .map(Entry::listing)
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(entries))
}

async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut path = String::from("/");
    let mut username = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiFailure::bad_request(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiFailure::bad_request(e.to_string()))?;
                file = Some((name, bytes.to_vec()));
            }
            Some("path") => {
                path = field
                    .text()
                    .await
                    .map_err(|e| ApiFailure::bad_request(e.to_string()))?;
            }
            Some("username") => {
                username = field
                    .text()
                    .await
                    .map_err(|e| ApiFailure::bad_request(e.to_string()))?;
            }
            _ => {}
        }
    }

    require("username", &username)?;
    let (name, content) = file.ok_or_else(|| ApiFailure::bad_request("file is required"))?;
    require("file name", &name)?;

    let mut db = state.db.write().await;
    db.user(&username)?;
    if !db.folder_exists(&username, &path) {
        return Err(ApiFailure::not_found(format!("Folder {path} not found")));
    }
    let full_path = join(&path, &name);
    db.put(
        &username,
        Entry {
            name: name.clone(),
            path: full_path.clone(),
            parent: path,
            kind: EntryKind::File,
            content,
        },
    )?;
    tracing::debug!(%username, path = %full_path, "stored upload");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "File uploaded successfully",
            "file": { "name": name, "path": full_path },
        })),
    ))
}

async fn download_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<Value>> {
    let db = state.db.read().await;
    db.user(&query.username)?;
    let entry = db.entry(&query.username, &query.path)?;
    if entry.kind != EntryKind::File {
        return Err(ApiFailure::bad_request(format!("{} is a folder", entry.path)));
    }
    Ok(Json(json!({
        "name": entry.name,
        "path": entry.path,
        "size": entry.content.len(),
        "content": String::from_utf8_lossy(&entry.content),
    })))
}

async fn remove_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<Value>> {
    let mut db = state.db.write().await;
    db.user(&query.username)?;
    db.entry(&query.username, &query.path)?;
    let prefix = format!("{}/", query.path);
    if let Some(entries) = db.files.get_mut(&query.username) {
        entries.retain(|e| e.path != query.path && !e.path.starts_with(&prefix));
    }
    Ok(Json(json!({ "message": "File removed successfully", "path": query.path })))
}

async fn create_folder(
    State(state): State<AppState>,
    Json(input): Json<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require("folderName", &input.folder_name)?;
    if input.folder_name.contains('/') {
        return Err(ApiFailure::bad_request("folderName must not contain '/'"));
    }
    let mut db = state.db.write().await;
    db.user(&input.username)?;
    if !db.folder_exists(&input.username, &input.parent_path) {
        return Err(ApiFailure::not_found(format!("Folder {} not found", input.parent_path)));
    }
    let path = join(&input.parent_path, &input.folder_name);
    db.put(
        &input.username,
        Entry {
            name: input.folder_name.clone(),
            path: path.clone(),
            parent: input.parent_path,
            kind: EntryKind::Folder,
            content: Vec::new(),
        },
    )?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Folder created successfully",
            "folder": { "name": input.folder_name, "path": path },
        })),
    ))
}

async fn share_file(
    State(state): State<AppState>,
    Json(input): Json<ShareRequest>,
) -> ApiResult<Json<Value>> {
    require("fileName", &input.file_name)?;
    let mut db = state.db.write().await;
    let (owner, path) = db
        .files
        .iter()
        .find_map(|(owner, entries)| {
            entries
                .iter()
                .find(|e| e.kind == EntryKind::File && e.name == input.file_name)
                .map(|e| (owner.clone(), e.path.clone()))
        })
        .ok_or_else(|| ApiFailure::not_found("File not found"))?;
    let code = Uuid::new_v4().simple().to_string();
    db.shares.insert(
        code.clone(),
        Share {
            owner,
            path,
            file_name: input.file_name.clone(),
        },
    );
    Ok(Json(json!({ "code": code, "data": input.file_name })))
}

async fn get_shared_file(
    State(state): State<AppState>,
    Query(query): Query<SharedQuery>,
) -> ApiResult<Json<Value>> {
    let db = state.db.read().await;
    let share = db
        .shares
        .get(&query.code)
        .filter(|s| s.file_name == query.data)
        .ok_or_else(|| ApiFailure::not_found("Share link not found"))?;
    let entry = db.entry(&share.owner, &share.path)?;
    let mut body = json!({
        "name": entry.name,
        "path": entry.path,
        "size": entry.content.len(),
        "owner": share.owner,
    });
    if query.metadata.as_deref() != Some("true") {
        body["content"] = json!(String::from_utf8_lossy(&entry.content));
    }
    Ok(Json(body))
}
