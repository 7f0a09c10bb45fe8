//! Markdown pages resource.
//!
//! Pages are stored under `page/<id>.md`. Reads are public; writes need an
//! admin session.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{
    auth::AdminSession,
    error::ApiError,
    state::{AppState, with_store},
    store::{BlobStore, Metadata},
};

const KEY_PREFIX: &str = "page/";
const KEY_SUFFIX: &str = ".md";

/// `?id=` query parameter.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

impl IdQuery {
    pub(super) fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Body of a save request.
#[derive(Debug, Default, Deserialize)]
pub struct SavePage {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// One page in a listing.
#[derive(Debug, Serialize)]
struct PageSummary {
    id: String,
    etag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

fn page_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}{KEY_SUFFIX}")
}

fn page_id(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX)?.strip_suffix(KEY_SUFFIX)
}

/// Markdown stored for a page: a `# title` heading when a title is given.
fn page_markdown(title: &str, content: &str) -> String {
    if title.is_empty() {
        content.to_string()
    } else {
        format!("# {title}\n\n{content}")
    }
}

fn list_pages(store: &dyn BlobStore) -> Result<Vec<PageSummary>, ApiError> {
    let mut pages = Vec::new();
    for entry in store.list(KEY_PREFIX)? {
        let Some(id) = page_id(&entry.key) else {
            continue;
        };
        let title = store
            .metadata(&entry.key)?
            .and_then(|mut meta| meta.remove("title"))
            .filter(|t| !t.is_empty());
        pages.push(PageSummary {
            id: id.to_string(),
            etag: entry.etag,
            title,
        });
    }
    Ok(pages)
}

/// `GET /api/pages` lists pages, `GET /api/pages?id=X` fetches one.
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    if let Some(id) = query.id() {
        let key = page_key(id);
        let content = with_store(&state.pages, move |store| Ok(store.get(&key)?))
            .await?
            .ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;
        let content = String::from_utf8_lossy(&content);
        return Ok(Json(json!({ "id": id, "content": content })));
    }

    let pages = with_store(&state.pages, list_pages).await?;
    Ok(Json(serde_json::to_value(pages)?))
}

/// `PUT|POST /api/pages` creates or replaces a page.
pub async fn save(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    payload: Result<Json<SavePage>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;

    let id = body
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("page-{}", chrono::Utc::now().timestamp_millis()));
    let title = body.title.unwrap_or_default();
    let markdown = page_markdown(&title, &body.content.unwrap_or_default());

    let mut metadata = Metadata::new();
    metadata.insert("title".to_string(), title);
    let key = page_key(&id);
    with_store(&state.pages, move |store| {
        Ok(store.set(&key, markdown.as_bytes(), metadata)?)
    })
    .await?;

    tracing::info!(%id, user = %session.username, "page saved");
    Ok(Json(json!({ "message": "Page saved", "id": id })))
}

/// `DELETE /api/pages?id=X`
pub async fn delete(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = query
        .id()
        .ok_or_else(|| ApiError::BadRequest("No id provided".to_string()))?;

    let key = page_key(id);
    with_store(&state.pages, move |store| Ok(store.delete(&key)?)).await?;

    tracing::info!(%id, user = %session.username, "page deleted");
    Ok(Json(json!({ "message": "Page deleted" })))
}
