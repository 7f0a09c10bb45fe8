//! Form leads resource.
//!
//! Submitting a lead is public. Reading and deleting leads needs an admin
//! session.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde_json::{Map, Value, json};

use super::{
    auth::AdminSession,
    error::ApiError,
    pages::IdQuery,
    state::{AppState, with_store},
    store::{BlobStore, Metadata},
};

/// A stored lead: its id followed by the submitted fields.
pub type Lead = Map<String, Value>;

/// Load every lead, ordered by id.
///
/// Entries whose stored value is not a JSON object are skipped.
pub(super) fn load_all(store: &dyn BlobStore) -> Result<Vec<Lead>, ApiError> {
    let mut leads = Vec::new();

    for entry in store.list("")? {
        let Some(bytes) = store.get(&entry.key)? else {
            continue;
        };
        let fields = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                tracing::warn!(key = %entry.key, "stored lead is not an object");
                continue;
            }
            Err(e) => {
                tracing::warn!(key = %entry.key, error = %e, "stored lead is not valid JSON");
                continue;
            }
        };

        let mut lead = Lead::new();
        lead.insert("id".to_string(), Value::String(entry.key));
        lead.extend(fields.into_iter().filter(|(name, _)| name != "id"));
        leads.push(lead);
    }

    Ok(leads)
}

/// Id for a submitted lead: the body's `id` when it is a non-empty string
/// or a number, otherwise a timestamp-based one.
fn lead_id(fields: &Lead) -> String {
    match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("lead-{}", chrono::Utc::now().timestamp_millis()),
    }
}

/// `GET /api/leads`
pub async fn list(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<Lead>>, ApiError> {
    Ok(Json(with_store(&state.leads, load_all).await?))
}

/// `PUT /api/leads`
pub async fn save(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let Value::Object(fields) = body else {
        return Err(ApiError::BadRequest(
            "Lead must be a JSON object".to_string(),
        ));
    };

    let id = lead_id(&fields);
    let bytes = serde_json::to_vec(&fields)?;
    let key = id.clone();
    with_store(&state.leads, move |store| {
        Ok(store.set(&key, &bytes, Metadata::new())?)
    })
    .await?;

    tracing::info!(%id, "lead saved");
    Ok(Json(json!({ "message": "Lead saved", "id": id })))
}

/// `DELETE /api/leads?id=X`
pub async fn delete(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = query
        .id()
        .ok_or_else(|| ApiError::BadRequest("No id provided".to_string()))?;

    let key = id.to_string();
    with_store(&state.leads, move |store| Ok(store.delete(&key)?)).await?;

    tracing::info!(%id, user = %session.username, "lead deleted");
    Ok(Json(json!({ "message": "Lead deleted" })))
}
