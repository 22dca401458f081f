use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use multik8s_common::{
    catalog, CloudProvider, Cluster, ClusterId, ClusterStatus, ClusterStatusSummary,
    MAX_NODE_COUNT, MIN_NODE_COUNT, DEFAULT_NODE_COUNT,
};
use serde_json::{json, Map, Value};
use std::sync::atomic::Ordering;
use tracing::{info, instrument};

use crate::auth::{require_admin, require_user};
use crate::provisioner;
use crate::{ApiError, AppState};

const REQUIRED_FIELDS: [&str; 5] = [
    "name",
    "cloud_provider",
    "region",
    "kubernetes_version",
    "instance_type",
];

#[instrument(skip(state, headers))]
pub async fn list_clusters_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Cluster>>, ApiError> {
    require_user(&headers, &state)?;

    let clusters = state.clusters.read().await;
    Ok(Json(clusters.values().cloned().collect()))
}

#[instrument(skip(state, headers))]
pub async fn get_cluster_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<ClusterId>,
) -> Result<Json<Cluster>, ApiError> {
    require_user(&headers, &state)?;

    let clusters = state.clusters.read().await;
    clusters.get(&id).cloned().map(Json).ok_or_else(ApiError::not_found)
}

#[instrument(skip(state, headers))]
pub async fn cluster_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<ClusterId>,
) -> Result<Json<ClusterStatusSummary>, ApiError> {
    require_user(&headers, &state)?;

    let clusters = state.clusters.read().await;
    let cluster = clusters.get(&id).ok_or_else(ApiError::not_found)?;
    Ok(Json(ClusterStatusSummary {
        id: cluster.id,
        name: cluster.name.clone(),
        status: cluster.status.clone(),
        updated_at: cluster.updated_at.clone(),
    }))
}

fn text_field<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Validate a creation body and build the record it describes.
fn cluster_from_body(id: ClusterId, body: &Value) -> Result<Cluster, ApiError> {
    let body = body
        .as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;

    for field in REQUIRED_FIELDS {
        if text_field(body, field).is_none() {
            return Err(ApiError::bad_request(format!("Missing required field: {field}")));
        }
    }

    let provider = text_field(body, "cloud_provider")
        .and_then(CloudProvider::parse)
        .ok_or_else(|| ApiError::bad_request(r#"cloud_provider must be either "aws" or "azure""#))?;

    let region = text_field(body, "region").unwrap_or_default();
    if !catalog::contains(provider.regions(), region) {
        return Err(ApiError::bad_request(format!("Unsupported region for {provider}: {region}")));
    }

    let instance_type = text_field(body, "instance_type").unwrap_or_default();
    if !catalog::contains(provider.instance_types(), instance_type) {
        return Err(ApiError::bad_request(format!(
            "Unsupported instance type for {provider}: {instance_type}"
        )));
    }

    let kubernetes_version = text_field(body, "kubernetes_version").unwrap_or_default();
    if !catalog::contains(catalog::KUBERNETES_VERSIONS, kubernetes_version) {
        return Err(ApiError::bad_request(format!(
            "Unsupported Kubernetes version: {kubernetes_version}"
        )));
    }

    let node_count = match body.get("node_count") {
        None | Some(Value::Null) => DEFAULT_NODE_COUNT,
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| (MIN_NODE_COUNT..=MAX_NODE_COUNT).contains(n))
            .ok_or_else(|| {
                ApiError::bad_request(format!(
                    "node_count must be between {MIN_NODE_COUNT} and {MAX_NODE_COUNT}"
                ))
            })?,
    };

    let now = chrono::Utc::now().to_rfc3339();
    Ok(Cluster {
        id,
        name: text_field(body, "name").unwrap_or_default().to_string(),
        cloud_provider: provider,
        region: region.to_string(),
        kubernetes_version: kubernetes_version.to_string(),
        node_count,
        instance_type: instance_type.to_string(),
        status: ClusterStatus::Pending,
        cluster_endpoint: None,
        created_at: Some(now.clone()),
        updated_at: Some(now),
    })
}

#[instrument(skip(state, headers, body))]
pub async fn create_cluster_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Cluster>), ApiError> {
    let user = require_user(&headers, &state)?;

    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("Request body must be valid JSON"))?;

    let cluster = {
        // Creation is serialised by the write lock; ids are only consumed by
        // records that pass validation.
        let mut clusters = state.clusters.write().await;
        let cluster = cluster_from_body(state.next_id.load(Ordering::SeqCst), &body)?;
        if clusters.values().any(|c| c.name == cluster.name) {
            return Err(ApiError::new(StatusCode::CONFLICT, "name already exists"));
        }
        state.next_id.fetch_add(1, Ordering::SeqCst);
        clusters.insert(cluster.id, cluster.clone());
        cluster
    };

    info!(
        "User {} requested cluster {} ({} {} x{})",
        user.username, cluster.name, cluster.cloud_provider, cluster.instance_type, cluster.node_count
    );
    provisioner::spawn_apply(state.clone(), cluster.id);

    Ok((StatusCode::CREATED, Json(cluster)))
}

#[instrument(skip(state, headers))]
pub async fn delete_cluster_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<ClusterId>,
) -> Result<Json<Value>, ApiError> {
    let user = require_admin(&headers, &state)?;

    {
        let mut clusters = state.clusters.write().await;
        let cluster = clusters.get_mut(&id).ok_or_else(ApiError::not_found)?;
        if matches!(cluster.status, ClusterStatus::Creating | ClusterStatus::Deleting) {
            return Err(ApiError::bad_request(
                "Cannot delete cluster while it is being created or deleted",
            ));
        }
        provisioner::set_status(cluster, ClusterStatus::Deleting);
    }

    info!("User {} requested deletion of cluster {}", user.username, id);
    provisioner::spawn_destroy(state.clone(), id);

    Ok(Json(json!({ "message": "Cluster deletion initiated" })))
}
