// Simulated provisioning: walks a record through the lifecycle the real
// backend reports while Terraform runs.

use multik8s_common::{Cluster, ClusterId, ClusterStatus};
use tracing::debug;

use crate::AppState;

pub(crate) fn set_status(cluster: &mut Cluster, status: ClusterStatus) {
    cluster.status = status;
    cluster.updated_at = Some(chrono::Utc::now().to_rfc3339());
}

/// Move `id` from `from` to `to` after one provisioning step. Returns false
/// when the record is gone or somebody else changed its status meanwhile.
async fn advance(state: &AppState, id: ClusterId, from: ClusterStatus, to: ClusterStatus) -> bool {
    tokio::time::sleep(state.provision_step).await;

    let mut clusters = state.clusters.write().await;
    let Some(cluster) = clusters.get_mut(&id) else {
        return false;
    };
    if cluster.status != from {
        debug!("Cluster {} left {} before the step completed", id, from);
        return false;
    }

    debug!("Cluster {}: {} -> {}", id, from, to);
    if to == ClusterStatus::Running {
        cluster.cluster_endpoint = Some(format!(
            "https://{}.{}.k8s.local",
            cluster.name, cluster.region
        ));
    }
    set_status(cluster, to);
    true
}

/// pending -> creating -> running
pub(crate) fn spawn_apply(state: AppState, id: ClusterId) {
    tokio::spawn(async move {
        if advance(&state, id, ClusterStatus::Pending, ClusterStatus::Creating).await {
            advance(&state, id, ClusterStatus::Creating, ClusterStatus::Running).await;
        }
    });
}

/// deleting -> deleted
pub(crate) fn spawn_destroy(state: AppState, id: ClusterId) {
    tokio::spawn(async move {
        advance(&state, id, ClusterStatus::Deleting, ClusterStatus::Deleted).await;
    });
}
