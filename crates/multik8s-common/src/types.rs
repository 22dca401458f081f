use std::fmt::{self, Display};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, SelectOption};

pub type ClusterId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    // The reference backend calls non-admins "user"
    #[serde(alias = "user")]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `GET /api/auth/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl AuthStatus {
    /// The signed-in user, only when the backend says the session is live.
    pub fn into_user(self) -> Option<User> {
        if self.authenticated {
            self.user
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
}

impl CloudProvider {
    pub const ALL: [CloudProvider; 2] = [CloudProvider::Aws, CloudProvider::Azure];

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "Amazon Web Services (AWS)",
            CloudProvider::Azure => "Microsoft Azure",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "🟠",
            CloudProvider::Azure => "🔵",
        }
    }

    pub fn regions(&self) -> &'static [SelectOption] {
        match self {
            CloudProvider::Aws => catalog::AWS_REGIONS,
            CloudProvider::Azure => catalog::AZURE_REGIONS,
        }
    }

    /// EC2 instance types for AWS, VM sizes for Azure.
    pub fn instance_types(&self) -> &'static [SelectOption] {
        match self {
            CloudProvider::Aws => catalog::AWS_INSTANCE_TYPES,
            CloudProvider::Azure => catalog::AZURE_VM_SIZES,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aws" => Some(CloudProvider::Aws),
            "azure" => Some(CloudProvider::Azure),
            _ => None,
        }
    }
}

impl Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle label owned by the backend.
///
/// Unknown labels are kept verbatim so they can still be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClusterStatus {
    Pending,
    Creating,
    Running,
    Failed,
    Deleting,
    Deleted,
    Other(String),
}

impl ClusterStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClusterStatus::Pending => "pending",
            ClusterStatus::Creating => "creating",
            ClusterStatus::Running => "running",
            ClusterStatus::Failed => "failed",
            ClusterStatus::Deleting => "deleting",
            ClusterStatus::Deleted => "deleted",
            ClusterStatus::Other(label) => label,
        }
    }

    /// Deleting or already deleted.
    pub fn is_terminating(&self) -> bool {
        matches!(self, ClusterStatus::Deleting | ClusterStatus::Deleted)
    }
}

impl From<String> for ClusterStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ClusterStatus::Pending,
            "creating" => ClusterStatus::Creating,
            "running" => ClusterStatus::Running,
            "failed" => ClusterStatus::Failed,
            "deleting" => ClusterStatus::Deleting,
            "deleted" => ClusterStatus::Deleted,
            _ => ClusterStatus::Other(value),
        }
    }
}

impl From<ClusterStatus> for String {
    fn from(status: ClusterStatus) -> Self {
        match status {
            ClusterStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
    pub cloud_provider: CloudProvider,
    pub region: String,
    pub kubernetes_version: String,
    pub node_count: u32,
    pub instance_type: String,
    pub status: ClusterStatus,
    #[serde(default)]
    pub cluster_endpoint: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Cluster {
    /// Calendar day the cluster was created, if the backend sent a parseable
    /// timestamp. Naive timestamps are taken as UTC.
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(|ts| ts.date_naive())
    }
}

/// Accepts RFC 3339 as well as the offset-less ISO form some backends emit.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Body of `GET /api/clusters/:id/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatusSummary {
    pub id: ClusterId,
    pub name: String,
    pub status: ClusterStatus,
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub const DEFAULT_NODE_COUNT: u32 = 2;
pub const MIN_NODE_COUNT: u32 = 1;
pub const MAX_NODE_COUNT: u32 = 10;

/// Creation payload, posted as-is to `POST /api/clusters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDraft {
    pub name: String,
    pub cloud_provider: Option<CloudProvider>,
    pub region: String,
    pub kubernetes_version: String,
    pub node_count: u32,
    pub instance_type: String,
}

impl Default for ClusterDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            cloud_provider: None,
            region: String::new(),
            kubernetes_version: String::new(),
            node_count: DEFAULT_NODE_COUNT,
            instance_type: String::new(),
        }
    }
}

impl ClusterDraft {
    /// Names of the required fields that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.cloud_provider.is_none() {
            missing.push("cloud_provider");
        }
        if self.region.is_empty() {
            missing.push("region");
        }
        if self.kubernetes_version.is_empty() {
            missing.push("kubernetes_version");
        }
        if self.instance_type.is_empty() {
            missing.push("instance_type");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_accepts_user_alias() {
        let user: User = serde_json::from_value(json!({"username": "bob", "role": "user"})).unwrap();
        assert_eq!(user.role, Role::Member);
        assert!(!user.is_admin());

        let admin: User = serde_json::from_value(json!({"username": "alice", "role": "admin"})).unwrap();
        assert!(admin.is_admin());
        assert_eq!(serde_json::to_value(&admin).unwrap()["role"], "admin");
    }

    #[test]
    fn test_auth_status_without_user() {
        let status: AuthStatus = serde_json::from_value(json!({"authenticated": false})).unwrap();
        assert!(!status.authenticated);
        assert_eq!(status.into_user(), None);

        let stale = AuthStatus {
            authenticated: false,
            user: Some(User {
                username: "alice".to_string(),
                role: Role::Admin,
            }),
        };
        assert_eq!(stale.into_user(), None);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: ClusterStatus = serde_json::from_value(json!("upgrading")).unwrap();
        assert_eq!(status, ClusterStatus::Other("upgrading".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("upgrading"));

        let running: ClusterStatus = serde_json::from_value(json!("running")).unwrap();
        assert_eq!(running, ClusterStatus::Running);
        assert!(!running.is_terminating());
        assert!(ClusterStatus::Deleting.is_terminating());
        assert!(ClusterStatus::Deleted.is_terminating());
    }

    #[test]
    fn test_cluster_from_backend_payload() {
        let cluster: Cluster = serde_json::from_value(json!({
            "id": 7,
            "name": "prod-eks",
            "cloud_provider": "aws",
            "region": "us-east-1",
            "kubernetes_version": "1.29",
            "node_count": 3,
            "instance_type": "m5.large",
            "status": "running",
            "created_at": "2024-03-05T14:22:10.123456",
            "updated_at": null,
            "cluster_endpoint": "https://prod-eks.example.com"
        }))
        .unwrap();

        assert_eq!(cluster.cloud_provider, CloudProvider::Aws);
        assert_eq!(cluster.created_on(), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(cluster.updated_at, None);
        assert_eq!(cluster.cluster_endpoint.as_deref(), Some("https://prod-eks.example.com"));
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let ts = parse_timestamp("2024-12-31T23:30:00-02:00").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_draft_missing_fields() {
        let mut draft = ClusterDraft::default();
        assert_eq!(draft.node_count, DEFAULT_NODE_COUNT);
        assert_eq!(
            draft.missing_fields(),
            vec!["name", "cloud_provider", "region", "kubernetes_version", "instance_type"]
        );

        draft.name = "dev".to_string();
        draft.cloud_provider = Some(CloudProvider::Azure);
        draft.region = "eastus".to_string();
        draft.kubernetes_version = "1.30".to_string();
        draft.instance_type = "Standard_DS2_v2".to_string();
        assert!(draft.missing_fields().is_empty());

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["cloud_provider"], "azure");
        assert_eq!(body["node_count"], 2);
    }
}
