use multik8s_common::catalog::{self, SelectOption, KUBERNETES_VERSIONS};
use multik8s_common::{
    CloudProvider, Cluster, ClusterDraft, ConsoleApi, MAX_NODE_COUNT, MIN_NODE_COUNT,
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create cluster";

/// A value the form refused to take.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Select a cloud provider first")]
    ProviderNotSelected,

    #[error("{value} is not offered for {provider}")]
    NotOffered {
        provider: CloudProvider,
        value: String,
    },

    #[error("Unsupported Kubernetes version: {0}")]
    UnsupportedVersion(String),

    #[error("Node count must be between {MIN_NODE_COUNT} and {MAX_NODE_COUNT}, got {0}")]
    NodeCountOutOfRange(u32),
}

/// The "create cluster" form.
///
/// Region and instance type choices depend on the provider, so picking a
/// provider clears both.
#[derive(Debug, Default)]
pub struct ClusterForm {
    draft: ClusterDraft,
    loading: bool,
    error: Option<String>,
}

impl ClusterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ClusterDraft {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn select_provider(&mut self, provider: CloudProvider) {
        self.draft.cloud_provider = Some(provider);
        self.draft.region.clear();
        self.draft.instance_type.clear();
    }

    /// Empty until a provider is chosen.
    pub fn region_options(&self) -> &'static [SelectOption] {
        self.draft
            .cloud_provider
            .map(|p| p.regions())
            .unwrap_or_default()
    }

    /// Empty until a provider is chosen.
    pub fn instance_type_options(&self) -> &'static [SelectOption] {
        self.draft
            .cloud_provider
            .map(|p| p.instance_types())
            .unwrap_or_default()
    }

    pub fn kubernetes_version_options(&self) -> &'static [SelectOption] {
        KUBERNETES_VERSIONS
    }

    pub fn set_region(&mut self, region: &str) -> Result<(), FieldError> {
        let provider = self.provider()?;
        if !catalog::contains(provider.regions(), region) {
            return Err(FieldError::NotOffered {
                provider,
                value: region.to_string(),
            });
        }
        self.draft.region = region.to_string();
        Ok(())
    }

    pub fn set_instance_type(&mut self, instance_type: &str) -> Result<(), FieldError> {
        let provider = self.provider()?;
        if !catalog::contains(provider.instance_types(), instance_type) {
            return Err(FieldError::NotOffered {
                provider,
                value: instance_type.to_string(),
            });
        }
        self.draft.instance_type = instance_type.to_string();
        Ok(())
    }

    pub fn set_kubernetes_version(&mut self, version: &str) -> Result<(), FieldError> {
        if !catalog::contains(KUBERNETES_VERSIONS, version) {
            return Err(FieldError::UnsupportedVersion(version.to_string()));
        }
        self.draft.kubernetes_version = version.to_string();
        Ok(())
    }

    pub fn set_node_count(&mut self, node_count: u32) -> Result<(), FieldError> {
        if !(MIN_NODE_COUNT..=MAX_NODE_COUNT).contains(&node_count) {
            return Err(FieldError::NodeCountOutOfRange(node_count));
        }
        self.draft.node_count = node_count;
        Ok(())
    }

    fn provider(&self) -> Result<CloudProvider, FieldError> {
        self.draft
            .cloud_provider
            .ok_or(FieldError::ProviderNotSelected)
    }

    /// Start a submission. Returns the payload to post, or `None` while a
    /// request is in flight or a required field is empty.
    pub fn begin_submit(&mut self) -> Option<ClusterDraft> {
        if self.loading {
            return None;
        }
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            self.error = Some(format!(
                "Please fill in all required fields: {}",
                missing.join(", ")
            ));
            return None;
        }

        self.error = None;
        self.loading = true;
        Some(self.draft.clone())
    }

    /// Record the backend's answer. On failure every field keeps its value.
    pub fn finish_submit(&mut self, result: multik8s_common::Result<Cluster>) -> Option<Cluster> {
        self.loading = false;
        match result {
            Ok(cluster) => {
                info!("Created cluster {} ({})", cluster.name, cluster.id);
                Some(cluster)
            }
            Err(err) => {
                warn!("Failed to create cluster {}: {}", self.draft.name, err);
                self.error = Some(err.user_message(CREATE_FAILED_MESSAGE));
                None
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn ConsoleApi) -> Option<Cluster> {
        let draft = self.begin_submit()?;
        debug!("Submitting cluster {}", draft.name);
        let result = api.create_cluster(&draft).await;
        self.finish_submit(result)
    }
}
