#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use multik8s_common::{
    AuthStatus, CloudProvider, Cluster, ClusterDraft, ClusterId, ClusterStatus, ConsoleApi,
    ConsoleError, Credentials, Result, Role, User,
};
use multik8s_console_lib::Prompt;

/// One recorded call against [`FakeApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AuthStatus,
    Login(Credentials),
    Logout,
    ListClusters,
    GetCluster(ClusterId),
    CreateCluster(ClusterDraft),
    DeleteCluster(ClusterId),
}

struct ScriptedList {
    delay: Duration,
    result: Result<Vec<Cluster>>,
}

struct FakeState {
    calls: Vec<Call>,
    auth: Result<AuthStatus>,
    login: Result<User>,
    clusters: Vec<Cluster>,
    scripted_lists: VecDeque<ScriptedList>,
    create: Option<Result<Cluster>>,
    delete: Result<()>,
}

/// Scripted [`ConsoleApi`] that records every call.
///
/// List calls return the queued scripted responses first, then the current
/// cluster set.
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                auth: Ok(AuthStatus {
                    authenticated: false,
                    user: None,
                }),
                login: Err(server_error(401, "Invalid credentials")),
                clusters: Vec::new(),
                scripted_lists: VecDeque::new(),
                create: None,
                delete: Ok(()),
            }),
        })
    }

    fn with_state(&self, f: impl FnOnce(&mut FakeState)) {
        let mut state = self.state.lock().unwrap();
        f(&mut state);
    }

    pub fn set_auth(&self, auth: Result<AuthStatus>) {
        self.with_state(|s| s.auth = auth);
    }

    pub fn set_login(&self, login: Result<User>) {
        self.with_state(|s| s.login = login);
    }

    pub fn set_clusters(&self, clusters: Vec<Cluster>) {
        self.with_state(|s| s.clusters = clusters);
    }

    pub fn push_list(&self, delay: Duration, result: Result<Vec<Cluster>>) {
        self.with_state(|s| s.scripted_lists.push_back(ScriptedList { delay, result }));
    }

    pub fn set_create(&self, create: Result<Cluster>) {
        self.with_state(|s| s.create = Some(create));
    }

    pub fn set_delete(&self, delete: Result<()>) {
        self.with_state(|s| s.delete = delete);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matcher(c)).count()
    }

    pub fn list_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::ListClusters))
    }

    fn record(&self, call: Call) {
        self.with_state(|s| s.calls.push(call));
    }
}

#[async_trait]
impl ConsoleApi for FakeApi {
    async fn auth_status(&self) -> Result<AuthStatus> {
        self.record(Call::AuthStatus);
        self.state.lock().unwrap().auth.clone()
    }

    async fn login(&self, credentials: &Credentials) -> Result<User> {
        self.record(Call::Login(credentials.clone()));
        self.state.lock().unwrap().login.clone()
    }

    async fn logout(&self) -> Result<()> {
        self.record(Call::Logout);
        Ok(())
    }

    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        self.record(Call::ListClusters);
        let scripted = {
            let mut state = self.state.lock().unwrap();
            match state.scripted_lists.pop_front() {
                Some(scripted) => scripted,
                None => ScriptedList {
                    delay: Duration::ZERO,
                    result: Ok(state.clusters.clone()),
                },
            }
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.result
    }

    async fn get_cluster(&self, id: ClusterId) -> Result<Cluster> {
        self.record(Call::GetCluster(id));
        let state = self.state.lock().unwrap();
        state
            .clusters
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| server_error(404, "Cluster not found"))
    }

    async fn create_cluster(&self, draft: &ClusterDraft) -> Result<Cluster> {
        self.record(Call::CreateCluster(draft.clone()));
        let state = self.state.lock().unwrap();
        match &state.create {
            Some(result) => result.clone(),
            None => Ok(Cluster {
                id: 100,
                name: draft.name.clone(),
                cloud_provider: draft.cloud_provider.unwrap_or(CloudProvider::Aws),
                region: draft.region.clone(),
                kubernetes_version: draft.kubernetes_version.clone(),
                node_count: draft.node_count,
                instance_type: draft.instance_type.clone(),
                status: ClusterStatus::Pending,
                cluster_endpoint: None,
                created_at: None,
                updated_at: None,
            }),
        }
    }

    async fn delete_cluster(&self, id: ClusterId) -> Result<()> {
        self.record(Call::DeleteCluster(id));
        self.state.lock().unwrap().delete.clone()
    }
}

/// Prompt with a fixed answer that remembers what it was shown.
pub struct ScriptedPrompt {
    answer: bool,
    pub confirmations: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirmations: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().unwrap().push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

pub fn server_error(status: u16, message: &str) -> ConsoleError {
    ConsoleError::Server {
        status,
        message: Some(message.to_string()),
    }
}

pub fn admin() -> User {
    User {
        username: "alice".to_string(),
        role: Role::Admin,
    }
}

pub fn member() -> User {
    User {
        username: "bob".to_string(),
        role: Role::Member,
    }
}

pub fn cluster(id: ClusterId, name: &str, status: ClusterStatus) -> Cluster {
    Cluster {
        id,
        name: name.to_string(),
        cloud_provider: CloudProvider::Aws,
        region: "us-east-1".to_string(),
        kubernetes_version: "1.29".to_string(),
        node_count: 3,
        instance_type: "m5.large".to_string(),
        status,
        cluster_endpoint: None,
        created_at: Some("2024-03-05T10:00:00Z".to_string()),
        updated_at: None,
    }
}
