//! Text rendering for every view.
//!
//! Functions here are pure: they take view state and return the text to
//! print, so the binary decides when to draw.

use colored::{ColoredString, Colorize};
use comfy_table::{presets, Row, Table};
use multik8s_common::{Cluster, ClusterStatus, User};

use crate::cluster_form::ClusterForm;
use crate::cluster_list::{can_delete, ListSnapshot};
use crate::login::LoginForm;

pub const APP_TITLE: &str = "Multi-Cloud Kubernetes Platform";

pub fn loading(message: &str) -> String {
    format!("⏳ {}", message).dimmed().to_string()
}

/// Red alert line.
pub fn alert(message: &str) -> String {
    format!("✖ {}", message).red().to_string()
}

pub fn login(form: &LoginForm) -> String {
    let mut lines = vec![
        APP_TITLE.bold().to_string(),
        "Sign in to manage your Kubernetes clusters".to_string(),
    ];
    if let Some(error) = form.error() {
        lines.push(alert(error));
    }
    if form.is_submitting() {
        lines.push(loading("Signing in..."));
    }
    lines.join("\n")
}

pub fn header(user: &User) -> String {
    let welcome = format!("Welcome back, {} ({})", user.username, user.role);
    format!("☸  {}\n{}", APP_TITLE.bold(), welcome.dimmed())
}

/// Color for a lifecycle label. Unknown labels look like `pending`.
pub fn status_badge(status: &ClusterStatus) -> ColoredString {
    let label = format!("[{}]", status.as_str());
    match status {
        ClusterStatus::Creating => label.blue(),
        ClusterStatus::Running => label.green(),
        ClusterStatus::Failed => label.red(),
        ClusterStatus::Deleting => label.truecolor(255, 140, 0),
        ClusterStatus::Deleted => label.dimmed(),
        ClusterStatus::Pending | ClusterStatus::Other(_) => label.yellow(),
    }
}

/// `Created 3/5/2024`, or nothing when the timestamp is missing or unparseable.
pub fn created_line(cluster: &Cluster) -> Option<String> {
    cluster
        .created_on()
        .map(|day| format!("Created {}", day.format("%-m/%-d/%Y")))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn cluster_card(cluster: &Cluster, deletable: bool) -> String {
    let mut lines = vec![
        format!(
            "{} {} {}  {}",
            format!("#{}", cluster.id).dimmed(),
            cluster.cloud_provider.icon(),
            cluster.name.bold(),
            status_badge(&cluster.status)
        ),
        format!("   📍 {}", cluster.region),
    ];

    let mut table = Table::new();
    table.add_row(Row::from(["Provider".to_string(), capitalize(cluster.cloud_provider.as_str())]));
    table.add_row(Row::from(["K8s Version".to_string(), cluster.kubernetes_version.clone()]));
    table.add_row(Row::from(["Nodes".to_string(), cluster.node_count.to_string()]));
    table.add_row(Row::from(["Instance".to_string(), cluster.instance_type.clone()]));
    table.load_preset(presets::NOTHING);
    lines.extend(table.to_string().lines().map(|line| format!("  {}", line)));

    if let Some(created) = created_line(cluster) {
        lines.push(format!("   📅 {}", created));
    }
    if let Some(endpoint) = &cluster.cluster_endpoint {
        lines.push(format!("   🔗 View Cluster: {}", endpoint.underline()));
    }
    if deletable {
        lines.push(format!(
            "   🗑  Delete Cluster: {}",
            format!("delete {}", cluster.id).cyan()
        ));
    }
    lines.join("\n")
}

fn empty_state() -> String {
    [
        "☁  No clusters yet".bold().to_string(),
        "Create your first Kubernetes cluster to get started".to_string(),
        format!("[Create Your First Cluster] {}", "create".cyan()),
    ]
    .join("\n")
}

/// The dashboard as `user` sees it.
pub fn cluster_list(user: &User, snapshot: &ListSnapshot) -> String {
    let mut sections = vec![header(user)];

    if snapshot.loading {
        sections.push(loading("Loading clusters..."));
        return sections.join("\n\n");
    }

    sections.push(format!(
        "{}  [+ Create Cluster] {}",
        format!("Your Clusters ({})", snapshot.clusters.len()).bold(),
        "create".cyan()
    ));

    if let Some(error) = &snapshot.error {
        sections.push(alert(error));
    }

    if snapshot.clusters.is_empty() {
        sections.push(empty_state());
    } else {
        sections.extend(
            snapshot
                .clusters
                .iter()
                .map(|cluster| cluster_card(cluster, can_delete(user, cluster))),
        );
    }
    sections.join("\n\n")
}

/// Summary of what the form will submit.
pub fn cluster_form(form: &ClusterForm) -> String {
    let draft = form.draft();
    // Cell text stays uncolored so the table can measure it.
    let unset = || "-".to_string();
    let field = |value: &str| {
        if value.is_empty() {
            unset()
        } else {
            value.to_string()
        }
    };

    let mut table = Table::new();
    table.add_row(Row::from(["Cluster Name".to_string(), field(&draft.name)]));
    table.add_row(Row::from([
        "Cloud Provider".to_string(),
        draft
            .cloud_provider
            .map(|p| format!("{} {}", p.icon(), p.label()))
            .unwrap_or_else(unset),
    ]));
    table.add_row(Row::from(["Region".to_string(), field(&draft.region)]));
    table.add_row(Row::from([
        "Kubernetes Version".to_string(),
        field(&draft.kubernetes_version),
    ]));
    table.add_row(Row::from(["Node Count".to_string(), draft.node_count.to_string()]));
    table.add_row(Row::from(["Instance Type".to_string(), field(&draft.instance_type)]));
    table.load_preset(presets::NOTHING);

    let mut lines = vec!["Create New Cluster".bold().to_string(), table.to_string()];
    if let Some(error) = form.error() {
        lines.push(alert(error));
    }
    if form.is_loading() {
        lines.push(loading("Creating Cluster..."));
    }
    lines.join("\n")
}
