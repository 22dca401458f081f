//! Interactive screens. Each one owns its view state while it is shown.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{self, eyre};
use colored::Colorize;
use dialoguer::console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use multik8s_common::catalog::SelectOption;
use multik8s_common::{
    CloudProvider, Cluster, ConsoleApi, User, MAX_NODE_COUNT, MIN_NODE_COUNT,
};
use multik8s_console_lib::{
    render, ClusterForm, ClusterList, DeleteOutcome, LoginForm, Prompt,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::commands::{ListCommand, HELP};

/// Why the cluster list screen was left.
pub enum ListExit {
    CreateCluster,
    Logout,
    Quit,
}

pub async fn login(api: &dyn ConsoleApi) -> eyre::Result<User> {
    let theme = ColorfulTheme::default();
    let mut form = LoginForm::new();

    loop {
        println!("\n{}", render::login(&form));
        form.username = Input::<String>::with_theme(&theme)
            .with_prompt("Username")
            .with_initial_text(form.username.clone())
            .allow_empty(true)
            .interact_text()?;
        form.password = Password::with_theme(&theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?;

        let Some(credentials) = form.begin_submit() else {
            continue;
        };
        println!("{}", render::login(&form));
        let result = api.login(&credentials).await;
        if let Some(user) = form.finish_submit(result) {
            return Ok(user);
        }
    }
}

pub async fn cluster_list(
    api: Arc<dyn ConsoleApi>,
    user: User,
    poll_interval: Duration,
    prompt: &dyn Prompt,
) -> eyre::Result<ListExit> {
    let mut list = ClusterList::new(api.clone(), user, poll_interval);
    let mut changes = list.subscribe();
    list.mount();

    draw_list(&list).await?;
    let mut input = read_command_line();
    loop {
        let line = match next_event(&mut changes, &mut input).await? {
            ListEvent::Changed => {
                draw_list(&list).await?;
                continue;
            }
            ListEvent::Line(line) => line,
        };

        match line.trim().parse::<ListCommand>() {
            Ok(ListCommand::Redraw) => {}
            Ok(ListCommand::Refresh) => list.refresh().await,
            Ok(ListCommand::Create) => return Ok(ListExit::CreateCluster),
            Ok(ListCommand::Show(id)) => match api.get_cluster(id).await {
                Ok(cluster) => {
                    println!("\n{}", render::cluster_card(&cluster, list.can_delete(&cluster)))
                }
                Err(err) => prompt.alert(&err.user_message("Cluster not found")),
            },
            Ok(ListCommand::Delete(id)) => {
                if list.delete(id, prompt).await == DeleteOutcome::NotPermitted {
                    prompt.alert(&format!("Cluster {} cannot be deleted", id));
                }
            }
            Ok(ListCommand::Logout) => {
                list.logout().await;
                return Ok(ListExit::Logout);
            }
            Ok(ListCommand::Quit) => return Ok(ListExit::Quit),
            Err(err) => prompt.alert(&err.to_string()),
        }

        // Revisions that landed while the command ran are covered by this draw.
        changes.mark_unchanged();
        draw_list(&list).await?;
        input = read_command_line();
    }
}

/// What woke the cluster list screen up.
#[derive(Debug, PartialEq, Eq)]
enum ListEvent {
    /// A fetch result was applied; the cards are out of date.
    Changed,
    Line(String),
}

type PendingLine = JoinHandle<io::Result<String>>;

/// Reads one line from the terminal off the runtime. A blocking read cannot
/// be cancelled, so the screen only leaves once the handle has resolved.
fn read_command_line() -> PendingLine {
    tokio::task::spawn_blocking(|| Term::stdout().read_line())
}

/// Waits for either a new list revision or the pending command line. The
/// pending read survives a `Changed` result and is polled again next time.
async fn next_event(
    changes: &mut watch::Receiver<u64>,
    input: &mut PendingLine,
) -> eyre::Result<ListEvent> {
    tokio::select! {
        line = &mut *input => Ok(ListEvent::Line(line??)),
        Ok(()) = changes.changed() => Ok(ListEvent::Changed),
    }
}

async fn draw_list(list: &ClusterList) -> eyre::Result<()> {
    println!("\n{}", render::cluster_list(list.user(), &list.snapshot().await));
    println!("{}", HELP.dimmed());
    print!("{} ", "multik8s ›".bold());
    io::stdout().flush()?;
    Ok(())
}

fn pick(
    theme: &ColorfulTheme,
    prompt: &str,
    options: &'static [SelectOption],
    current: &str,
) -> eyre::Result<&'static str> {
    let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
    let default = options.iter().position(|o| o.value == current).unwrap_or(0);
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;
    options
        .get(index)
        .map(|o| o.value)
        .ok_or_else(|| eyre!("No {} options available", prompt))
}

/// Walk through the creation form. Returns the new cluster, or `None` when
/// the user cancels.
pub async fn cluster_form(api: &dyn ConsoleApi) -> eyre::Result<Option<Cluster>> {
    let theme = ColorfulTheme::default();
    let mut form = ClusterForm::new();

    loop {
        println!("\n{}", render::cluster_form(&form));

        let name = Input::<String>::with_theme(&theme)
            .with_prompt("Cluster Name")
            .with_initial_text(form.draft().name.clone())
            .interact_text()?;
        form.set_name(name.trim());

        let providers = CloudProvider::ALL;
        let labels: Vec<String> = providers
            .iter()
            .map(|p| format!("{} {}", p.icon(), p.label()))
            .collect();
        let current = form
            .draft()
            .cloud_provider
            .and_then(|c| providers.iter().position(|p| *p == c))
            .unwrap_or(0);
        let index = Select::with_theme(&theme)
            .with_prompt("Cloud Provider")
            .items(&labels)
            .default(current)
            .interact()?;
        let provider = providers[index.min(providers.len() - 1)];
        if form.draft().cloud_provider != Some(provider) {
            form.select_provider(provider);
        }

        let region = pick(&theme, "Region", form.region_options(), &form.draft().region)?;
        form.set_region(region)?;

        let version = pick(
            &theme,
            "Kubernetes Version",
            form.kubernetes_version_options(),
            &form.draft().kubernetes_version,
        )?;
        form.set_kubernetes_version(version)?;

        let node_count = Input::<u32>::with_theme(&theme)
            .with_prompt("Node Count")
            .default(form.draft().node_count)
            .validate_with(|n: &u32| {
                if (MIN_NODE_COUNT..=MAX_NODE_COUNT).contains(n) {
                    Ok(())
                } else {
                    Err(format!(
                        "Enter a number between {} and {}",
                        MIN_NODE_COUNT, MAX_NODE_COUNT
                    ))
                }
            })
            .interact_text()?;
        form.set_node_count(node_count)?;

        let instance_type = pick(
            &theme,
            "Instance Type",
            form.instance_type_options(),
            &form.draft().instance_type,
        )?;
        form.set_instance_type(instance_type)?;

        println!("\n{}", render::cluster_form(&form));
        let action = Select::with_theme(&theme)
            .items(&["Create Cluster", "Edit", "Cancel"])
            .default(0)
            .interact()?;
        match action {
            1 => continue,
            2 => return Ok(None),
            _ => {}
        }

        let Some(draft) = form.begin_submit() else {
            continue;
        };
        println!("{}", render::cluster_form(&form));
        let result = api.create_cluster(&draft).await;
        if let Some(cluster) = form.finish_submit(result) {
            return Ok(Some(cluster));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn typed_line() -> (oneshot::Sender<String>, PendingLine) {
        let (tx, rx) = oneshot::channel::<String>();
        let input = tokio::spawn(async move {
            rx.await
                .map_err(|_| io::Error::from(io::ErrorKind::UnexpectedEof))
        });
        (tx, input)
    }

    #[tokio::test]
    async fn test_revisions_redraw_while_waiting_for_a_command() {
        let (revision, mut changes) = watch::channel(0u64);
        let (typed, mut input) = typed_line();

        for _ in 0..3 {
            revision.send_modify(|rev| *rev += 1);
            let event = next_event(&mut changes, &mut input).await.unwrap();
            assert_eq!(event, ListEvent::Changed);
        }
        assert!(!input.is_finished());

        typed.send("refresh".to_string()).unwrap();
        let event = next_event(&mut changes, &mut input).await.unwrap();
        assert_eq!(event, ListEvent::Line("refresh".to_string()));
    }

    #[tokio::test]
    async fn test_closed_revision_channel_still_reads_commands() {
        let (revision, mut changes) = watch::channel(0u64);
        let (typed, mut input) = typed_line();
        drop(revision);

        typed.send("quit".to_string()).unwrap();
        let event = next_event(&mut changes, &mut input).await.unwrap();
        assert_eq!(event, ListEvent::Line("quit".to_string()));
    }

    #[tokio::test]
    async fn test_closed_terminal_ends_the_screen() {
        let (_revision, mut changes) = watch::channel(0u64);
        let (typed, mut input) = typed_line();
        drop(typed);

        assert!(next_event(&mut changes, &mut input).await.is_err());
    }
}
