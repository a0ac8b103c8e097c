//! CLI transport: the interactive dashboard plus one-shot commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{settings::Style, Table, Tabled};
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError, BackendError, ConstraintRecord, PolicyApi, ViolationState};
use crate::config::Config;
use crate::tui::{restore_terminal, setup_terminal, TuiController, TuiRenderer};
use crate::ui_backend::{AppService, Route, ServiceOptions, SharedState, CONSTRAINTS_ENTITY};

/// Output format of `gpm list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn build_client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(&config.api.base_url, config.api.timeout())
        .with_context(|| format!("Invalid API URL '{}'", config.api.base_url))
}

/// Resolve the start route and deep-link anchor.
///
/// `location` is a path with an optional `#fragment`; an explicit anchor
/// wins over the fragment. Unknown paths fall back to the constraints route.
pub fn resolve_start(location: &str, anchor: Option<String>) -> (Route, Option<String>) {
    let (route, fragment) = Route::parse(location).unwrap_or_else(|| {
        tracing::warn!("Unknown route '{}', showing constraints", location);
        (Route::Constraints, None)
    });
    let anchor = anchor
        .map(|a| a.trim_start_matches('#').to_string())
        .filter(|a| !a.is_empty())
        .or(fragment);
    (route, anchor)
}

/// Build the shared state the dashboard starts from
pub fn initial_state(config: &Config, client: &ApiClient, route: Route) -> SharedState {
    let state = SharedState::new();
    state.set_route(route);
    state.set_theme(config.ui.theme);
    state.set_auth_enabled(config.api.auth_enabled);
    state.set_api_base(client.base_url().to_string());
    state.set_report_url(client.report_url().ok().map(|u| u.to_string()));
    state.set_current_context(config.contexts.current.clone());
    state.set_contexts(config.contexts.available.clone());
    state
}

/// Run the interactive dashboard
pub async fn run_dashboard(
    config: &Config,
    route: Option<String>,
    anchor: Option<String>,
) -> Result<()> {
    let client = build_client(config)?;
    let location = route.unwrap_or_else(|| config.ui.start_route.clone());
    let (route, anchor) = resolve_start(&location, anchor);
    tracing::info!(
        "Starting dashboard against {} (route {}, anchor {:?})",
        client.base_url(),
        route.path(),
        anchor
    );

    let state = initial_state(config, &client, route);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let options = ServiceOptions {
        visibility_policy: config.ui.visibility_policy,
        anchor,
        logout_reload_delay: config.ui.logout_reload_delay(),
    };
    let service = AppService::new(Arc::new(client), state, event_tx, options);

    let terminal = setup_terminal()?;
    let renderer = TuiRenderer::new(terminal)
        .with_sidebar_width(config.ui.sidebar_width)
        .with_tick_rate(config.ui.tick_rate());
    let mut controller = TuiController::new(service, renderer, event_rx);

    let result = controller.run().await;
    restore_terminal(controller.renderer_mut().terminal_mut());
    result
}

fn report_failure(error: &ApiError, entity: &str) -> anyhow::Error {
    let normalized: BackendError = error.to_backend_error(entity);
    eprintln!("{} {}", "✗".red(), normalized.error.bold());
    if !normalized.description.is_empty() {
        eprintln!("  {}", normalized.description);
    }
    if !normalized.action.is_empty() {
        eprintln!("  {}", normalized.action.yellow());
    }
    anyhow::anyhow!("{}", normalized.error)
}

#[derive(Tabled)]
struct ConstraintRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Template")]
    kind: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Violations")]
    violations: String,
    #[tabled(rename = "Enforced")]
    enforced: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl ConstraintRow {
    fn from_record(record: &ConstraintRecord) -> Self {
        let violations = match record.violation_state() {
            ViolationState::Unknown => "?".to_string(),
            ViolationState::None => "0".to_string(),
            state @ ViolationState::Present { total, shown } => {
                if state.is_truncated() {
                    format!("{} ({} shown)", total, shown)
                } else {
                    total.to_string()
                }
            }
        };
        let pods = &record.status.by_pod;
        let enforced = if pods.is_empty() {
            "-".to_string()
        } else {
            format!("{}/{}", pods.iter().filter(|p| p.enforced).count(), pods.len())
        };
        Self {
            name: record.name().to_string(),
            kind: record.kind.clone(),
            mode: record
                .enforcement_mode()
                .map(|m| m.label().to_string())
                .unwrap_or_else(|| "?".to_string()),
            violations,
            enforced,
            created: record
                .metadata
                .creation_timestamp
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

/// Render RFC 3339 timestamps as `YYYY-MM-DD HH:MM`; other text is kept
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Table of constraints as printed by `gpm list`
pub fn constraints_table(records: &[ConstraintRecord]) -> String {
    let rows: Vec<ConstraintRow> = records.iter().map(ConstraintRow::from_record).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Print the constraints of `context`
pub async fn run_list(config: &Config, format: OutputFormat) -> Result<()> {
    let client = build_client(config)?;
    let context = &config.contexts.current;
    let records = client
        .list_constraints(context)
        .await
        .map_err(|e| report_failure(&e, CONSTRAINTS_ENTITY))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Table => {
            let title = if context.is_empty() {
                "=== CONSTRAINTS ===".to_string()
            } else {
                format!("=== CONSTRAINTS ({}) ===", context)
            };
            println!("\n{}\n", title.bold().cyan());
            if records.is_empty() {
                println!("No constraints found.");
            } else {
                println!("{}", constraints_table(&records));
                let violating = records.iter().filter(|r| r.badge() > 0).count();
                let summary = format!(
                    "{} constraints, {} with violations",
                    records.len(),
                    violating
                );
                if violating > 0 {
                    println!("{}", summary.red());
                } else {
                    println!("{}", summary.green());
                }
            }
        }
    }
    Ok(())
}

/// Default file name of a downloaded report
pub fn default_report_path() -> PathBuf {
    PathBuf::from(format!(
        "gpm-violations-{}.html",
        Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

/// Download the HTML violations report
pub async fn run_report(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let client = build_client(config)?;
    let html = client
        .download_report()
        .await
        .map_err(|e| report_failure(&e, "violations report"))?;
    let path = output.unwrap_or_else(default_report_path);
    write_report(&path, &html)?;
    println!(
        "{} Report saved to {}",
        "✓".green(),
        path.display().to_string().bold()
    );
    Ok(())
}

fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
}

/// End the backend session
pub async fn run_logout(config: &Config) -> Result<()> {
    let client = build_client(config)?;
    match client.logout().await {
        Ok(()) => {
            println!("{} Logged out", "✓".green());
            Ok(())
        }
        Err(e) => Err(report_failure(&e, "logout")),
    }
}

/// List the cluster contexts the backend can reach
pub async fn run_contexts(config: &Config) -> Result<()> {
    let client = build_client(config)?;
    let contexts = match client.list_contexts().await {
        Ok(contexts) => contexts,
        Err(e) if !config.contexts.available.is_empty() => {
            tracing::warn!("Could not list contexts, using configured ones: {}", e);
            config.contexts.available.clone()
        }
        Err(e) => return Err(report_failure(&e, "contexts")),
    };

    if contexts.is_empty() {
        println!("No contexts (in-cluster mode)");
    }
    for context in contexts {
        if context == config.contexts.current {
            println!("{} {}", "*".green(), context.bold());
        } else {
            println!("  {}", context);
        }
    }
    Ok(())
}
