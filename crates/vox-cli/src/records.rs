//! # Record Subcommands
//!
//! - `list` -- Filtered listing of one collection.
//! - `set-status` -- Optimistic status change.
//! - `notes` -- Replace a record's notes.
//! - `extend-trial`, `change-tier`, `approve-tier` -- Feature actions.
//! - `create-incident` -- Validate and create an incident.
//!
//! Mutations load the collection first; the controller only acts on
//! records it holds.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use vox_client::RecordApi;
use vox_console::{Console, ConsoleError, RecordController};
use vox_core::RecordId;
use vox_records::{Annotated, IncidentDraft, Record, RecordFilter, Tier};

use crate::{print_notices, EXIT_INVALID};

/// The admin features with record lists.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Disputes,
    Incidents,
    Trials,
    Tiers,
    Customers,
    Compliance,
}

/// Search and dropdown filters for `vox list`.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    pub collection: Collection,

    /// Case-insensitive substring matched against ids, names and titles.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Status wire name, or `all`.
    #[arg(long, default_value = "all")]
    pub status: String,

    /// Priority wire name, or `all`.
    #[arg(long, default_value = "all")]
    pub priority: String,

    /// Print full records as JSON instead of one line each.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SetStatusArgs {
    pub collection: Collection,
    pub id: String,
    /// Target status wire name, e.g. `resolved`.
    pub status: String,
    /// Note attached to the timeline entry.
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct NotesArgs {
    pub collection: Collection,
    pub id: String,
    /// New notes; an empty string clears them.
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct ExtendTrialArgs {
    pub id: String,
    #[arg(long)]
    pub days: u32,
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ChangeTierArgs {
    pub id: String,
    /// Tier wire name: free, starter, pro or enterprise.
    pub tier: String,
}

#[derive(Args, Debug, Clone)]
pub struct CreateIncidentArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub severity: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Initial status; `open` when omitted.
    #[arg(long, default_value = "")]
    pub status: String,
    /// Affected service; repeatable.
    #[arg(long = "service")]
    pub services: Vec<String>,
    #[arg(long)]
    pub assignee: Option<String>,
}

/// One display line: id, status, priority and the first descriptive field.
pub fn format_row<R: Record>(record: &R) -> String {
    let priority = record
        .priority()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let summary = record.search_fields().get(1).copied().unwrap_or_default();
    format!(
        "{:<12} {:<14} {:<9} {}",
        record.id().as_str(),
        record.status().to_string(),
        priority,
        summary
    )
}

async fn list<R: Record, A: RecordApi<R>>(ctl: &RecordController<R, A>, args: &ListArgs) -> Result<u8> {
    ctl.load().await?;
    let filter = RecordFilter {
        search: args.search.clone(),
        status: args.status.parse()?,
        priority: args.priority.parse()?,
    };
    let rows = ctl.view(&filter);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for record in &rows {
            println!("{}", format_row(record));
        }
        println!("{} of {} {}", rows.len(), ctl.len(), R::COLLECTION);
    }
    Ok(0)
}

async fn set_status<R: Record, A: RecordApi<R>>(
    ctl: &RecordController<R, A>,
    args: &SetStatusArgs,
) -> Result<u8> {
    let status: R::Status = args.status.parse()?;
    let id = RecordId::new(args.id.as_str())?;
    ctl.load().await?;
    let result = ctl.update_status(&id, status, args.notes.as_deref()).await;
    finish(ctl.take_notices(), result)
}

async fn notes<R: Annotated, A: RecordApi<R>>(ctl: &RecordController<R, A>, args: &NotesArgs) -> Result<u8> {
    let id = RecordId::new(args.id.as_str())?;
    ctl.load().await?;
    let result = ctl.edit_notes(&id, &args.text).await;
    finish(ctl.take_notices(), result)
}

/// Print notices and the outcome of one mutation.
fn finish<R: Record>(notices: Vec<vox_console::Notice>, result: Result<R, ConsoleError>) -> Result<u8> {
    print_notices(&notices);
    match result {
        Ok(record) => {
            println!("{}", format_row(&record));
            Ok(0)
        }
        Err(ConsoleError::Invalid { errors, .. }) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            Ok(EXIT_INVALID)
        }
        Err(e @ ConsoleError::Record(_)) => {
            eprintln!("{e}");
            Ok(EXIT_INVALID)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_list(console: &Console, args: &ListArgs) -> Result<u8> {
    match args.collection {
        Collection::Disputes => list(console.disputes(), args).await,
        Collection::Incidents => list(console.incidents(), args).await,
        Collection::Trials => list(console.trials(), args).await,
        Collection::Tiers => list(console.tiers(), args).await,
        Collection::Customers => list(console.customers(), args).await,
        Collection::Compliance => list(console.compliance(), args).await,
    }
}

pub async fn run_set_status(console: &Console, args: &SetStatusArgs) -> Result<u8> {
    match args.collection {
        Collection::Disputes => set_status(console.disputes(), args).await,
        Collection::Incidents => set_status(console.incidents(), args).await,
        Collection::Trials => set_status(console.trials(), args).await,
        Collection::Tiers => set_status(console.tiers(), args).await,
        Collection::Customers => set_status(console.customers(), args).await,
        Collection::Compliance => set_status(console.compliance(), args).await,
    }
}

pub async fn run_notes(console: &Console, args: &NotesArgs) -> Result<u8> {
    match args.collection {
        Collection::Disputes => notes(console.disputes(), args).await,
        Collection::Incidents => notes(console.incidents(), args).await,
        Collection::Trials => notes(console.trials(), args).await,
        Collection::Customers => notes(console.customers(), args).await,
        Collection::Compliance => notes(console.compliance(), args).await,
        Collection::Tiers => anyhow::bail!("tier assignments have no notes"),
    }
}

pub async fn run_extend_trial(console: &Console, args: &ExtendTrialArgs) -> Result<u8> {
    let id = RecordId::new(args.id.as_str())?;
    let trials = console.trials();
    trials.load().await?;
    let result = trials.extend_trial(&id, args.days, args.reason.as_deref()).await;
    finish(trials.take_notices(), result)
}

pub async fn run_change_tier(console: &Console, args: &ChangeTierArgs) -> Result<u8> {
    let tier: Tier = args.tier.parse()?;
    let id = RecordId::new(args.id.as_str())?;
    let tiers = console.tiers();
    tiers.load().await?;
    let result = tiers.change_tier(&id, tier).await;
    finish(tiers.take_notices(), result)
}

pub async fn run_approve_tier(console: &Console, id: &str) -> Result<u8> {
    let id = RecordId::new(id)?;
    let tiers = console.tiers();
    tiers.load().await?;
    let result = tiers.approve_tier_request(&id).await;
    finish(tiers.take_notices(), result)
}

pub async fn run_create_incident(console: &Console, args: &CreateIncidentArgs) -> Result<u8> {
    let draft = IncidentDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        severity: args.severity.clone(),
        status: args.status.clone(),
        affected_services: args.services.clone(),
        assignee: args.assignee.clone(),
    };
    let incidents = console.incidents();
    incidents
        .load()
        .await
        .context("loading incidents before create")?;
    let result = incidents.create(draft).await;
    finish(incidents.take_notices(), result)
}
