//! # vox CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vox_cli::profile::{run_profile, ProfileArgs};
use vox_cli::records::{
    run_approve_tier, run_change_tier, run_create_incident, run_extend_trial, run_list, run_notes,
    run_set_status, ChangeTierArgs, CreateIncidentArgs, ExtendTrialArgs, ListArgs, NotesArgs,
    SetStatusArgs,
};
use vox_cli::system::run_health;
use vox_cli::{connect, ConnectionArgs};

/// Voxline admin console.
///
/// Lists and filters disputes, incidents, trials, tier assignments,
/// customers and compliance requests, and applies admin actions against
/// the backend.
#[derive(Parser, Debug)]
#[command(name = "vox", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List a collection, optionally filtered.
    List(ListArgs),

    /// Change a record's status.
    SetStatus(SetStatusArgs),

    /// Replace a record's notes.
    Notes(NotesArgs),

    /// Extend a trial by a number of days.
    ExtendTrial(ExtendTrialArgs),

    /// Move a user to another tier.
    ChangeTier(ChangeTierArgs),

    /// Grant a user's pending tier request.
    ApproveTier {
        id: String,
    },

    /// Create an incident.
    CreateIncident(CreateIncidentArgs),

    /// Show platform service health.
    Health,

    /// Show or edit the admin profile.
    Profile(ProfileArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let console = match connect(&cli.connection) {
        Ok(console) => console,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match &cli.command {
        Commands::List(args) => run_list(&console, args).await,
        Commands::SetStatus(args) => run_set_status(&console, args).await,
        Commands::Notes(args) => run_notes(&console, args).await,
        Commands::ExtendTrial(args) => run_extend_trial(&console, args).await,
        Commands::ChangeTier(args) => run_change_tier(&console, args).await,
        Commands::ApproveTier { id } => run_approve_tier(&console, id).await,
        Commands::CreateIncident(args) => run_create_incident(&console, args).await,
        Commands::Health => run_health(&console).await,
        Commands::Profile(args) => run_profile(&console, args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vox_cli::records::Collection;

    #[test]
    fn cli_parse_list_with_filters() {
        let cli = Cli::try_parse_from([
            "vox", "list", "incidents", "--status", "open", "--search", "sip",
        ])
        .unwrap();
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.collection, Collection::Incidents);
                assert_eq!(args.status, "open");
                assert_eq!(args.priority, "all");
                assert_eq!(args.search, "sip");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_connection_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vox", "health", "--token", "t0k", "--api-url", "http://x:1", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.connection.token.as_deref(), Some("t0k"));
        assert_eq!(cli.connection.api_url.as_deref(), Some("http://x:1"));
        assert!(matches!(cli.command, Commands::Health));
    }

    #[test]
    fn cli_parse_set_status_with_notes() {
        let cli = Cli::try_parse_from([
            "vox", "set-status", "disputes", "DSP-1", "resolved", "--notes", "refunded",
        ])
        .unwrap();
        match cli.command {
            Commands::SetStatus(args) => {
                assert_eq!(args.collection, Collection::Disputes);
                assert_eq!(args.status, "resolved");
                assert_eq!(args.notes.as_deref(), Some("refunded"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_create_incident_repeats_service() {
        let cli = Cli::try_parse_from([
            "vox",
            "create-incident",
            "--title",
            "SMS delays",
            "--severity",
            "high",
            "--service",
            "sms",
            "--service",
            "api",
        ])
        .unwrap();
        match cli.command {
            Commands::CreateIncident(args) => assert_eq!(args.services, ["sms", "api"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_unknown_collection() {
        assert!(Cli::try_parse_from(["vox", "list", "invoices"]).is_err());
    }

    #[test]
    fn cli_parse_profile_set_requires_assignments() {
        assert!(Cli::try_parse_from(["vox", "profile", "set"]).is_err());
        assert!(Cli::try_parse_from(["vox", "profile", "set", "company=Voxline"]).is_ok());
    }
}
