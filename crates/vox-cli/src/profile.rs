//! # Profile Subcommand
//!
//! - `show` -- Print the admin's profile.
//! - `set field=value ...` -- Edit fields through the profile form, which
//!   validates locally and merges the backend's field errors.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use vox_client::{ProfileSettings, SettingsApi};
use vox_console::{Console, ConsoleError, ProfileForm};

use crate::{print_notices, EXIT_INVALID};

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print the current profile.
    Show,
    /// Update fields, e.g. `email=dana@voxline.io`. Field names:
    /// fullName, email, phone, company, timezone.
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}

/// Split `field=value`.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => bail!("expected field=value, got `{raw}`"),
    }
}

fn print_profile(profile: &ProfileSettings) {
    for field in ProfileSettings::FIELDS {
        let value = match *field {
            "fullName" => &profile.full_name,
            "email" => &profile.email,
            "phone" => &profile.phone,
            "company" => &profile.company,
            _ => &profile.timezone,
        };
        println!("{field:<10} {value}");
    }
}

/// Apply assignments to `form` and submit through `api`.
pub async fn apply<S: SettingsApi>(form: &mut ProfileForm, api: &S, assignments: &[String]) -> Result<u8> {
    form.begin_edit();
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        form.set(field, value)?;
    }

    let result = form.submit(api).await;
    print_notices(&form.take_notices());
    match result {
        Ok(saved) => {
            print_profile(&saved);
            Ok(0)
        }
        Err(e) => match e.field_errors() {
            Some(_) => {
                for (field, message) in form.visible_errors().iter() {
                    eprintln!("{field}: {message}");
                }
                Ok(EXIT_INVALID)
            }
            None if matches!(e, ConsoleError::Api(_)) => Ok(1),
            None => Err(e.into()),
        },
    }
}

pub async fn run_profile(console: &Console, args: &ProfileArgs) -> Result<u8> {
    match &args.command {
        ProfileCommand::Show => {
            print_profile(&console.settings().fetch_profile().await?);
            Ok(0)
        }
        ProfileCommand::Set { assignments } => {
            let mut form = console.profile_form().await?;
            apply(&mut form, console.settings(), assignments).await
        }
    }
}
