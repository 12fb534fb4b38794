//! CLI handlers shared by the subcommands and interactive mode

pub mod interactive;

use anyhow::{bail, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::Path;

use crate::classifier;
use crate::command::converted_member;
use crate::config::Config;
use crate::error::Error;
use crate::models::{
    BatchOutcome, CommandParams, ConversionEntry, ConversionList, ConversionStatus,
    ConversionTarget, EntryPatch, FilterKind, MemberFilter, ObjectType, SourceMember,
};
use crate::orchestrator::{self, BatchOptions, BatchPreview, BatchRun};
use crate::progress::{BarProgress, CancellationToken};
use crate::report;
use crate::resolver;
use crate::session::Session;
use crate::store::Store;

pub const DEFAULT_REPORT_FILE: &str = "conversion-report.md";

/// Options collected from the `convert` subcommand or the interactive menu.
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    /// `LIBRARY/FILE` for a whole source file, `LIBRARY/FILE/MEMBER.TYPE`
    /// for a single member.
    pub target: String,
    pub yes: bool,
    pub members: Option<String>,
    pub extensions: Option<String>,
    pub regex: bool,
    pub object_type: Option<String>,
    pub to_library: Option<String>,
    pub to_file: Option<String>,
    pub to_member: Option<String>,
    pub report: bool,
    pub open: bool,
}

fn open_store(config: &Config) -> Store {
    Store::new(&config.settings_file)
}

fn parse_target(args: &ConvertArgs) -> Result<ConversionTarget> {
    let segments: Vec<&str> = args.target.trim_matches('/').split('/').collect();
    let mut target = match segments.as_slice() {
        [_, _, _] => {
            let member = SourceMember::parse_path(&args.target)?;
            ConversionTarget::for_member(&member)?
        }
        [library, file] => {
            let filter = if args.members.is_some() || args.extensions.is_some() {
                Some(MemberFilter {
                    members: args.members.clone(),
                    extensions: args.extensions.clone(),
                    kind: if args.regex {
                        FilterKind::Regex
                    } else {
                        FilterKind::Simple
                    },
                })
            } else {
                None
            };
            ConversionTarget::for_file(library, file, filter)
        }
        _ => return Err(Error::InvalidMemberPath(args.target.clone()).into()),
    };
    if let Some(object_type) = &args.object_type {
        target.object_type = Some(object_type.parse()?);
    }
    Ok(target)
}

fn apply_destination(params: &mut CommandParams, args: &ConvertArgs) {
    if let Some(library) = &args.to_library {
        params.tosrclib = library.trim().to_uppercase();
    }
    if let Some(file) = &args.to_file {
        params.tosrcfile = file.trim().to_uppercase();
    }
    if let Some(member) = &args.to_member {
        params.tosrcmbr = member.trim().to_uppercase();
    }
}

fn status_label(status: ConversionStatus) -> ColoredString {
    match status {
        ConversionStatus::Succeed => status.to_string().green(),
        ConversionStatus::Warning => status.to_string().yellow(),
        ConversionStatus::Failed => status.to_string().red(),
        ConversionStatus::Na => status.to_string().dimmed(),
    }
}

fn confirm_batch(preview: &BatchPreview) -> bool {
    println!();
    println!("{}", "📋 Members to convert:".bold());
    println!("{}", preview.summary());
    println!();
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Convert {} member(s)?", preview.names.len()))
        .default(true)
        .interact()
        .unwrap_or(false)
}

fn spawn_ctrl_c(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

fn print_outcome(outcome: &BatchOutcome) {
    println!();
    for entry in &outcome.reports {
        let text = format!("{}\n{}", entry.result.stdout, entry.result.stderr);
        let status = classifier::classify(&text);
        let message = classifier::summary_line(&text);
        let name = entry.target.display_name();
        let line = match status {
            ConversionStatus::Succeed => format!("  ✅ {name}: {message}").green(),
            ConversionStatus::Warning => format!("  ⚠️  {name}: {message}").yellow(),
            _ => format!("  ❌ {name}: {message}").red(),
        };
        println!("{line}");
    }
    println!();
    let summary = outcome.summary_message();
    if outcome.all_converted() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

fn write_report(outcome: &BatchOutcome) -> Result<()> {
    let markdown = report::generate_report(outcome);
    std::fs::write(DEFAULT_REPORT_FILE, markdown)?;
    println!("📄 Report: {DEFAULT_REPORT_FILE}");
    Ok(())
}

async fn open_converted(
    session: &Session,
    member: &SourceMember,
    params: &CommandParams,
) -> Result<()> {
    let destination = converted_member(member, params);
    println!();
    println!(
        "{}",
        format!("── {} ──", destination.path()).blue().bold()
    );
    let source = resolver::fetch_member_source(session.gateway(), &destination).await?;
    println!("{source}");
    Ok(())
}

/// Convert a single member or a whole source file.
pub async fn handle_convert(config_path: Option<&Path>, args: ConvertArgs) -> Result<()> {
    let config = Config::load(config_path)?;
    let mut session = Session::connect(config)?;
    let target = parse_target(&args)?;

    let mut params = session.store().params()?;
    apply_destination(&mut params, &args);

    let progress = BarProgress::new();
    let cancel = CancellationToken::new();
    spawn_ctrl_c(&cancel);
    let options = BatchOptions {
        confirm: if args.yes { None } else { Some(&confirm_batch) },
        progress: &progress,
        cancel: cancel.clone(),
    };

    let run = orchestrator::run_batch(&mut session, &target, &params, &options).await?;
    progress.clear();

    match run {
        BatchRun::NoMembers => {
            println!("{}", "No convertible members found.".yellow());
        }
        BatchRun::Declined => {
            println!("{}", "Conversion cancelled.".yellow());
        }
        BatchRun::Cancelled => {
            println!("{}", "⚠️  Conversion cancelled.".yellow().bold());
        }
        BatchRun::Completed(outcome) => {
            print_outcome(&outcome);
            if args.report {
                write_report(&outcome)?;
            }
            if args.open {
                if let Some(entry) = outcome.reports.first() {
                    if !target.is_batch() && classifier::should_open_converted(&entry.result) {
                        let member = SourceMember {
                            library: target.library.clone(),
                            file: target.file.clone(),
                            name: target.display_name().to_string(),
                            extension: target.extension.clone().unwrap_or_default(),
                            text: None,
                        };
                        open_converted(&session, &member, &params).await?;
                    }
                }
            }
            if outcome.cancelled {
                println!("{}", "⚠️  Batch was cancelled before completion.".yellow());
            }
        }
    }
    Ok(())
}

/// Print the source of one member without converting anything.
pub async fn handle_fetch(
    config_path: Option<&Path>,
    path: &str,
    output: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let session = Session::connect(config)?;
    let member = SourceMember::parse_path(path)?;
    let source = resolver::fetch_member_source(session.gateway(), &member).await?;
    match output {
        Some(file) => {
            std::fs::write(file, &source)?;
            println!("Saved {} to {}", member.path(), file.display());
        }
        None => println!("{source}"),
    }
    Ok(())
}

/// Probe the configured connection and product library.
pub async fn handle_check(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let base_url = config.connection.base_url.clone();
    let mut session = Session::connect(config)?;

    println!("Connection: {}", base_url.cyan());
    println!("Product library: {}", session.product_library().cyan());
    if session.check_product().await? {
        println!("{}", "✅ Conversion utility is available.".green().bold());
    } else {
        println!(
            "{}",
            "❌ Conversion utility was not found in the product library."
                .red()
                .bold()
        );
    }
    Ok(())
}

// ---- conversion list commands ----

pub fn handle_list_create(
    config_path: Option<&Path>,
    name: &str,
    description: Option<&str>,
    target_library: Option<&str>,
    target_file: Option<&str>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    if store.find(name)?.is_some() {
        return Err(Error::ListExists(name.to_string()).into());
    }
    let mut list = ConversionList::new(name, &config.connection.name);
    list.description = description.unwrap_or_default().to_string();
    list.target_library = target_library.unwrap_or_default().to_uppercase();
    list.target_source_file = target_file.unwrap_or_default().to_uppercase();
    store.add(list)?;
    println!("{}", format!("✅ Created list '{name}'.").green());
    Ok(())
}

pub fn handle_list_delete(config_path: Option<&Path>, name: &str, yes: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    let Some(list) = store.find(name)? else {
        return Err(Error::ListNotFound(name.to_string()).into());
    };
    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete list '{}' with {} member(s)?",
                list.name,
                list.items.len()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Nothing deleted.".yellow());
            return Ok(());
        }
    }
    store.remove(name)?;
    println!("{}", format!("🗑️  Deleted list '{}'.", list.name).green());
    Ok(())
}

pub fn handle_list_show(config_path: Option<&Path>, name: Option<&str>) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    match name {
        None => {
            let lists = store.lists()?;
            if lists.is_empty() {
                println!("{}", "No conversion lists yet.".yellow());
                return Ok(());
            }
            println!("{}", "Conversion lists".bold());
            for list in lists {
                println!(
                    "  📑 {} ({} members){}",
                    list.name.cyan(),
                    list.items.len(),
                    if list.description.is_empty() {
                        String::new()
                    } else {
                        format!(" - {}", list.description)
                    }
                );
            }
        }
        Some(name) => {
            let Some(list) = store.find(name)? else {
                return Err(Error::ListNotFound(name.to_string()).into());
            };
            print_list(&list);
        }
    }
    Ok(())
}

pub fn print_list(list: &ConversionList) {
    println!("{}", list.name.bold().cyan());
    if !list.description.is_empty() {
        println!("  {}", list.description);
    }
    if !list.target_library.is_empty() || !list.target_source_file.is_empty() {
        println!(
            "  Destination: {}/{}",
            list.target_library, list.target_source_file
        );
    }
    if list.items.is_empty() {
        println!("  {}", "(no members)".dimmed());
        return;
    }
    for item in &list.items {
        let date = item
            .conversion_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {} {}/{}/{}.{} [{}] {} {}",
            status_label(item.status),
            item.library,
            item.source_file,
            item.member,
            item.source_type,
            item.object_type.map(|t| t.to_string()).unwrap_or_default(),
            date.dimmed(),
            item.message.dimmed()
        );
    }
}

/// Add every convertible member of `LIBRARY/FILE` to a list, skipping the
/// ones already present.
pub async fn handle_list_add(
    config_path: Option<&Path>,
    name: &str,
    source: &str,
    members: Option<&str>,
    extensions: Option<&str>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let session = Session::connect(config)?;
    if session.store().find(name)?.is_none() {
        return Err(Error::ListNotFound(name.to_string()).into());
    }

    let Some((library, file)) = source.trim_matches('/').split_once('/') else {
        return Err(Error::InvalidMemberPath(source.to_string()).into());
    };
    let filter = (members.is_some() || extensions.is_some()).then(|| MemberFilter {
        members: members.map(str::to_string),
        extensions: extensions.map(str::to_string),
        kind: FilterKind::Simple,
    });
    let target = ConversionTarget::for_file(library, file, filter);
    let found = resolver::list_members(session.gateway(), &target).await?;
    if found.is_empty() {
        println!("{}", "No convertible members found.".yellow());
        return Ok(());
    }
    append_members(session.store(), name, found)
}

/// Append members to a list, naming the ones skipped as already present.
pub fn append_members(store: &Store, name: &str, members: Vec<SourceMember>) -> Result<()> {
    let Some(mut list) = store.find(name)? else {
        return Err(Error::ListNotFound(name.to_string()).into());
    };
    let mut added = 0;
    let mut skipped = Vec::new();
    for member in members {
        if list.contains_member(&member.name) {
            skipped.push(member.name.clone());
            continue;
        }
        list.items.push(entry_for(&member));
        added += 1;
    }
    store.update(list)?;
    if !skipped.is_empty() {
        println!(
            "{}",
            format!("⚠️  Already in the list: {}", skipped.join(", ")).yellow()
        );
    }
    println!("{}", format!("✅ Added {added} member(s).").green());
    Ok(())
}

pub fn entry_for(member: &SourceMember) -> ConversionEntry {
    ConversionEntry {
        member: member.name.clone(),
        library: member.library.clone(),
        source_file: member.file.clone(),
        source_type: member.extension.clone(),
        object_type: None,
        status: ConversionStatus::Na,
        message: String::new(),
        conversion_date: None,
    }
}

pub fn handle_list_remove(config_path: Option<&Path>, name: &str, member: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    if store.find(name)?.is_none() {
        return Err(Error::ListNotFound(name.to_string()).into());
    }
    store.remove_item(name, member)?;
    println!("{}", format!("Removed {member} from '{name}'.").green());
    Ok(())
}

pub fn handle_list_set_type(
    config_path: Option<&Path>,
    name: &str,
    member: &str,
    object_type: &str,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    let Some(list) = store.find(name)? else {
        return Err(Error::ListNotFound(name.to_string()).into());
    };
    let Some(entry) = list.find_item(member) else {
        bail!("member {member} is not in list '{name}'");
    };
    let object_type: ObjectType = object_type.parse()?;
    let patch = EntryPatch {
        source_file: Some(entry.source_file.clone()),
        object_type: Some(object_type),
        ..Default::default()
    };
    store.update_item(name, member, &patch)?;
    println!(
        "{}",
        format!("Set {member} to {object_type} in '{name}'.").green()
    );
    Ok(())
}

pub fn handle_list_edit(
    config_path: Option<&Path>,
    name: &str,
    description: Option<&str>,
    target_library: Option<&str>,
    target_file: Option<&str>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    let Some(mut list) = store.find(name)? else {
        return Err(Error::ListNotFound(name.to_string()).into());
    };
    if let Some(description) = description {
        list.description = description.to_string();
    }
    if let Some(library) = target_library {
        list.target_library = library.to_uppercase();
    }
    if let Some(file) = target_file {
        list.target_source_file = file.to_uppercase();
    }
    store.update(list)?;
    println!("{}", format!("Updated list '{name}'.").green());
    Ok(())
}

/// Convert every member of a stored list.
pub async fn handle_list_convert(config_path: Option<&Path>, name: &str, yes: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let mut session = Session::connect(config)?;
    let Some(list) = session.store().find(name)? else {
        return Err(Error::ListNotFound(name.to_string()).into());
    };
    let params = session.store().params()?;

    let progress = BarProgress::new();
    let cancel = CancellationToken::new();
    spawn_ctrl_c(&cancel);
    let options = BatchOptions {
        confirm: if yes { None } else { Some(&confirm_batch) },
        progress: &progress,
        cancel: cancel.clone(),
    };

    let run = orchestrator::convert_list(&mut session, &list, &params, &options).await?;
    progress.clear();

    match run {
        BatchRun::NoMembers => println!("{}", format!("List '{name}' is empty.").yellow()),
        BatchRun::Declined => println!("{}", "Conversion cancelled.".yellow()),
        BatchRun::Cancelled => println!("{}", "⚠️  Conversion cancelled.".yellow().bold()),
        BatchRun::Completed(outcome) => {
            print_outcome(&outcome);
            if outcome.cancelled {
                println!("{}", "⚠️  Batch was cancelled before completion.".yellow());
            }
        }
    }
    Ok(())
}

// ---- parameter commands ----

pub fn handle_params_show(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let params = open_store(&config).params()?;
    println!("{}", "Conversion parameters".bold());
    for (key, value) in params.entries() {
        println!("  {:<12} {}", key, value.cyan());
    }
    Ok(())
}

pub fn handle_params_set(config_path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    let mut params = store.params()?;
    params.set(key, value)?;
    store.save_params(&params)?;
    println!(
        "{}",
        format!("✅ {} = {}", key.to_uppercase(), value.to_uppercase()).green()
    );
    Ok(())
}

pub fn handle_params_reset(config_path: Option<&Path>, yes: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Reset all conversion parameters to their defaults?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Parameters unchanged.".yellow());
            return Ok(());
        }
    }
    open_store(&config).save_params(&CommandParams::default())?;
    println!("{}", "✅ Parameters reset to defaults.".green());
    Ok(())
}
