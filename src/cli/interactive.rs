//! Interactive menu mode

use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use std::path::Path;

use crate::config::Config;
use crate::models::{ConversionTarget, ObjectType, SourceMember};
use crate::resolver;
use crate::session::Session;

use super::ConvertArgs;

/// Run the interactive menu loop. Must be called outside any async
/// runtime; async actions build their own runtime per invocation.
pub fn run_interactive_mode(config_path: Option<&Path>) -> Result<()> {
    print_banner();

    loop {
        println!();
        let options = vec![
            "🔄 Convert a member or source file",
            "📑 Conversion lists",
            "⚙️  Conversion parameters",
            "🔍 Check conversion utility",
            "❌ Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => handle_convert(config_path)?,
            1 => handle_lists(config_path)?,
            2 => handle_params(config_path)?,
            3 => handle_check(config_path)?,
            4 => {
                println!("\n{}", "Goodbye! 👋".green().bold());
                break;
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "╔═══════════════════════════════════════════════╗".blue());
    println!("{}", "║                                               ║".blue());
    println!("{}", "║     🔄 RPG Fully-Free Conversion Tool         ║".blue().bold());
    println!("{}", "║                                               ║".blue());
    println!("{}", "║     Convert fixed-format RPG members to       ║".blue());
    println!("{}", "║     fully-free syntax on a remote system      ║".blue());
    println!("{}", "║                                               ║".blue());
    println!("{}", "╚═══════════════════════════════════════════════╝".blue());
}

fn pause() -> Result<()> {
    println!();
    Input::<String>::new()
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

fn handle_convert(config_path: Option<&Path>) -> Result<()> {
    println!("\n{}", "=== Convert members ===".blue().bold());
    println!();

    let target: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("🎯 Target (LIBRARY/FILE or LIBRARY/FILE/MEMBER.TYPE)")
        .interact_text()?;

    let members: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("🔎 Member filter (e.g. CALC*, blank for all)")
        .allow_empty(true)
        .interact_text()?;

    let report = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("📄 Generate a markdown report?")
        .default(false)
        .interact()?;

    println!();
    println!("{}", "🚀 Starting conversion...".yellow().bold());
    println!();

    let args = ConvertArgs {
        target: target.trim().to_string(),
        members: Some(members.trim().to_string()).filter(|m| !m.is_empty()),
        report,
        ..Default::default()
    };

    if let Err(err) = block_on(super::handle_convert(config_path, args))? {
        println!("{}", "❌ Conversion failed!".red().bold());
        println!("{}", format!("Error: {err}").red());
    }
    pause()
}

fn handle_lists(config_path: Option<&Path>) -> Result<()> {
    loop {
        println!("\n{}", "=== Conversion lists ===".blue().bold());
        println!();

        let config = Config::load(config_path)?;
        let lists = super::open_store(&config).lists()?;
        let mut options: Vec<String> = lists
            .iter()
            .map(|list| format!("📑 {} ({} members)", list.name, list.items.len()))
            .collect();
        options.push("➕ Create a new list".to_string());
        options.push("↩  Back".to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Pick a list")
            .items(&options)
            .default(0)
            .interact()?;

        if selection == lists.len() {
            create_list(config_path)?;
            continue;
        }
        if selection == lists.len() + 1 {
            return Ok(());
        }
        list_actions(config_path, &lists[selection].name)?;
    }
}

fn create_list(config_path: Option<&Path>) -> Result<()> {
    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("List name")
        .interact_text()?;
    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()?;

    if let Err(err) = super::handle_list_create(
        config_path,
        name.trim(),
        Some(description.trim()),
        None,
        None,
    ) {
        println!("{}", format!("Error: {err}").red());
    }
    Ok(())
}

fn list_actions(config_path: Option<&Path>, name: &str) -> Result<()> {
    loop {
        println!();
        let options = vec![
            "📄 Show members",
            "🔄 Convert all members",
            "➕ Add members from a source file",
            "➖ Remove members",
            "🏷  Set object type",
            "✏️  Edit properties",
            "🗑  Delete list",
            "↩  Back",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("List '{name}'"))
            .items(&options)
            .default(0)
            .interact()?;

        let result = match selection {
            0 => super::handle_list_show(config_path, Some(name)).map(|_| false),
            1 => {
                let run = block_on(super::handle_list_convert(config_path, name, false))?;
                run.map(|_| false)
            }
            2 => add_members(config_path, name).map(|_| false),
            3 => remove_members(config_path, name).map(|_| false),
            4 => set_object_type(config_path, name).map(|_| false),
            5 => edit_list(config_path, name).map(|_| false),
            6 => {
                let deleted = delete_list(config_path, name)?;
                Ok(deleted)
            }
            _ => return Ok(()),
        };

        match result {
            Ok(true) => return Ok(()),
            Ok(false) => pause()?,
            Err(err) => {
                println!("{}", format!("Error: {err}").red());
                pause()?;
            }
        }
    }
}

fn add_members(config_path: Option<&Path>, name: &str) -> Result<()> {
    let source: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Source file (LIBRARY/FILE)")
        .interact_text()?;
    let Some((library, file)) = source.trim().trim_matches('/').split_once('/') else {
        println!("{}", "Expected LIBRARY/FILE.".red());
        return Ok(());
    };
    let target = ConversionTarget::for_file(library, file, None);

    let found = block_on(async {
        let config = Config::load(config_path)?;
        let session = Session::connect(config)?;
        resolver::list_members(session.gateway(), &target).await
    })??;
    if found.is_empty() {
        println!("{}", "No convertible members found.".yellow());
        return Ok(());
    }

    let labels: Vec<String> = found
        .iter()
        .map(|member| format!("{}.{}", member.name, member.extension))
        .collect();
    let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select members to add (space to toggle)")
        .items(&labels)
        .interact()?;
    if chosen.is_empty() {
        println!("{}", "Nothing selected.".yellow());
        return Ok(());
    }
    let selected: Vec<SourceMember> = chosen
        .into_iter()
        .map(|index| found[index].clone())
        .collect();

    let config = Config::load(config_path)?;
    super::append_members(&super::open_store(&config), name, selected)
}

fn remove_members(config_path: Option<&Path>, name: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let Some(list) = super::open_store(&config).find(name)? else {
        return Ok(());
    };
    if list.items.is_empty() {
        println!("{}", "(no members)".dimmed());
        return Ok(());
    }

    let names: Vec<&str> = list.items.iter().map(|item| item.member.as_str()).collect();
    let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select members to remove (space to toggle)")
        .items(&names)
        .interact()?;

    for index in chosen {
        super::handle_list_remove(config_path, name, names[index])?;
    }
    Ok(())
}

fn set_object_type(config_path: Option<&Path>, name: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let Some(list) = super::open_store(&config).find(name)? else {
        return Ok(());
    };
    if list.items.is_empty() {
        println!("{}", "(no members)".dimmed());
        return Ok(());
    }

    let names: Vec<&str> = list.items.iter().map(|item| item.member.as_str()).collect();
    let member = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Member")
        .items(&names)
        .default(0)
        .interact()?;

    let types: Vec<String> = ObjectType::ALL.iter().map(|t| t.to_string()).collect();
    let chosen = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Object type")
        .items(&types)
        .default(0)
        .interact()?;

    super::handle_list_set_type(config_path, name, names[member], &types[chosen])
}

fn edit_list(config_path: Option<&Path>, name: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let Some(list) = super::open_store(&config).find(name)? else {
        return Ok(());
    };

    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Description")
        .with_initial_text(&list.description)
        .allow_empty(true)
        .interact_text()?;
    let target_library: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Destination library (blank for none)")
        .with_initial_text(&list.target_library)
        .allow_empty(true)
        .interact_text()?;
    let target_file: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Destination source file (blank for none)")
        .with_initial_text(&list.target_source_file)
        .allow_empty(true)
        .interact_text()?;

    super::handle_list_edit(
        config_path,
        name,
        Some(description.trim()),
        Some(target_library.trim()),
        Some(target_file.trim()),
    )
}

fn delete_list(config_path: Option<&Path>, name: &str) -> Result<bool> {
    match super::handle_list_delete(config_path, name, false) {
        Ok(()) => Ok(true),
        Err(err) => {
            println!("{}", format!("Error: {err}").red());
            Ok(false)
        }
    }
}

fn handle_params(config_path: Option<&Path>) -> Result<()> {
    loop {
        println!("\n{}", "=== Conversion parameters ===".blue().bold());
        println!();

        let options = vec![
            "📄 Show current values",
            "✏️  Set a parameter",
            "♻️  Reset to defaults",
            "↩  Back",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Parameters")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                super::handle_params_show(config_path)?;
                pause()?;
            }
            1 => {
                set_param(config_path)?;
            }
            2 => {
                super::handle_params_reset(config_path, false)?;
                pause()?;
            }
            _ => return Ok(()),
        }
    }
}

fn set_param(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let params = super::open_store(&config).params()?;
    let entries = params.entries();
    let labels: Vec<String> = entries
        .iter()
        .map(|(key, value)| format!("{key:<12} {value}"))
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which parameter?")
        .items(&labels)
        .default(0)
        .interact()?;
    let (key, current) = entries[selection];

    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("New value for {key}"))
        .with_initial_text(current)
        .interact_text()?;

    if let Err(err) = super::handle_params_set(config_path, key, value.trim()) {
        println!("{}", format!("Error: {err}").red());
    }
    Ok(())
}

fn handle_check(config_path: Option<&Path>) -> Result<()> {
    println!();
    if let Err(err) = block_on(super::handle_check(config_path))? {
        println!("{}", "❌ Check failed!".red().bold());
        println!("{}", format!("Error: {err}").red());
    }
    pause()
}
