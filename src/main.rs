//! Fixed-format RPG to fully-free conversion CLI

use clap::{Parser, Subcommand};
use colored::*;
use rpgfree::cli::{self, ConvertArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpgfree")]
#[command(about = "Convert fixed-format RPG members to fully-free syntax", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to rpgfree.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single member or a whole source file
    Convert {
        /// LIBRARY/FILE for a whole source file, LIBRARY/FILE/MEMBER.TYPE for one member
        target: String,

        /// Skip the confirmation prompt for batch targets
        #[arg(short = 'y', long)]
        yes: bool,

        /// Member name patterns, comma separated (e.g. "CALC*,PAY*")
        #[arg(short, long)]
        members: Option<String>,

        /// Source type patterns, comma separated (e.g. "RPGLE,SQLRPGLE")
        #[arg(short, long)]
        extensions: Option<String>,

        /// Treat the member and source type patterns as regular expressions
        #[arg(long)]
        regex: bool,

        /// Object type passed to the converter (*PGM, *MODULE or *NONE)
        #[arg(short, long)]
        object_type: Option<String>,

        /// Destination library for the converted source
        #[arg(long)]
        to_library: Option<String>,

        /// Destination source file for the converted source
        #[arg(long)]
        to_file: Option<String>,

        /// Destination member name (single member targets only)
        #[arg(long)]
        to_member: Option<String>,

        /// Write a markdown conversion report
        #[arg(short, long)]
        report: bool,

        /// Print the converted source after a successful single-member run
        #[arg(long)]
        open: bool,
    },

    /// Manage conversion lists
    #[command(subcommand)]
    List(ListCommands),

    /// Show or change the persisted conversion parameters
    #[command(subcommand)]
    Params(ParamsCommands),

    /// Print the source of a member without converting it
    Fetch {
        /// LIBRARY/FILE/MEMBER.TYPE
        path: String,

        /// Write the source to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the connection and the conversion utility
    Check,

    /// Start the interactive menu
    Interactive,
}

#[derive(Subcommand)]
enum ListCommands {
    /// Create a new conversion list
    Create {
        name: String,

        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,

        /// Destination library for the whole list
        #[arg(long)]
        to_library: Option<String>,

        /// Destination source file for the whole list
        #[arg(long)]
        to_file: Option<String>,
    },

    /// Delete a conversion list
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show one list, or all lists when no name is given
    Show { name: Option<String> },

    /// Add the convertible members of a source file to a list
    Add {
        name: String,

        /// Source file as LIBRARY/FILE
        source: String,

        /// Member name patterns, comma separated
        #[arg(short, long)]
        members: Option<String>,

        /// Source type patterns, comma separated
        #[arg(short, long)]
        extensions: Option<String>,
    },

    /// Remove one member from a list
    Remove { name: String, member: String },

    /// Pin the object type used when converting one member
    SetType {
        name: String,
        member: String,

        /// *PGM, *MODULE or *NONE
        object_type: String,
    },

    /// Edit a list's description and destination
    Edit {
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        to_library: Option<String>,

        #[arg(long)]
        to_file: Option<String>,
    },

    /// Convert every member of a list
    Convert {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ParamsCommands {
    /// Print every parameter with its current value
    Show,

    /// Set one parameter, e.g. `params set INDENT 4`
    Set { key: String, value: String },

    /// Restore all parameters to their defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Convert {
            target,
            yes,
            members,
            extensions,
            regex,
            object_type,
            to_library,
            to_file,
            to_member,
            report,
            open,
        } => {
            println!("{}", "RPG Fully-Free Conversion".bold().blue());
            println!("{}", "=".repeat(50).blue());
            println!();

            let args = ConvertArgs {
                target,
                yes,
                members,
                extensions,
                regex,
                object_type,
                to_library,
                to_file,
                to_member,
                report,
                open,
            };
            run_async(cli::handle_convert(config, args));
        }

        Commands::List(command) => match command {
            ListCommands::Create {
                name,
                description,
                to_library,
                to_file,
            } => run_sync(cli::handle_list_create(
                config,
                &name,
                description.as_deref(),
                to_library.as_deref(),
                to_file.as_deref(),
            )),
            ListCommands::Delete { name, yes } => {
                run_sync(cli::handle_list_delete(config, &name, yes))
            }
            ListCommands::Show { name } => run_sync(cli::handle_list_show(config, name.as_deref())),
            ListCommands::Add {
                name,
                source,
                members,
                extensions,
            } => run_async(cli::handle_list_add(
                config,
                &name,
                &source,
                members.as_deref(),
                extensions.as_deref(),
            )),
            ListCommands::Remove { name, member } => {
                run_sync(cli::handle_list_remove(config, &name, &member))
            }
            ListCommands::SetType {
                name,
                member,
                object_type,
            } => run_sync(cli::handle_list_set_type(
                config,
                &name,
                &member,
                &object_type,
            )),
            ListCommands::Edit {
                name,
                description,
                to_library,
                to_file,
            } => run_sync(cli::handle_list_edit(
                config,
                &name,
                description.as_deref(),
                to_library.as_deref(),
                to_file.as_deref(),
            )),
            ListCommands::Convert { name, yes } => {
                run_async(cli::handle_list_convert(config, &name, yes))
            }
        },

        Commands::Params(command) => match command {
            ParamsCommands::Show => run_sync(cli::handle_params_show(config)),
            ParamsCommands::Set { key, value } => {
                run_sync(cli::handle_params_set(config, &key, &value))
            }
            ParamsCommands::Reset { yes } => run_sync(cli::handle_params_reset(config, yes)),
        },

        Commands::Fetch { path, output } => {
            run_async(cli::handle_fetch(config, &path, output.as_deref()))
        }

        Commands::Check => run_async(cli::handle_check(config)),

        Commands::Interactive => run_sync(cli::interactive::run_interactive_mode(config)),
    }
}

fn run_sync(result: anyhow::Result<()>) {
    if let Err(err) = result {
        fail(err);
    }
}

fn run_async<F>(future: F)
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    let runtime = tokio::runtime::Runtime::new().expect("failed to initialize async runtime");
    if let Err(err) = runtime.block_on(future) {
        fail(err);
    }
}

fn fail(err: anyhow::Error) -> ! {
    eprintln!("{}", "❌ Command failed!".red().bold());
    eprintln!("{}", format!("Error: {err}").red());
    std::process::exit(1);
}
