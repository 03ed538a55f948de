mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, defaults, edit, remove_channel, to_elemental, to_tree, CheckArgs, DefaultsArgs,
    EditArgs, RemoveChannelArgs, ToElementalArgs, ToTreeArgs,
};
use tracing_subscriber::EnvFilter;

/// Elemental CLI - convert and check Elemental notification content
#[derive(Parser, Debug)]
#[command(name = "elemental")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one channel of a document into the editing tree
    ToTree(ToTreeArgs),

    /// Convert an editing tree back and patch it into a document
    ToElemental(ToElementalArgs),

    /// Check that every channel survives a round trip through the editor
    Check(CheckArgs),

    /// Print the starter content of new channels
    Defaults(DefaultsArgs),

    /// Apply a list of editor mutations to one channel
    Edit(EditArgs),

    /// Remove a channel from a document
    RemoveChannel(RemoveChannelArgs),
}

fn main() {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::ToTree(args) => to_tree(args, &cwd),
            Command::ToElemental(args) => to_elemental(args, &cwd),
            Command::Check(args) => check(args, &cwd),
            Command::Defaults(args) => defaults(args, &cwd),
            Command::Edit(args) => edit(args, &cwd),
            Command::RemoveChannel(args) => remove_channel(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
