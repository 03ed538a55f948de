use super::{read_content, write_json};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use elemental_codec::remove_channel as remove;
use elemental_proto::Channel;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct RemoveChannelArgs {
    /// Elemental content JSON file
    pub input: PathBuf,

    /// Channel to remove
    pub channel: Channel,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite the input file
    #[arg(long, conflicts_with = "out")]
    pub in_place: bool,
}

pub fn remove_channel(args: RemoveChannelArgs, cwd: &Path) -> Result<()> {
    let content = read_content(cwd, &args.input)?;

    if content.channel(args.channel).is_none() {
        return Err(anyhow!(
            "{} has no {} channel",
            args.input.display(),
            args.channel
        ));
    }

    let updated = remove(&content, args.channel);
    info!(channel = %args.channel, remaining = updated.elements.len(), "Removed channel");
    eprintln!(
        "{} Removed {} ({} channel(s) left)",
        "✂".bright_blue(),
        args.channel.to_string().bold(),
        updated.elements.len()
    );

    let out = if args.in_place {
        Some(args.input.as_path())
    } else {
        args.out.as_deref()
    };
    write_json(cwd, out, &updated)
}
