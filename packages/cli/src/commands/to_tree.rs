use super::{read_content, report_diagnostics, write_json};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use elemental_codec::{default_channel_node, Codec};
use elemental_proto::Channel;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct ToTreeArgs {
    /// Elemental content JSON file
    pub input: PathBuf,

    /// Channel to open (defaults to the configured channel)
    #[arg(short, long)]
    pub channel: Option<Channel>,

    /// Start from channel defaults when the document lacks the channel
    #[arg(long)]
    pub bootstrap: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Fail when the conversion reports warnings
    #[arg(long)]
    pub fail_on_diagnostics: bool,
}

pub fn to_tree(args: ToTreeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let channel = args.channel.unwrap_or(config.default_channel);
    let content = read_content(cwd, &args.input)?;

    let node = match content.channel(channel) {
        Some(node) => node.clone(),
        None if args.bootstrap => default_channel_node(channel),
        None => {
            return Err(anyhow!(
                "{} has no {} channel (pass --bootstrap to start from defaults)",
                args.input.display(),
                channel
            ));
        }
    };

    let converted = Codec::new(config.codec_options()).to_editing_tree(&node);
    report_diagnostics(
        channel.as_str(),
        &converted.diagnostics,
        args.fail_on_diagnostics || config.fail_on_diagnostics,
    )?;

    write_json(cwd, args.out.as_deref(), &converted.value)?;
    info!(
        input = %args.input.display(),
        %channel,
        bootstrapped = content.channel(channel).is_none(),
        "Wrote editing tree"
    );
    Ok(())
}
