use super::write_json;
use anyhow::Result;
use clap::Args;
use elemental_codec::{channel_defaults, default_channel_node};
use elemental_proto::{Channel, ElementalContent};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct DefaultsArgs {
    /// Channels to include (all channels when omitted)
    pub channels: Vec<Channel>,

    /// Print the bare node list of a single channel
    #[arg(long)]
    pub nodes: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn defaults(args: DefaultsArgs, cwd: &Path) -> Result<()> {
    let channels = if args.channels.is_empty() {
        Channel::ALL.to_vec()
    } else {
        args.channels
    };

    if args.nodes {
        let [channel] = channels.as_slice() else {
            anyhow::bail!("--nodes needs exactly one channel");
        };
        return write_json(cwd, args.out.as_deref(), &channel_defaults(*channel));
    }

    let content = ElementalContent::new(channels.into_iter().map(default_channel_node).collect());
    write_json(cwd, args.out.as_deref(), &content)
}
