use super::{read_content, report_diagnostics, resolve, write_json};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use elemental_codec::Codec;
use elemental_editor::{EditSession, Mutation};
use elemental_proto::Channel;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Elemental content JSON file
    pub input: PathBuf,

    /// JSON file holding an array of mutations
    #[arg(short, long)]
    pub mutations: PathBuf,

    /// Channel to edit (defaults to the configured channel)
    #[arg(short, long)]
    pub channel: Option<Channel>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite the input file
    #[arg(long, conflicts_with = "out")]
    pub in_place: bool,
}

pub fn edit(args: EditArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let channel = args.channel.unwrap_or(config.default_channel);
    let content = read_content(cwd, &args.input)?;

    let path = resolve(cwd, &args.mutations);
    let source =
        fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&source)
        .with_context(|| format!("Cannot decode mutations {}", path.display()))?;

    let mut session = EditSession::open(
        Codec::new(config.codec_options()),
        Some(content.clone()),
        channel,
        config.session_config(),
    );
    report_diagnostics(channel.as_str(), session.diagnostics(), config.fail_on_diagnostics)?;

    for (index, mutation) in mutations.into_iter().enumerate() {
        let name = mutation.name();
        debug!(index, mutation = name, "Applying mutation");
        session
            .apply(mutation, Instant::now())
            .with_context(|| format!("Mutation #{} ({}) failed", index + 1, name))?;
        eprintln!("  {} {}", "✓".green(), name);
    }

    let updated = session.flush().unwrap_or(content);
    info!(%channel, undo_steps = session.history().undo_levels(), "Edited channel");

    let out = if args.in_place {
        Some(args.input.as_path())
    } else {
        args.out.as_deref()
    };
    write_json(cwd, out, &updated)
}
