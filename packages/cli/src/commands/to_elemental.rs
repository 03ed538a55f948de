use super::{read_content, report_diagnostics, resolve, write_json};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use elemental_codec::{apply_channel_update, parse_json, Codec, CodecOptions, EditingState};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct ToElementalArgs {
    /// Editing state JSON file (as written by `to-tree`)
    pub state: PathBuf,

    /// Existing Elemental document to patch. Without it a new document is
    /// created holding only this channel.
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Write attributes even when they hold their default value
    #[arg(long)]
    pub emit_defaults: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn to_elemental(args: ToElementalArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;

    let path = resolve(cwd, &args.state);
    let source =
        fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;
    let state: EditingState = parse_json(&source)
        .with_context(|| format!("Cannot decode editing state {}", path.display()))?;

    let existing = args
        .content
        .as_deref()
        .map(|content| read_content(cwd, content))
        .transpose()?;

    let options = CodecOptions {
        emit_default_attributes: args.emit_defaults || config.emit_default_attributes,
    };
    let converted = Codec::new(options).to_elemental(&state);
    report_diagnostics(state.channel.as_str(), &converted.diagnostics, config.fail_on_diagnostics)?;

    let patched = existing.is_some();
    let updated = apply_channel_update(existing.as_ref(), converted.value);
    write_json(cwd, args.out.as_deref(), &updated)?;
    info!(channel = %state.channel, patched, "Wrote channel patch");
    Ok(())
}
