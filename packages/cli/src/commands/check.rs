use super::{read_content, report_diagnostics};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use elemental_codec::{normalize_channel, Codec};
use elemental_proto::{Channel, ChannelNode};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Elemental content JSON files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Only check this channel
    #[arg(short, long)]
    pub channel: Option<Channel>,

    /// Print normalized before/after JSON for diverging channels
    #[arg(short, long)]
    pub verbose: bool,

    /// Fail when a conversion reports warnings
    #[arg(long)]
    pub fail_on_diagnostics: bool,
}

/// Outcome of converting one channel to the tree and back
#[derive(Debug)]
pub struct ChannelCheck {
    pub channel: Channel,
    pub expected: ChannelNode,
    pub actual: ChannelNode,
    pub warnings: usize,
}

impl ChannelCheck {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Round-trip `node` and compare both sides after normalization
pub fn check_channel(codec: &Codec, node: &ChannelNode) -> (ChannelCheck, Vec<elemental_codec::Diagnostic>) {
    let converted = codec.round_trip(node);
    let warnings = converted.warnings().count();
    let expected = normalize_channel(codec.registry(), node);
    let actual = normalize_channel(codec.registry(), &converted.value.into_channel_node());

    (
        ChannelCheck {
            channel: node.channel,
            expected,
            actual,
            warnings,
        },
        converted.diagnostics,
    )
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let codec = Codec::new(config.codec_options());
    let strict = args.fail_on_diagnostics || config.fail_on_diagnostics;

    println!("🔍 {} round-trip fidelity", "Checking".green().bold());
    println!();

    let mut checked = 0;
    let mut diverged = 0;
    let mut warned = 0;

    for input in &args.inputs {
        let content = read_content(cwd, input)?;
        println!("   {}", input.display());

        for node in &content.elements {
            if args.channel.is_some_and(|channel| channel != node.channel) {
                continue;
            }

            let (result, diagnostics) = check_channel(&codec, node);
            checked += 1;
            debug!(
                input = %input.display(),
                channel = %node.channel,
                passed = result.passed(),
                warnings = result.warnings,
                "Checked channel"
            );

            let label = format!("{}:{}", input.display(), node.channel);
            if report_diagnostics(&label, &diagnostics, strict).is_err() {
                warned += 1;
            }

            if result.passed() {
                println!("     {} {}", "✓".green(), node.channel);
            } else {
                diverged += 1;
                println!("     {} {} {}", "✗".red(), node.channel, "diverged".red());
                if args.verbose {
                    print_divergence(&result)?;
                }
            }
        }
    }

    println!();
    println!("   Channels checked: {}", checked);

    if diverged > 0 {
        return Err(anyhow!("{} channel(s) did not round-trip", diverged));
    }
    if warned > 0 {
        return Err(anyhow!("{} channel(s) reported warnings", warned));
    }

    println!("✨ {} All channels round-trip", "Done".green().bold());
    Ok(())
}

fn print_divergence(result: &ChannelCheck) -> Result<()> {
    println!("       {}", "expected:".dimmed());
    println!("{}", serde_json::to_string_pretty(&result.expected)?);
    println!("       {}", "actual:".dimmed());
    println!("{}", serde_json::to_string_pretty(&result.actual)?);
    Ok(())
}
