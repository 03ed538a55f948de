pub mod check;
pub mod defaults;
pub mod edit;
pub mod remove_channel;
pub mod to_elemental;
pub mod to_tree;

pub use check::{check, CheckArgs};
pub use defaults::{defaults, DefaultsArgs};
pub use edit::{edit, EditArgs};
pub use remove_channel::{remove_channel, RemoveChannelArgs};
pub use to_elemental::{to_elemental, ToElementalArgs};
pub use to_tree::{to_tree, ToTreeArgs};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use elemental_codec::{decode_content, Diagnostic, DiagnosticLevel};
use elemental_proto::ElementalContent;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve `path` against the working directory
pub(crate) fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

pub(crate) fn read_content(cwd: &Path, path: &Path) -> Result<ElementalContent> {
    let path = resolve(cwd, path);
    let source =
        fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;
    let content =
        decode_content(&source).with_context(|| format!("Cannot decode {}", path.display()))?;
    debug!(path = %path.display(), channels = content.elements.len(), "Read content");
    Ok(content)
}

/// Write JSON to `out`, or to stdout when no file is given
pub(crate) fn write_json<T: Serialize>(cwd: &Path, out: Option<&Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match out {
        Some(out) => {
            let path = resolve(cwd, out);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, json + "\n")?;
            eprintln!("  {} {}", "✓".green(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Print diagnostics to stderr. Fails when `strict` and any warning was seen.
pub(crate) fn report_diagnostics(label: &str, diagnostics: &[Diagnostic], strict: bool) -> Result<()> {
    let mut warnings = 0;

    for diagnostic in diagnostics {
        match diagnostic.level {
            DiagnosticLevel::Warning => {
                warnings += 1;
                eprintln!("  {} {} {}", "warning".yellow().bold(), label, diagnostic);
            }
            DiagnosticLevel::Info => {
                eprintln!("  {} {} {}", "info".dimmed(), label, diagnostic);
            }
        }
    }

    if strict && warnings > 0 {
        return Err(anyhow!("{} reported {} warning(s)", label, warnings));
    }
    Ok(())
}
