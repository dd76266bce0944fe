use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use pubrename::defaults;
use pubrename::refactor::{self, RenameRequest, RenameSummary};
use pubrename::validation;
use pubrename::Error;

use crate::commands::CmdResult;
use crate::tty;

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// New package name
    #[arg(value_name = "NEW_NAME")]
    pub new_name: Option<String>,

    /// New package name (takes precedence over the prompt and NEW_NAME)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Prompt for the new package name
    #[arg(short, long)]
    pub interactive: bool,

    /// Project root containing pubspec.yaml
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log every rewritten file
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the dependency refresh after the package cache is updated
    #[arg(long)]
    pub no_refresh: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command")]
pub enum RenameOutput {
    #[serde(rename = "rename")]
    Rename { root: String, summary: RenameSummary },
    #[serde(rename = "rename.unchanged")]
    Unchanged { root: String, name: String },
}

pub fn run(args: RenameArgs) -> CmdResult<RenameOutput> {
    let root = PathBuf::from(shellexpand::tilde(&args.path).to_string());
    let root_display = root.display().to_string();
    let settings = defaults::load_settings(&root);

    let old_name = refactor::read_manifest_name(&settings.manifest_path(&root))?;
    let new_name = resolve_new_name(&args, &old_name)?;

    // A no-op even when the current name is outside the name grammar.
    if new_name == old_name {
        return Ok((
            RenameOutput::Unchanged {
                root: root_display,
                name: old_name,
            },
            0,
        ));
    }
    validation::require_valid_package_name(&new_name, "name")?;

    let request = RenameRequest {
        old_name,
        new_name,
        dry_run: args.dry_run,
        verbose: args.verbose,
        refresh: !args.no_refresh,
    };
    let summary = refactor::rename_project(&root, &request, &settings)?;

    Ok((
        RenameOutput::Rename {
            root: root_display,
            summary,
        },
        0,
    ))
}

/// `--name` wins, then the interactive prompt, then the positional argument.
fn resolve_new_name(args: &RenameArgs, old_name: &str) -> pubrename::Result<String> {
    if let Some(name) = &args.name {
        return Ok(name.trim().to_string());
    }

    if args.interactive {
        if !tty::is_stdin_tty() {
            return Err(Error::validation_invalid_argument(
                "interactive",
                "Interactive mode requires a terminal on stdin",
                None,
            ));
        }
        return validation::require(tty::ask_package_name(old_name)?, "name");
    }

    validation::require(
        args.new_name.as_ref().map(|name| name.trim().to_string()),
        "name",
    )
}
