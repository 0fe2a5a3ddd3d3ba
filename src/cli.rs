use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use dialoguer::console;

use crate::git::DeleteMode;
use crate::selection::SelectionRequest;

#[derive(Parser)]
#[command(name = "gbm")]
#[command(about = "List local git branches and delete them in bulk")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Run git in this directory instead of the current one
    #[arg(short = 'C', long = "repo", global = true, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Git executable to invoke
    #[arg(long, global = true, default_value = "git", value_name = "PROGRAM")]
    pub git: String,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Global options after defaults and terminal detection are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub git: String,
    pub repo: Option<PathBuf>,
    pub styled: bool,
    pub verbosity: u8,
}

impl GlobalArgs {
    pub fn resolve(self) -> Settings {
        Settings {
            git: self.git,
            repo: self.repo,
            styled: self.color.enabled(),
            verbosity: self.verbose,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => console::colors_enabled(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List branches sorted by name, numbered for use with `delete`
    #[command(alias = "ls")]
    List {
        /// Print the sorted names as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Delete every branch except the named ones and the current branch
    Keep(KeepArgs),
    /// Like `keep`, but force-deletes unmerged branches
    #[command(name = "Keep")]
    ForceKeep(KeepArgs),
    /// Delete branches matching a pattern (`feat*`, `*-old`, `*wip*`) or index spec (`2,4-6`)
    Delete(DeleteArgs),
    /// Like `delete`, but force-deletes unmerged branches
    #[command(name = "Delete")]
    ForceDelete(DeleteArgs),
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct KeepArgs {
    /// Branches to keep
    #[arg(required = true, value_name = "BRANCH")]
    pub branches: Vec<String>,

    #[command(flatten)]
    pub delete: DeleteFlags,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Pattern with optional leading/trailing `*`, or comma separated indices and ranges
    #[arg(value_name = "PATTERN|INDICES", allow_hyphen_values = true)]
    pub target: String,

    #[command(flatten)]
    pub delete: DeleteFlags,
}

#[derive(Args, Debug)]
pub struct DeleteFlags {
    /// Delete even if the branch is not fully merged
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be deleted without prompting or deleting
    #[arg(long)]
    pub dry_run: bool,
}

/// A parsed command, with the selection variant decided once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List {
        json: bool,
    },
    Delete {
        request: SelectionRequest,
        mode: DeleteMode,
        dry_run: bool,
    },
    Completions(Shell),
}

impl Commands {
    pub fn into_action(self) -> Action {
        match self {
            Commands::List { json } => Action::List { json },
            Commands::Keep(args) => keep_action(args, false),
            Commands::ForceKeep(args) => keep_action(args, true),
            Commands::Delete(args) => delete_action(args, false),
            Commands::ForceDelete(args) => delete_action(args, true),
            Commands::Completions { shell } => Action::Completions(shell),
        }
    }
}

fn keep_action(args: KeepArgs, force: bool) -> Action {
    Action::Delete {
        request: SelectionRequest::Keep(args.branches),
        mode: DeleteMode::from_force(force || args.delete.force),
        dry_run: args.delete.dry_run,
    }
}

fn delete_action(args: DeleteArgs, force: bool) -> Action {
    Action::Delete {
        request: SelectionRequest::from_argument(&args.target),
        mode: DeleteMode::from_force(force || args.delete.force),
        dry_run: args.delete.dry_run,
    }
}

/// Renders a completion script for `shell`.
pub fn completion_script(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "gbm", &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
