mod cli;
mod error;
mod git;
mod logging;
mod report;
mod selection;
mod workflow;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::{Action, Cli};
use crate::git::{GitCli, Repository};
use crate::report::Printer;
use crate::selection::{SelectionRequest, select};
use crate::workflow::{DeleteOptions, Resolution, confirm_and_delete};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.global.resolve();
    logging::init(settings.verbosity);

    let git = GitCli::new(settings.git, settings.repo);
    let mut printer = Printer::new(io::stdout().lock(), settings.styled);

    match cli.command.into_action() {
        Action::List { json } => list_branches(&git, json, &mut printer),
        Action::Delete {
            request,
            mode,
            dry_run,
        } => {
            let options = DeleteOptions { mode, dry_run };
            let resolution =
                delete_selected(&git, &request, options, &mut io::stdin().lock(), &mut printer)?;
            match &resolution {
                Resolution::Executed(report) => info!(
                    event = "workflow.done",
                    deleted = report.deleted(),
                    total = report.total()
                ),
                Resolution::DryRun(candidates) => {
                    info!(event = "workflow.dry_run", candidates = candidates.len())
                }
                Resolution::NothingToDo | Resolution::Cancelled => {}
            }
            Ok(())
        }
        Action::Completions(shell) => {
            printer.plain(cli::completion_script(shell).trim_end())?;
            Ok(())
        }
    }
}

fn list_branches<R: Repository, W: Write>(
    repo: &R,
    json: bool,
    printer: &mut Printer<W>,
) -> Result<()> {
    let snapshot = repo.enumerate().context("Error listing branches")?;
    let sorted = snapshot.sorted();

    if json {
        printer.plain(&serde_json::to_string(&sorted)?)?;
        return Ok(());
    }

    printer.title(if sorted.len() == 1 { "Branch" } else { "Branches" })?;
    printer.numbered(&sorted)?;
    Ok(())
}

fn delete_selected<R: Repository, I: BufRead, W: Write>(
    repo: &R,
    request: &SelectionRequest,
    options: DeleteOptions,
    input: &mut I,
    printer: &mut Printer<W>,
) -> Result<Resolution> {
    let snapshot = repo.enumerate().context("Error listing branches")?;
    let selection = select(&snapshot, request);

    for warning in &selection.warnings {
        printer.warn(&warning.to_string())?;
    }

    if selection.branches.is_empty() && !matches!(request, SelectionRequest::Keep(_)) {
        printer.status("No branches match the given pattern.")?;
        return Ok(Resolution::NothingToDo);
    }

    let resolution = confirm_and_delete(
        repo,
        selection.branches,
        snapshot.current.as_deref(),
        options,
        input,
        printer,
    )?;
    Ok(resolution)
}
