use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::error::Result;
use crate::git::{DeleteMode, Repository};
use crate::report::{DeletionOutcome, DeletionReport, Printer, branch_noun};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    pub mode: DeleteMode,
    pub dry_run: bool,
}

/// How a confirm-and-delete run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NothingToDo,
    Cancelled,
    DryRun(Vec<String>),
    Executed(DeletionReport),
}

/// Removes the checked-out branch from `candidates`.
///
/// Returns the remaining branches and whether anything was removed.
pub fn filter_current(candidates: Vec<String>, current: Option<&str>) -> (Vec<String>, bool) {
    let Some(current) = current else {
        return (candidates, false);
    };
    let before = candidates.len();
    let kept: Vec<String> = candidates.into_iter().filter(|b| b != current).collect();
    let removed = kept.len() != before;
    (kept, removed)
}

/// Asks until the user types `yes` or `no`. End of input counts as `no`.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, printer: &mut Printer<W>) -> Result<bool> {
    loop {
        printer.warn("\nType 'yes' to confirm deletion or 'no' to cancel:\n")?;
        printer.flush()?;

        let mut buf = Vec::new();
        if input.read_until(b'\n', &mut buf)? == 0 {
            debug!(event = "workflow.prompt.eof");
            printer.status("Deletion cancelled")?;
            return Ok(false);
        }
        printer.plain("")?;

        // lossy: undecodable input falls through to a re-prompt
        let line = String::from_utf8_lossy(&buf);
        match line.trim() {
            "yes" => return Ok(true),
            "no" => {
                printer.status("Deletion cancelled")?;
                return Ok(false);
            }
            other => debug!(event = "workflow.prompt.retry", answer = other),
        }
    }
}

/// Attempts every candidate in order; a failed deletion never stops the batch.
pub fn delete_all<R: Repository, W: Write>(
    repo: &R,
    candidates: &[String],
    mode: DeleteMode,
    printer: &mut Printer<W>,
) -> Result<DeletionReport> {
    match candidates {
        [only] => printer.title(&format!("Deleting branch {}...", only))?,
        _ => printer.title(&format!("Deleting {} branches...", candidates.len()))?,
    }

    let mut report = DeletionReport::default();
    for branch in candidates {
        let outcome = match repo.delete_branch(branch, mode) {
            Ok(()) => {
                printer.info(&format!("Deleted branch {}", branch))?;
                DeletionOutcome::Deleted
            }
            Err(message) => DeletionOutcome::Failed(message),
        };
        report.outcomes.push((branch.clone(), outcome));
    }
    Ok(report)
}

/// Filter, prompt, execute and report.
pub fn confirm_and_delete<R, I, W>(
    repo: &R,
    candidates: Vec<String>,
    current: Option<&str>,
    options: DeleteOptions,
    input: &mut I,
    printer: &mut Printer<W>,
) -> Result<Resolution>
where
    R: Repository,
    I: BufRead,
    W: Write,
{
    let (candidates, protected) = filter_current(candidates, current);
    if let (true, Some(current)) = (protected, current) {
        info!(event = "workflow.current_protected", branch = current);
        printer.status(&format!("Current branch ({}) cannot be deleted.", current))?;
    }

    if candidates.is_empty() {
        printer.status("No branches to delete.")?;
        return Ok(Resolution::NothingToDo);
    }

    let noun = branch_noun(candidates.len());
    if options.dry_run {
        printer.title(&format!("The following {} would be deleted:", noun))?;
        printer.numbered(&candidates)?;
        return Ok(Resolution::DryRun(candidates));
    }

    printer.title(&format!("The following {} will be deleted:", noun))?;
    printer.numbered(&candidates)?;

    if !confirm(input, printer)? {
        info!(event = "workflow.cancelled", candidates = candidates.len());
        return Ok(Resolution::Cancelled);
    }

    let report = delete_all(repo, &candidates, options.mode, printer)?;
    report.render(printer)?;
    Ok(Resolution::Executed(report))
}
