use std::io::{self, Write};

use dialoguer::console::{Style, StyledObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tint {
    Cyan,
    BrightCyan,
}

/// Writes user-facing output.
///
/// Consecutive `info` lines alternate between two tints so long listings stay
/// readable; the alternation state lives here rather than in a global.
pub struct Printer<W: Write> {
    out: W,
    styled: bool,
    last_tint: Option<Tint>,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, styled: bool) -> Self {
        Self {
            out,
            styled,
            last_tint: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint<'a>(&self, style: Style, text: &'a str) -> StyledObject<&'a str> {
        style.force_styling(self.styled).apply_to(text)
    }

    pub fn title(&mut self, text: &str) -> io::Result<()> {
        let styled = self.paint(Style::new().green().bold(), text);
        writeln!(self.out, "\n{}", styled)
    }

    pub fn status(&mut self, text: &str) -> io::Result<()> {
        let styled = self.paint(Style::new().blue().bold(), text);
        writeln!(self.out, "\n{}\n", styled)
    }

    pub fn warn(&mut self, text: &str) -> io::Result<()> {
        let styled = self.paint(Style::new().yellow().bold(), text);
        writeln!(self.out, "{}", styled)
    }

    pub fn info(&mut self, text: &str) -> io::Result<()> {
        let tint = match self.last_tint {
            Some(Tint::Cyan) => Tint::BrightCyan,
            _ => Tint::Cyan,
        };
        self.last_tint = Some(tint);

        let style = match tint {
            Tint::Cyan => Style::new().cyan(),
            Tint::BrightCyan => Style::new().cyan().bright(),
        };
        let styled = self.paint(style, text);
        writeln!(self.out, "{}", styled)
    }

    /// Unstyled output, used for machine-readable listings.
    pub fn plain(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    /// Prints `names` as a one-indexed list.
    pub fn numbered(&mut self, names: &[String]) -> io::Result<()> {
        for (i, name) in names.iter().enumerate() {
            self.info(&format!("{:2}. {}", i + 1, name))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    Failed(String),
}

/// Outcome of every attempted deletion, in the order attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub outcomes: Vec<(String, DeletionOutcome)>,
}

impl DeletionReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn deleted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == DeletionOutcome::Deleted)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            DeletionOutcome::Failed(message) => Some((name.as_str(), message.as_str())),
            DeletionOutcome::Deleted => None,
        })
    }

    pub fn render<W: Write>(&self, printer: &mut Printer<W>) -> io::Result<()> {
        let failed = self.total() - self.deleted();

        if failed > 0 {
            printer.status("Failed to delete the following branches:")?;
            for (name, message) in self.failures() {
                printer.warn(&format!("Branch: {} - Error: {}", name, message))?;
            }
        }

        printer.status(&format!(
            "{} out of {} {} {} deleted.",
            self.deleted(),
            self.total(),
            branch_noun(self.total()),
            were(self.total())
        ))?;

        if failed > 0 {
            printer.warn(&format!(
                "{} {} {} not deleted due to errors.",
                failed,
                branch_noun(failed),
                were(failed)
            ))?;
        }
        Ok(())
    }
}

pub fn branch_noun(count: usize) -> &'static str {
    if count == 1 { "branch" } else { "branches" }
}

fn were(count: usize) -> &'static str {
    if count == 1 { "was" } else { "were" }
}
