use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::git::Snapshot;

static INDEX_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9,\-]+$").expect("index spec regex"));
static SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)$").expect("index regex"));
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("range regex"));

/// What the user asked to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRequest {
    /// Delete everything except these names.
    Keep(Vec<String>),
    Pattern(WildcardPattern),
    /// Comma separated 1-based indices and `a-b` ranges over the sorted listing.
    Indices(String),
}

impl SelectionRequest {
    /// Routes a `delete` argument: digits, commas and hyphens only means an
    /// index spec, anything else is a pattern.
    pub fn from_argument(arg: &str) -> Self {
        if INDEX_SPEC.is_match(arg) {
            Self::Indices(arg.to_string())
        } else {
            Self::Pattern(WildcardPattern::parse(arg))
        }
    }
}

/// A branch name with optional `*` markers at either end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    bare: String,
    leading: bool,
    trailing: bool,
}

impl WildcardPattern {
    pub fn parse(raw: &str) -> Self {
        Self {
            bare: raw.trim_matches('*').to_string(),
            leading: raw.starts_with('*'),
            trailing: raw.ends_with('*'),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match (self.leading, self.trailing) {
            (true, true) => name.contains(&self.bare),
            (true, false) => name.ends_with(&self.bare),
            (false, true) => name.starts_with(&self.bare),
            (false, false) => name == self.bare,
        }
    }
}

/// A token of an index spec that could not be honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    Malformed(String),
    OutOfRange { token: String, available: usize },
    Inverted { token: String },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(token) => write!(f, "Ignoring '{}': not an index or range", token),
            Self::OutOfRange { token, available } => write!(
                f,
                "Ignoring '{}': index out of range (1-{})",
                token, available
            ),
            Self::Inverted { token } => {
                write!(f, "Ignoring '{}': range start is after its end", token)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub branches: Vec<String>,
    pub warnings: Vec<SelectionWarning>,
}

/// Computes deletion candidates. Keep and pattern selections follow snapshot
/// order; index selections follow token order and may repeat a branch.
pub fn select(snapshot: &Snapshot, request: &SelectionRequest) -> Selection {
    match request {
        SelectionRequest::Keep(keep) => Selection {
            branches: snapshot
                .branches
                .iter()
                .filter(|b| !b.is_empty() && !keep.contains(*b))
                .cloned()
                .collect(),
            warnings: Vec::new(),
        },
        SelectionRequest::Pattern(pattern) => Selection {
            branches: snapshot
                .branches
                .iter()
                .filter(|b| pattern.matches(b))
                .cloned()
                .collect(),
            warnings: Vec::new(),
        },
        SelectionRequest::Indices(spec) => select_indices(&snapshot.sorted(), spec),
    }
}

fn select_indices(sorted: &[String], spec: &str) -> Selection {
    let mut selection = Selection::default();

    for token in spec.split(',') {
        match resolve_token(token, sorted.len()) {
            Ok(range) => selection.branches.extend_from_slice(&sorted[range]),
            Err(warning) => {
                info!(event = "selection.token_skipped", token = token, reason = %warning);
                selection.warnings.push(warning);
            }
        }
    }

    selection
}

/// Maps one token to a zero-based slice range.
fn resolve_token(
    token: &str,
    available: usize,
) -> Result<std::ops::Range<usize>, SelectionWarning> {
    let (start, end) = if let Some(caps) = SINGLE.captures(token) {
        let n = parse_index(&caps[1], token)?;
        (n, n)
    } else if let Some(caps) = RANGE.captures(token) {
        (parse_index(&caps[1], token)?, parse_index(&caps[2], token)?)
    } else {
        return Err(SelectionWarning::Malformed(token.to_string()));
    };

    if start > end {
        return Err(SelectionWarning::Inverted {
            token: token.to_string(),
        });
    }
    if start == 0 || end > available {
        return Err(SelectionWarning::OutOfRange {
            token: token.to_string(),
            available,
        });
    }

    Ok(start - 1..end)
}

fn parse_index(digits: &str, token: &str) -> Result<usize, SelectionWarning> {
    digits
        .parse()
        .map_err(|_| SelectionWarning::Malformed(token.to_string()))
}
