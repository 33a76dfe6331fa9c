//! Opening-line removal.
//!
//! Older notebooks open with a title, a blank line, and a bold one-line
//! summary:
//!
//! ```text
//! # Attention
//!
//! **How tokens look at each other.**
//! ```
//!
//! The blank line and the bold line are removed; everything else in the cell
//! is left byte-identical.

use crate::constants;
use crate::notebook::{discover, CellKind, Notebook, NotebookError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a notebook is left untouched.
#[derive(Error, Debug)]
pub enum StripError {
    /// The notebook could not be loaded or saved.
    #[error(transparent)]
    Notebook(#[from] NotebookError),

    /// The notebook has no cells.
    #[error("no cells found")]
    NoCells,

    /// The first cell is code, raw, or not an object.
    #[error("first cell is not markdown")]
    NotMarkdown,

    /// The first cell has fewer than three lines.
    #[error("not enough lines in first cell")]
    TooFewLines,

    /// Line 0 does not start with `#`.
    #[error("first line is not a title: {0}")]
    NoTitle(String),

    /// Line 1 is not blank.
    #[error("second line is not blank: {0:?}")]
    SecondLineNotBlank(String),

    /// Line 2 is not wrapped in `**`.
    #[error("third line is not bold text: {0}")]
    NotBold(String),
}

/// Result type alias for opening-line removal.
pub type Result<T> = std::result::Result<T, StripError>;

fn snippet(line: &str) -> String {
    line.chars().take(constants::DIAGNOSTIC_SNIPPET_CHARS).collect()
}

fn is_bold(line: &str) -> bool {
    line.starts_with("**") && line.ends_with("**")
}

/// Removes the blank line and bold line that follow the title in the first
/// cell.
///
/// # Errors
///
/// Returns the first validation failure; the notebook is unchanged in that
/// case.
pub fn strip_opening_lines(notebook: &mut Notebook) -> Result<()> {
    if !notebook.has_cells() {
        return Err(StripError::NoCells);
    }
    let mut cell = notebook.first_cell_mut().ok_or(StripError::NotMarkdown)?;
    if cell.as_cell().kind() != CellKind::Markdown {
        return Err(StripError::NotMarkdown);
    }

    let source = cell.as_cell().source();
    let lines = source.lines();
    if lines.len() < 3 {
        return Err(StripError::TooFewLines);
    }

    let (title, blank, bold) = (lines[0].trim(), lines[1].trim(), lines[2].trim());
    if !title.starts_with('#') {
        return Err(StripError::NoTitle(snippet(title)));
    }
    if !blank.is_empty() {
        return Err(StripError::SecondLineNotBlank(snippet(blank)));
    }
    if !is_bold(bold) {
        return Err(StripError::NotBold(snippet(bold)));
    }

    let mut kept = Vec::with_capacity(lines.len() - 2);
    kept.push(lines[0].clone());
    kept.extend_from_slice(&lines[3..]);
    cell.set_source(source.with_lines(&kept));
    Ok(())
}

/// Loads `path`, strips its opening lines, and saves it. Nothing is written
/// unless every check passes.
///
/// # Errors
///
/// Returns an error if loading, validation, or saving fails.
pub fn strip_file(path: &Path) -> Result<()> {
    let mut notebook = Notebook::load(path)?;
    strip_opening_lines(&mut notebook)?;
    notebook.save(path)?;
    Ok(())
}

/// Outcome counts for a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StripSummary {
    /// Notebooks considered.
    pub total: usize,
    /// Notebooks rewritten.
    pub modified: usize,
    /// Missing files and files left untouched because of an error.
    pub errors: usize,
}

impl StripSummary {
    /// Whether every notebook was modified without error.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Notebooks a batch covers: the configured list (relative to `root`) or,
/// when it is empty, every notebook below `root`. `directory` narrows either.
pub fn batch_targets(
    root: &Path,
    configured: &[String],
    exclude_dirs: &[String],
    directory: Option<&str>,
) -> Vec<PathBuf> {
    let paths = if configured.is_empty() {
        discover::all_notebooks(root, exclude_dirs)
    } else {
        configured.iter().map(|rel| root.join(rel)).collect()
    };
    match directory {
        Some(dir) => discover::filter_by_directory(root, paths, dir),
        None => paths,
    }
}

/// Runs [`strip_file`] over `paths`, printing one progress line per notebook.
pub fn strip_all(root: &Path, paths: &[PathBuf]) -> StripSummary {
    let mut summary = StripSummary {
        total: paths.len(),
        ..StripSummary::default()
    };

    for path in paths {
        let rel = discover::relative(root, path);
        if !path.exists() {
            eprintln!("{}{}", constants::CLI_MSG_NOT_FOUND, path.display());
            summary.errors += 1;
            continue;
        }

        match strip_file(path) {
            Ok(()) => {
                println!("{}{rel}... {}", constants::CLI_MSG_PROCESSING, constants::CLI_MSG_OK);
                log::info!("event=strip module=strip status=ok path={rel}");
                summary.modified += 1;
            }
            Err(err) => {
                println!("{}{rel}... {}", constants::CLI_MSG_PROCESSING, constants::CLI_MSG_FAIL);
                log::error!("event=strip module=strip status=error path={rel} reason={err}");
                summary.errors += 1;
            }
        }
    }

    summary
}
