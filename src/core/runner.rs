//! Batch notebook execution.
//!
//! Each selected notebook is handed to an external command (by default
//! `jupyter nbconvert --execute --inplace`) one at a time, in sorted order.
//! The command's exit status is logged but never fails the batch.

use crate::constants;
use crate::notebook::discover;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Program and argument template for executing one notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    program: String,
    args: Vec<String>,
}

impl RunCommand {
    /// Builds a command from `[program, args...]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is empty.
    pub fn from_template(template: &[String]) -> Result<Self, String> {
        let (program, args) = template
            .split_first()
            .ok_or_else(|| "run command is empty".to_string())?;
        if program.trim().is_empty() {
            return Err("run command has an empty program name".to_string());
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Arguments with `{notebook}` replaced by `notebook`. If no argument
    /// mentions the placeholder, the notebook is appended.
    #[must_use]
    pub fn args_for(&self, notebook: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(constants::NOTEBOOK_PLACEHOLDER, notebook))
            .collect();
        if !self
            .args
            .iter()
            .any(|a| a.contains(constants::NOTEBOOK_PLACEHOLDER))
        {
            args.push(notebook.to_string());
        }
        args
    }

    /// Runs the command for one notebook with `root` as working directory and
    /// waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    pub fn execute(&self, root: &Path, notebook: &str) -> std::io::Result<ExitStatus> {
        Command::new(&self.program)
            .args(self.args_for(notebook))
            .current_dir(root)
            .status()
    }
}

/// Outcome counts for a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Notebooks selected.
    pub selected: usize,
    /// Runs that exited successfully.
    pub succeeded: usize,
    /// Runs that exited with a failure status.
    pub nonzero_exit: usize,
    /// Runs whose process could not be started.
    pub failed_to_launch: usize,
}

/// Notebooks selected for `directory` (or the default pattern) below `root`.
pub fn select(root: &Path, directory: Option<&str>) -> Vec<PathBuf> {
    discover::run_targets(root, directory)
}

/// Executes every notebook in `targets`, sequentially and without retry.
pub fn run_all(root: &Path, targets: &[PathBuf], command: &RunCommand) -> RunSummary {
    let mut summary = RunSummary {
        selected: targets.len(),
        ..RunSummary::default()
    };

    for target in targets {
        let rel = discover::relative(root, target);
        println!("{}{rel}", constants::CLI_MSG_RUNNING);

        match command.execute(root, &rel) {
            Ok(status) if status.success() => {
                log::info!("event=run module=runner status=ok path={rel}");
                summary.succeeded += 1;
            }
            Ok(status) => {
                log::warn!("event=run module=runner status=nonzero path={rel} exit={status}");
                summary.nonzero_exit += 1;
            }
            Err(err) => {
                log::error!(
                    "event=run module=runner status=error path={rel} program={} reason={err}",
                    command.program
                );
                summary.failed_to_launch += 1;
            }
        }
    }

    summary
}
