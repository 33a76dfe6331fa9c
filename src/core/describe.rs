//! Description extraction for notebook metadata.
//!
//! Site generators read `metadata.description` for SEO and link previews.
//! The description is pulled from the first markdown prose of the notebook,
//! stripped of markup, and cut to a sentence or two.

use crate::config::DescribeConfig;
use crate::constants;
use crate::notebook::{discover, CellKind, Notebook, NotebookError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};

static MYST_DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":::\{[^}]+\}").expect("valid directive regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("valid italic regex"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid code regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#+\s+").expect("valid heading regex"));
static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

/// Removes MyST directive fences and inline markdown, keeping the text.
pub fn clean_markdown(source: &str) -> String {
    let text = MYST_DIRECTIVE_RE.replace_all(source, "");
    let text = text.replace(":::", "");
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = CODE_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = HEADING_RE.replace_all(&text, "");
    text.trim().to_string()
}

/// Splits after `.`, `!` or `?` followed by whitespace. The punctuation stays
/// with its sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END_RE.find_iter(text) {
        // punctuation is one ASCII byte
        sentences.push(&text[start..=m.start()]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Cuts `text` to at most `max_chars` characters, ending in `...` when cut.
/// A limit too small for the ellipsis gets a bare cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let ellipsis = constants::ELLIPSIS.len();
    if max_chars < ellipsis {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - ellipsis).collect();
    out.push_str(constants::ELLIPSIS);
    out
}

fn is_title_only(source: &str) -> bool {
    let trimmed = source.trim();
    trimmed.starts_with('#') && !trimmed.contains('\n')
}

/// Builds a description from the notebook's first markdown prose.
///
/// Returns `None` when no markdown text survives cleanup.
pub fn extract_description(notebook: &Notebook, max_chars: usize) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for cell in notebook.cells() {
        if cell.kind() != CellKind::Markdown {
            continue;
        }
        let source = cell.source().joined();
        if is_title_only(&source) {
            continue;
        }
        let text = clean_markdown(&source);
        if !text.is_empty() {
            parts.push(text);
        }
        if parts.join(" ").chars().count() > constants::DESCRIPTION_COLLECT_CHARS {
            break;
        }
    }

    let joined = parts.join(" ");
    let sentences = split_sentences(&joined);
    let first = sentences.first().copied().unwrap_or_default();
    let description = match sentences.get(1) {
        Some(second) if first.chars().count() < constants::SHORT_SENTENCE_CHARS => {
            format!("{first} {second}")
        }
        _ => first.to_string(),
    };

    let description = truncate_chars(&description, max_chars);
    if description.is_empty() {
        None
    } else {
        Some(description)
    }
}

/// What happened to one notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeOutcome {
    /// `metadata.description` was already set; nothing written.
    AlreadyPresent,
    /// No markdown prose to describe the notebook with.
    NoDescription,
    /// A description was added (or would be, in a dry run).
    Added(String),
}

/// Adds `metadata.description` and `metadata.thumbnail` unless a description
/// is already present. With `dry_run`, nothing is saved.
///
/// # Errors
///
/// Returns an error if the notebook cannot be loaded or saved.
pub fn add_description(
    path: &Path,
    config: &DescribeConfig,
    dry_run: bool,
) -> Result<DescribeOutcome, NotebookError> {
    let mut notebook = Notebook::load(path)?;

    if notebook
        .metadata()
        .is_some_and(|m| m.contains_key("description"))
    {
        return Ok(DescribeOutcome::AlreadyPresent);
    }

    let Some(description) = extract_description(&notebook, config.max_chars) else {
        return Ok(DescribeOutcome::NoDescription);
    };

    notebook.insert_metadata([
        ("description".to_string(), Value::String(description.clone())),
        ("thumbnail".to_string(), Value::String(config.thumbnail.clone())),
    ]);

    if !dry_run {
        notebook.save(path)?;
    }
    Ok(DescribeOutcome::Added(description))
}

/// Outcome counts for a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DescribeSummary {
    /// Notebooks found.
    pub found: usize,
    /// Notebooks given a description.
    pub updated: usize,
    /// Notebooks that already had one.
    pub skipped: usize,
    /// Notebooks with no usable markdown.
    pub undescribed: usize,
    /// Notebooks that failed to load or save.
    pub errors: usize,
}

/// Notebooks a batch covers: every notebook below `root`.
pub fn batch_targets(root: &Path, exclude_dirs: &[String]) -> Vec<PathBuf> {
    discover::all_notebooks(root, exclude_dirs)
}

/// Runs [`add_description`] over `paths`, printing one line per notebook.
pub fn describe_all(paths: &[PathBuf], config: &DescribeConfig, dry_run: bool) -> DescribeSummary {
    let mut summary = DescribeSummary {
        found: paths.len(),
        ..DescribeSummary::default()
    };

    for path in paths {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        match add_description(path, config, dry_run) {
            Ok(DescribeOutcome::AlreadyPresent) => {
                println!("  {} {name} already has description", constants::CLI_MSG_OK);
                summary.skipped += 1;
            }
            Ok(DescribeOutcome::NoDescription) => {
                println!(
                    "  {} {name} - could not extract description",
                    constants::CLI_MSG_WARN
                );
                summary.undescribed += 1;
            }
            Ok(DescribeOutcome::Added(description)) => {
                let preview: String = description
                    .chars()
                    .take(constants::DESCRIPTION_PREVIEW_CHARS)
                    .collect();
                println!("  {} {name}: {preview}...", constants::CLI_MSG_OK);
                summary.updated += 1;
            }
            Err(err) => {
                println!("  {} {name}", constants::CLI_MSG_FAIL);
                log::error!("event=describe module=describe status=error reason={err}");
                summary.errors += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use std::fs;

    fn notebook(value: Value) -> Notebook {
        Notebook::from_value(value, Path::new("test.ipynb")).unwrap()
    }

    fn md(source: &str) -> Value {
        json!({"cell_type": "markdown", "metadata": {}, "source": source})
    }

    #[test]
    fn test_clean_markdown_strips_markup() {
        let cleaned = clean_markdown(
            ":::{note}\nThe **softmax** turns *scores* into `weights`, see [docs](https://x.y/z).\n:::",
        );
        assert_eq!(
            cleaned,
            "The softmax turns scores into weights, see docs."
        );
    }

    #[test]
    fn test_clean_markdown_strips_headings() {
        assert_eq!(clean_markdown("## Setup\nInstall it."), "Setup\nInstall it.");
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two!  Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_sentences("v1.2 is out."), vec!["v1.2 is out."]);
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        let text = "é".repeat(200);
        let out = truncate_chars(&text, 160);
        assert_eq!(out.chars().count(), 160);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_chars("short", 160), "short");
    }

    #[test]
    fn test_truncate_chars_never_exceeds_tiny_limits() {
        for limit in 0..=4 {
            let out = truncate_chars("hello world", limit);
            assert!(out.chars().count() <= limit, "limit {limit} gave {out:?}");
        }
        assert_eq!(truncate_chars("hello world", 2), "he");
        assert_eq!(truncate_chars("hello world", 3), "...");
        assert_eq!(truncate_chars("hello world", 0), "");
    }

    #[test]
    fn test_extract_skips_title_cell_and_code() {
        let nb = notebook(json!({
            "cells": [
                md("# Attention"),
                {"cell_type": "code", "source": "print('Not this.')"},
                md("Attention mixes **information** across positions. It is the core of the transformer. Extra detail here.")
            ]
        }));
        assert_eq!(
            extract_description(&nb, 160).unwrap(),
            "Attention mixes information across positions. It is the core of the transformer."
        );
    }

    #[test]
    fn test_extract_uses_only_first_long_sentence() {
        let long = format!("{}. Second sentence.", "word ".repeat(25).trim());
        let nb = notebook(json!({"cells": [md(&long)]}));
        let desc = extract_description(&nb, 160).unwrap();
        assert!(desc.ends_with("word."));
        assert!(!desc.contains("Second"));
    }

    #[test]
    fn test_extract_is_bounded_and_markup_free() {
        let body = format!("**{}**", "lorem ipsum ".repeat(30));
        let nb = notebook(json!({"cells": [md(&body)]}));
        let desc = extract_description(&nb, 160).unwrap();
        assert!(desc.chars().count() <= 160);
        assert!(desc.ends_with("..."));
        assert!(!desc.contains("**"));
    }

    #[test]
    fn test_extract_collects_across_cells() {
        let nb = notebook(json!({
            "cells": [md("# Title\n\nShort intro"), md("continues here. And ends.")]
        }));
        assert_eq!(
            extract_description(&nb, 160).unwrap(),
            "Title\n\nShort intro continues here. And ends."
        );
    }

    #[test]
    fn test_extract_none_without_prose() {
        let nb = notebook(json!({
            "cells": [md("# Only a title"), {"cell_type": "code", "source": []}]
        }));
        assert!(extract_description(&nb, 160).is_none());
    }

    #[test]
    fn test_add_description_writes_metadata_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01.ipynb");
        fs::write(
            &path,
            r##"{"cells": [{"cell_type": "markdown", "source": ["# T\n", "\n", "Gradients flow backwards."]}], "metadata": {"kernelspec": {"name": "python3"}}, "nbformat": 4}"##,
        )
        .unwrap();
        let config = DescribeConfig::default();

        let outcome = add_description(&path, &config, false).unwrap();
        assert_eq!(
            outcome,
            DescribeOutcome::Added("T\n\nGradients flow backwards.".to_string())
        );
        let first = fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(value["metadata"]["thumbnail"], "intro.png");
        assert_eq!(value["metadata"]["kernelspec"]["name"], "python3");
        assert!(first.ends_with("}\n"));

        let again = add_description(&path, &config, false).unwrap();
        assert_eq!(again, DescribeOutcome::AlreadyPresent);
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01.ipynb");
        let content = r#"{"cells": [{"cell_type": "markdown", "source": "Some prose."}]}"#;
        fs::write(&path, content).unwrap();

        let outcome = add_description(&path, &DescribeConfig::default(), true).unwrap();
        assert_eq!(outcome, DescribeOutcome::Added("Some prose.".to_string()));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_describe_all_counts_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("a.ipynb"),
            r#"{"cells": [{"cell_type": "markdown", "source": "Prose."}]}"#,
        )
        .unwrap();
        fs::write(
            root.join("b.ipynb"),
            r#"{"cells": [], "metadata": {"description": "kept"}}"#,
        )
        .unwrap();
        fs::write(root.join("c.ipynb"), r#"{"cells": []}"#).unwrap();
        fs::write(root.join("d.ipynb"), "not json").unwrap();

        let config = DescribeConfig::default();
        let targets = batch_targets(root, &Config::default().exclude_dirs);
        let summary = describe_all(&targets, &config, false);
        assert_eq!(
            summary,
            DescribeSummary {
                found: 4,
                updated: 1,
                skipped: 1,
                undescribed: 1,
                errors: 1
            }
        );
    }
}
