#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{env, path::Path, process::Command, sync::Arc};
use walkdir::WalkDir;

use crate::spec::{Suggestion, SuggestionKind};

/// Built-in dynamic suggestion sources resolved at call time.
///
/// `History` and `Help` are declared so grammars can reference them, but
/// intentionally resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Filepaths,
    Folders,
    History,
    Help,
}

impl Template {
    /// Resolves the template against the current working directory.
    #[must_use]
    pub fn resolve(self) -> Vec<Suggestion> {
        match env::current_dir() {
            Ok(dir) => self.resolve_in(&dir),
            Err(e) => {
                log::warn!("template resolution has no working directory: {e}");
                Vec::new()
            }
        }
    }

    /// Resolves the template against a specific directory.
    #[must_use]
    pub fn resolve_in(self, dir: &Path) -> Vec<Suggestion> {
        match self {
            Template::Filepaths => directory_entries(dir, false),
            Template::Folders => directory_entries(dir, true),
            Template::History | Template::Help => Vec::new(),
        }
    }
}

fn directory_entries(dir: &Path, folders_only: bool) -> Vec<Suggestion> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        let is_dir = entry.file_type().is_dir();
        if folders_only && !is_dir {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            let kind = if is_dir {
                SuggestionKind::Folder
            } else {
                SuggestionKind::File
            };
            entries.push(Suggestion::with_kind(name, kind, ""));
        }
    }
    entries
}

/// Turns the raw stdout of a generator script into structured suggestions.
pub type PostProcessFn = Arc<dyn Fn(&str) -> Vec<Suggestion> + Send + Sync>;

/// An arbitrary suggestion source, e.g. a cloud API or a language model.
pub type CustomFn = Arc<dyn Fn() -> Vec<Suggestion> + Send + Sync>;

/// A pluggable dynamic suggestion source attached to an argument.
///
/// A generator may run a shell script, invoke an arbitrary callback, and
/// reference built-in templates; every source that is present contributes,
/// and the outputs are concatenated. Failures are logged and degrade to an
/// empty contribution; they never abort resolution.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Generator {
    /// Shell script whose stdout yields suggestions.
    pub script: Option<String>,
    /// Delimiter the script output is split on; defaults to newline.
    pub split_on: Option<String>,
    #[serde(skip)]
    pub post_process: Option<PostProcessFn>,
    #[serde(skip)]
    pub custom: Option<CustomFn>,
    pub templates: Vec<Template>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("script", &self.script)
            .field("split_on", &self.split_on)
            .field("post_process", &self.post_process.as_ref().map(|_| "fn"))
            .field("custom", &self.custom.as_ref().map(|_| "fn"))
            .field("templates", &self.templates)
            .finish()
    }
}

impl Generator {
    /// A generator that only runs a shell script.
    #[must_use]
    pub fn script(script: &str) -> Self {
        Self {
            script: Some(script.to_string()),
            ..Self::default()
        }
    }

    /// A generator that only invokes a callback.
    #[must_use]
    pub fn custom(custom: CustomFn) -> Self {
        Self {
            custom: Some(custom),
            ..Self::default()
        }
    }

    /// Gathers suggestions from every configured source.
    #[must_use]
    pub fn run(&self) -> Vec<Suggestion> {
        let mut out = Vec::new();

        if let Some(script) = &self.script {
            match run_script(script) {
                Ok(stdout) => {
                    if let Some(post_process) = &self.post_process {
                        out.extend(post_process(&stdout));
                    } else {
                        let delimiter = self.split_on.as_deref().unwrap_or("\n");
                        out.extend(
                            stdout
                                .split(delimiter)
                                .map(str::trim)
                                .filter(|part| !part.is_empty())
                                .map(|part| Suggestion::new(part, "")),
                        );
                    }
                }
                Err(e) => log::warn!("generator script {script:?} failed: {e:#}"),
            }
        }

        if let Some(custom) = &self.custom {
            out.extend(custom());
        }

        for template in &self.templates {
            out.extend(template.resolve());
        }

        out
    }
}

/// Runs a generator script through a shell and captures its stdout.
fn run_script(script: &str) -> Result<String> {
    let shell = which::which("bash").unwrap_or_else(|_| "sh".into());
    let output = Command::new(shell)
        .arg("-c")
        .arg(script)
        .output()
        .with_context(|| format!("failed to launch shell for generator {script:?}"))?;

    if !output.status.success() {
        bail!("generator exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
