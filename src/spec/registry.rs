use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::generator::{Generator, Template};
use crate::matcher::FilterStrategy;

use super::{Argument, OptionFlag, Subcommand};

/// Mapping from root command name to its grammar tree; populated once at
/// process start and read thereafter.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    specs: HashMap<String, Arc<Subcommand>>,
}

impl SpecRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in demo grammars.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(git_spec());
        registry
    }

    /// Registers a grammar under every alias of its root node.
    pub fn register(&mut self, spec: Subcommand) {
        let spec = Arc::new(spec);
        for name in &spec.names {
            self.specs.insert(name.clone(), Arc::clone(&spec));
        }
    }

    /// Registers a grammar from its JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid spec.
    pub fn register_json(&mut self, json: &str) -> Result<()> {
        let spec: Subcommand =
            serde_json::from_str(json).context("failed to parse spec document")?;
        self.register(spec);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Subcommand> {
        self.specs.get(name).map(Arc::as_ref)
    }

    /// Sorted root command names, aliases included.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }
}

/// Built-in demo grammar for git, covering the shapes the resolver has to
/// handle: nested subcommands, persistent options, option arguments,
/// variadic and nested-command arguments, templates and a script generator.
fn git_spec() -> Subcommand {
    Subcommand {
        names: vec!["git".to_string()],
        description: "the stupid content tracker".to_string(),
        filter_strategy: FilterStrategy::Fuzzy,
        options: vec![
            OptionFlag {
                is_persistent: true,
                ..OptionFlag::new(&["-h", "--help"], "show help")
            },
            OptionFlag {
                args: vec![Argument {
                    templates: vec![Template::Folders],
                    ..Argument::new("path")
                }],
                ..OptionFlag::new(&["-C"], "run as if git was started in the given path")
            },
            OptionFlag::new(&["--version"], "print the git suite version"),
            OptionFlag::new(&["-p", "--paginate"], "pipe all output into a pager"),
        ],
        subcommands: vec![
            Subcommand {
                options: vec![
                    OptionFlag::new(&["-s", "--short"], "give the output in the short format"),
                    OptionFlag::new(&["-b", "--branch"], "show branch information"),
                ],
                ..Subcommand::new("status", "show the working tree status")
            },
            Subcommand {
                subcommands: vec![
                    Subcommand::new("push", "save your local modifications to a new stash"),
                    Subcommand::new("pop", "apply a stashed state and drop it"),
                    Subcommand::new("list", "list the stash entries you currently have"),
                ],
                ..Subcommand::new("stash", "stash the changes in a dirty working directory")
            },
            Subcommand {
                args: vec![Argument {
                    is_variadic: true,
                    templates: vec![Template::Filepaths],
                    ..Argument::new("pathspec")
                }],
                ..Subcommand::new("add", "add file contents to the index")
            },
            Subcommand {
                options: vec![
                    OptionFlag {
                        args: vec![Argument::new("message")],
                        ..OptionFlag::new(&["-m", "--message"], "use the given commit message")
                    },
                    OptionFlag::new(&["--amend"], "replace the tip of the current branch"),
                ],
                ..Subcommand::new("commit", "record changes to the repository")
            },
            Subcommand {
                args: vec![Argument {
                    generator: Some(Generator::script(
                        "git branch --format='%(refname:short)'",
                    )),
                    ..Argument::new("branch")
                }],
                ..Subcommand::new("checkout", "switch branches or restore working tree files")
            },
            Subcommand {
                subcommands: vec![
                    Subcommand::new("start", "start a bisect session"),
                    Subcommand::new("good", "mark the current revision as good"),
                    Subcommand::new("bad", "mark the current revision as bad"),
                    Subcommand {
                        args: vec![Argument {
                            is_command: true,
                            ..Argument::new("cmd")
                        }],
                        ..Subcommand::new("run", "bisect by running the given command")
                    },
                ],
                ..Subcommand::new("bisect", "find the commit that introduced a bug")
            },
            Subcommand::new("push", "update remote refs along with associated objects"),
            Subcommand::new("pull", "fetch from and integrate with another repository"),
        ],
        ..Subcommand::default()
    }
}
