#![warn(clippy::all, clippy::pedantic)]

pub mod registry;

use serde::{Deserialize, Serialize};

use crate::generator::{Generator, Template};
use crate::matcher::FilterStrategy;

/// The source a suggestion came from; its display prefix is a pure
/// function of this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Option,
    Subcommand,
    File,
    Folder,
    #[default]
    Default,
}

impl SuggestionKind {
    /// Short prefix shown in front of the suggestion name.
    #[must_use]
    pub fn display_prefix(self) -> &'static str {
        match self {
            SuggestionKind::Option => "-",
            SuggestionKind::Subcommand => ">",
            SuggestionKind::File => "*",
            SuggestionKind::Folder => "/",
            SuggestionKind::Default => "",
        }
    }
}

/// A single completion candidate surfaced to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    #[serde(default)]
    pub kind: SuggestionKind,
    #[serde(default)]
    pub description: String,
}

impl Suggestion {
    #[must_use]
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SuggestionKind::Default,
            description: description.to_string(),
        }
    }

    #[must_use]
    pub fn with_kind(name: &str, kind: SuggestionKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
        }
    }
}

/// A positional argument slot of a subcommand or option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Argument {
    /// Shown as a textual hint when the slot has no concrete suggestions.
    pub name: String,
    pub description: String,
    /// The user may skip this argument entirely; options and subcommands
    /// stay recognizable at its position.
    pub is_optional: bool,
    /// Keeps matching the same slot across multiple tokens.
    pub is_variadic: bool,
    /// The remainder of the line is itself a nested command invocation.
    pub is_command: bool,
    /// Unset inherits the owning subcommand's strategy.
    pub filter_strategy: FilterStrategy,
    /// Literal values declared in the grammar, surfaced verbatim.
    pub suggestions: Vec<Suggestion>,
    /// Built-in dynamic sources resolved at call time.
    pub templates: Vec<Template>,
    #[serde(skip)]
    pub generator: Option<Generator>,
}

impl Argument {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// An option flag, with the arguments it consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionFlag {
    /// Ordered, non-empty list of aliases.
    pub names: Vec<String>,
    pub description: String,
    pub args: Vec<Argument>,
    /// Once the owning subcommand has been entered, the option remains
    /// valid in all descendant subcommands.
    pub is_persistent: bool,
    /// Names of options that, once used, suppress this one.
    pub exclusive_on: Vec<String>,
}

impl OptionFlag {
    #[must_use]
    pub fn new(names: &[&str], description: &str) -> Self {
        Self {
            names: names.iter().map(ToString::to_string).collect(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    /// Shortest alias, used for compact display.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.names
            .iter()
            .min_by_key(|n| n.len())
            .map_or("", String::as_str)
    }

    /// Longest alias, used for filtering.
    #[must_use]
    pub fn long_name(&self) -> &str {
        self.names
            .iter()
            .max_by_key(|n| n.len())
            .map_or("", String::as_str)
    }

    /// Exact match against any alias.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.names.iter().any(|n| n == text)
    }
}

/// One node of the grammar tree for a CLI tool. The root node describes
/// the tool itself; nested nodes describe its subcommands.
///
/// The tree is built once at startup and never mutated; resolution only
/// ever reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Subcommand {
    /// Ordered, non-empty list of aliases.
    pub names: Vec<String>,
    pub description: String,
    /// Positional arguments, consumed strictly left to right.
    pub args: Vec<Argument>,
    pub options: Vec<OptionFlag>,
    pub subcommands: Vec<Subcommand>,
    pub filter_strategy: FilterStrategy,
}

impl Subcommand {
    #[must_use]
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            description: description.to_string(),
            ..Self::default()
        }
    }

    /// Shortest alias, used for compact display.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.names
            .iter()
            .min_by_key(|n| n.len())
            .map_or("", String::as_str)
    }

    /// Longest alias, used for filtering.
    #[must_use]
    pub fn long_name(&self) -> &str {
        self.names
            .iter()
            .max_by_key(|n| n.len())
            .map_or("", String::as_str)
    }

    /// Exact match against any alias.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.names.iter().any(|n| n == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_name_are_computed_over_aliases() {
        let opt = OptionFlag::new(&["-v", "--verbose"], "");
        assert_eq!(opt.short_name(), "-v");
        assert_eq!(opt.long_name(), "--verbose");
        assert!(opt.matches("-v"));
        assert!(opt.matches("--verbose"));
        assert!(!opt.matches("--verb"));
    }

    #[test]
    fn test_display_prefix_is_a_function_of_kind() {
        assert_eq!(SuggestionKind::Option.display_prefix(), "-");
        assert_eq!(SuggestionKind::Subcommand.display_prefix(), ">");
        assert_eq!(SuggestionKind::Default.display_prefix(), "");
    }

    #[test]
    fn test_spec_tree_round_trips_through_json() {
        let spec = Subcommand {
            names: vec!["demo".to_string()],
            description: "demo tool".to_string(),
            subcommands: vec![Subcommand::new("run", "run it")],
            options: vec![OptionFlag {
                is_persistent: true,
                ..OptionFlag::new(&["-h", "--help"], "show help")
            }],
            ..Subcommand::default()
        };

        let json = serde_json::to_string(&spec).unwrap();
        let back: Subcommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back.long_name(), "demo");
        assert_eq!(back.subcommands[0].long_name(), "run");
        assert!(back.options[0].is_persistent);
    }

    #[test]
    fn test_spec_loads_from_sparse_json() {
        let json = r#"{
            "names": ["kv"],
            "subcommands": [
                {"names": ["get"], "args": [{"name": "key", "suggestions": [{"name": "alpha"}]}]}
            ]
        }"#;
        let spec: Subcommand = serde_json::from_str(json).unwrap();
        assert_eq!(spec.subcommands.len(), 1);
        let arg = &spec.subcommands[0].args[0];
        assert_eq!(arg.name, "key");
        assert!(!arg.is_variadic);
        assert_eq!(arg.suggestions[0].name, "alpha");
        assert_eq!(arg.suggestions[0].kind, SuggestionKind::Default);
    }
}
