#![warn(clippy::all, clippy::pedantic)]

use std::collections::HashSet;

use crate::matcher::filter_suggestions;
use crate::spec::registry::SpecRegistry;
use crate::spec::{Argument, OptionFlag, Subcommand, Suggestion, SuggestionKind};
use crate::token::Token;

/// A token the resolver has already consumed, kept only to suppress
/// re-suggesting its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedToken {
    pub text: String,
    /// Came from a persistent option and therefore survives the accepted
    /// list resets at subcommand and argument boundaries.
    pub persistent: bool,
}

impl ProcessedToken {
    fn new(text: &str, persistent: bool) -> Self {
        Self {
            text: text.to_string(),
            persistent,
        }
    }
}

/// The outcome of one resolution call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Ranked completion candidates for the active position.
    pub suggestions: Vec<Suggestion>,
    /// Textual hint naming the expected argument, set when the active
    /// position has no concrete suggestions.
    pub argument: Option<String>,
    /// Characters already typed in the active (last) token; tells the
    /// consumer where to splice an accepted suggestion.
    pub typed: usize,
}

/// Recursive descent engine that walks a token stream against a grammar
/// tree. Holds no mutable state; all resolution state is threaded through
/// the recursive calls explicitly.
pub struct Resolver<'r> {
    registry: &'r SpecRegistry,
}

impl<'r> Resolver<'r> {
    #[must_use]
    pub fn new(registry: &'r SpecRegistry) -> Self {
        Self { registry }
    }

    /// Resolves the tokens that follow the root command name against the
    /// root's grammar tree. Never fails; unknown tokens and malformed
    /// grammars produce an empty resolution.
    #[must_use]
    pub fn resolve(&self, tokens: &[Token], spec: &'r Subcommand) -> Resolution {
        self.at_subcommand(tokens, spec, Vec::new(), false, false, Vec::new())
    }

    fn at_subcommand(
        &self,
        tokens: &[Token],
        spec: &'r Subcommand,
        persistent: Vec<&'r OptionFlag>,
        args_depleted: bool,
        args_from_subcommand: bool,
        accepted: Vec<ProcessedToken>,
    ) -> Resolution {
        let persistent = merge_persistent(spec, persistent);

        match tokens.split_first() {
            Some((head, rest)) if head.complete => {
                if head.is_option {
                    if let Some(option) = find_option(spec, &persistent, &head.text) {
                        return self.at_option(tokens, option, spec, persistent, accepted);
                    }
                    log::debug!("token {:?} matches no option in scope", head.text);
                    return Resolution::default();
                }

                if let Some(child) = spec.subcommands.iter().find(|c| c.matches(&head.text)) {
                    log::debug!("descending into subcommand {:?}", child.long_name());
                    let accepted = persistent_only(accepted);
                    return self.at_subcommand(rest, child, persistent, false, false, accepted);
                }

                if spec.args.is_empty() {
                    log::debug!("token {:?} matches nothing in the current scope", head.text);
                    return Resolution::default();
                }

                self.at_argument(tokens, &spec.args, spec, persistent, accepted, false)
            }
            _ => {
                // An incomplete option token that already equals an option
                // name exactly is dispatched, not recommended; nothing
                // narrower can match it.
                if let Some(head) = tokens.first().filter(|t| t.is_option) {
                    if let Some(option) = find_option(spec, &persistent, &head.text) {
                        return self.at_option(tokens, option, spec, persistent, accepted);
                    }
                }

                recommend_at_subcommand(
                    tokens.first(),
                    spec,
                    &persistent,
                    args_depleted,
                    args_from_subcommand,
                    &accepted,
                )
            }
        }
    }

    fn at_option(
        &self,
        tokens: &[Token],
        option: &'r OptionFlag,
        spec: &'r Subcommand,
        persistent: Vec<&'r OptionFlag>,
        mut accepted: Vec<ProcessedToken>,
    ) -> Resolution {
        let Some((head, rest)) = tokens.split_first() else {
            log::error!("option handler reached without a token; grammar walk is inconsistent");
            return Resolution::default();
        };

        let from_persistent = persistent.iter().any(|p| p.matches(&head.text));
        accepted.push(ProcessedToken::new(&head.text, from_persistent));

        if option.args.is_empty() {
            self.at_subcommand(rest, spec, persistent, false, false, accepted)
        } else {
            self.at_argument(rest, &option.args, spec, persistent, accepted, true)
        }
    }

    fn at_argument(
        &self,
        tokens: &[Token],
        args: &'r [Argument],
        spec: &'r Subcommand,
        persistent: Vec<&'r OptionFlag>,
        accepted: Vec<ProcessedToken>,
        from_option: bool,
    ) -> Resolution {
        let Some(arg) = args.first() else {
            return self.at_subcommand(tokens, spec, persistent, true, !from_option, accepted);
        };

        match tokens.split_first() {
            Some((head, rest)) if head.complete => {
                // Optional positional arguments never shadow option or
                // subcommand recognition.
                if args.iter().all(|a| a.is_optional) {
                    if head.is_option {
                        if let Some(option) = find_option(spec, &persistent, &head.text) {
                            return self.at_option(tokens, option, spec, persistent, accepted);
                        }
                    } else if let Some(child) =
                        spec.subcommands.iter().find(|c| c.matches(&head.text))
                    {
                        let accepted = persistent_only(accepted);
                        return self.at_subcommand(rest, child, persistent, false, false, accepted);
                    }
                }

                let mut accepted = accepted;
                accepted.push(ProcessedToken::new(&head.text, false));

                if arg.is_variadic {
                    return self.at_argument(rest, args, spec, persistent, accepted, from_option);
                }

                if arg.is_command {
                    // The consumed token names a whole nested invocation;
                    // the rest of the line belongs to that command's own
                    // grammar, with fresh state.
                    return self.nested_invocation(&head.text, rest);
                }

                let accepted = persistent_only(accepted);
                self.at_argument(rest, &args[1..], spec, persistent, accepted, from_option)
            }
            _ => {
                let head = tokens.first();
                let mut candidates: Vec<Suggestion> = arg.suggestions.clone();
                for template in &arg.templates {
                    candidates.extend(template.resolve());
                }
                if let Some(generator) = &arg.generator {
                    candidates.extend(generator.run());
                }
                if arg.is_optional {
                    candidates.extend(command_candidates(spec, &persistent, &accepted));
                }

                let candidates = suppress_accepted(candidates, &accepted);
                let strategy = arg.filter_strategy.or(spec.filter_strategy);
                let suggestions = match head {
                    Some(token) => filter_suggestions(candidates, &token.text, strategy),
                    None => candidates,
                };

                if suggestions.is_empty() {
                    return Resolution {
                        suggestions,
                        argument: Some(arg.name.clone()),
                        typed: 0,
                    };
                }

                Resolution {
                    suggestions,
                    argument: None,
                    typed: 0,
                }
            }
        }
    }

    fn nested_invocation(&self, name: &str, tokens: &[Token]) -> Resolution {
        match self.registry.get(name) {
            Some(spec) => self.at_subcommand(tokens, spec, Vec::new(), false, false, Vec::new()),
            None => {
                log::debug!("nested command {name:?} is not registered");
                Resolution::default()
            }
        }
    }
}

fn recommend_at_subcommand(
    head: Option<&Token>,
    spec: &Subcommand,
    persistent: &[&OptionFlag],
    args_depleted: bool,
    args_from_subcommand: bool,
    accepted: &[ProcessedToken],
) -> Resolution {
    let mut candidates = Vec::new();

    if !spec.args.is_empty() && (!args_depleted || !args_from_subcommand) {
        let arg = &spec.args[0];
        candidates.extend(arg.suggestions.iter().cloned());
        for template in &arg.templates {
            candidates.extend(template.resolve());
        }
    }

    if !(args_depleted && !args_from_subcommand) {
        candidates.extend(command_candidates(spec, persistent, accepted));
    }

    let candidates = suppress_accepted(candidates, accepted);
    let suggestions = match head {
        Some(token) => filter_suggestions(candidates, &token.text, spec.filter_strategy),
        None => candidates,
    };

    Resolution {
        suggestions,
        argument: None,
        typed: 0,
    }
}

/// Child subcommand and option candidates for the current scope, with
/// already-typed and mutually excluded options removed.
fn command_candidates(
    spec: &Subcommand,
    persistent: &[&OptionFlag],
    accepted: &[ProcessedToken],
) -> Vec<Suggestion> {
    let mut out = Vec::new();

    for child in &spec.subcommands {
        if child.names.iter().any(|n| was_accepted(accepted, n)) {
            continue;
        }
        out.push(Suggestion::with_kind(
            child.long_name(),
            SuggestionKind::Subcommand,
            &child.description,
        ));
    }

    for option in merged_options(spec, persistent) {
        if option.names.iter().any(|n| was_accepted(accepted, n)) {
            continue;
        }
        if option.exclusive_on.iter().any(|x| was_accepted(accepted, x)) {
            log::debug!(
                "option {:?} suppressed by an exclusive peer",
                option.long_name()
            );
            continue;
        }
        out.push(Suggestion::with_kind(
            option.long_name(),
            SuggestionKind::Option,
            &option.description,
        ));
    }

    out
}

fn was_accepted(accepted: &[ProcessedToken], name: &str) -> bool {
    accepted.iter().any(|p| p.text == name)
}

fn suppress_accepted(candidates: Vec<Suggestion>, accepted: &[ProcessedToken]) -> Vec<Suggestion> {
    if accepted.is_empty() {
        return candidates;
    }
    let used: HashSet<&str> = accepted.iter().map(|p| p.text.as_str()).collect();
    candidates
        .into_iter()
        .filter(|s| !used.contains(s.name.as_str()))
        .collect()
}

/// The scope's own options merged with the inherited persistent set,
/// own options first, deduplicated by long name.
fn merged_options<'r>(
    spec: &'r Subcommand,
    persistent: &[&'r OptionFlag],
) -> Vec<&'r OptionFlag> {
    let mut merged: Vec<&OptionFlag> = spec.options.iter().collect();
    for inherited in persistent.iter().copied() {
        if !merged.iter().any(|o| o.long_name() == inherited.long_name()) {
            merged.push(inherited);
        }
    }
    merged
}

/// Adds the scope's persistent-flagged options to the inherited set so they
/// stay in scope for all descendants.
fn merge_persistent<'r>(
    spec: &'r Subcommand,
    mut persistent: Vec<&'r OptionFlag>,
) -> Vec<&'r OptionFlag> {
    for option in spec.options.iter().filter(|o| o.is_persistent) {
        if !persistent.iter().any(|p| p.long_name() == option.long_name()) {
            persistent.push(option);
        }
    }
    persistent
}

/// Exact name or alias match against the scope's own options, then the
/// inherited persistent set. Deciding which option a token refers to never
/// uses partial matching.
fn find_option<'r>(
    spec: &'r Subcommand,
    persistent: &[&'r OptionFlag],
    text: &str,
) -> Option<&'r OptionFlag> {
    spec.options
        .iter()
        .find(|o| o.matches(text))
        .or_else(|| persistent.iter().copied().find(|o| o.matches(text)))
}

fn persistent_only(accepted: Vec<ProcessedToken>) -> Vec<ProcessedToken> {
    accepted.into_iter().filter(|p| p.persistent).collect()
}
