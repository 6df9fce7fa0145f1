use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::generator::Generator;
use crate::spec::registry::SpecRegistry;
use crate::spec::{Argument, OptionFlag, Subcommand, Suggestion};
use crate::Engine;

/// Engine over a spec whose `--gen` option argument is fed by a counting
/// generator, so cache behavior is observable.
fn counting_engine() -> (Engine, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let spec = Subcommand {
        names: vec!["tool".to_string()],
        options: vec![OptionFlag {
            args: vec![Argument {
                generator: Some(Generator::custom(Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    vec![Suggestion::new("generated", "")]
                }))),
                ..Argument::new("value")
            }],
            ..OptionFlag::new(&["--gen"], "generated value")
        }],
        ..Subcommand::default()
    };

    let mut registry = SpecRegistry::new();
    registry.register(spec);
    (Engine::new(registry), calls)
}

#[test]
fn test_identical_input_does_not_reinvoke_generators() {
    let (mut engine, calls) = counting_engine();

    let first = engine.load_suggestions("tool --gen ");
    let second = engine.load_suggestions("tool --gen ");

    assert_eq!(first, second);
    assert_eq!(first.suggestions[0].name, "generated");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_slot_is_replaced_on_different_input() {
    let (mut engine, calls) = counting_engine();

    engine.load_suggestions("tool --gen ");
    engine.load_suggestions("tool --gen g");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // The slot now holds the second line; the first recomputes.
    engine.load_suggestions("tool --gen ");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_clear_cache_forces_recomputation() {
    let (mut engine, calls) = counting_engine();

    engine.load_suggestions("tool --gen ");
    engine.clear_cache();
    engine.load_suggestions("tool --gen ");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unknown_root_command_yields_empty_resolution() {
    let mut engine = Engine::new(SpecRegistry::new());
    let resolution = engine.load_suggestions("unknown-tool --flag");

    assert!(resolution.suggestions.is_empty());
    assert!(resolution.argument.is_none());
}

#[test]
fn test_blank_line_yields_empty_resolution() {
    let mut engine = Engine::with_builtins();
    let resolution = engine.load_suggestions("   ");

    assert!(resolution.suggestions.is_empty());
    assert_eq!(resolution.typed, 0);
}

#[test]
fn test_typed_count_tracks_the_active_token() {
    let mut engine = Engine::with_builtins();

    assert_eq!(engine.load_suggestions("git sta").typed, 3);
    assert_eq!(engine.load_suggestions("git status ").typed, 0);
    assert_eq!(engine.load_suggestions("git ").typed, 0);
}

#[test]
fn test_builtin_git_partial_subcommand() {
    let mut engine = Engine::with_builtins();
    let resolution = engine.load_suggestions("git sta");

    let got: Vec<&str> = resolution
        .suggestions
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert!(got.contains(&"status"), "missing status in {got:?}");
    assert!(got.contains(&"stash"), "missing stash in {got:?}");
}

#[test]
fn test_registering_a_spec_invalidates_the_cache() {
    let mut engine = Engine::new(SpecRegistry::new());
    assert!(engine.load_suggestions("kv ").suggestions.is_empty());

    engine.register(Subcommand {
        names: vec!["kv".to_string()],
        subcommands: vec![Subcommand::new("get", "read a key")],
        ..Subcommand::default()
    });

    let resolution = engine.load_suggestions("kv ");
    assert_eq!(resolution.suggestions.len(), 1);
    assert_eq!(resolution.suggestions[0].name, "get");
}

#[test]
fn test_only_the_last_separator_segment_resolves() {
    let (mut engine, calls) = counting_engine();

    let resolution = engine.load_suggestions("make build && tool --gen ");
    assert_eq!(resolution.suggestions[0].name, "generated");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
