#![warn(clippy::all, clippy::pedantic)]

//! clac resolves, for a partially typed shell command line, the set of
//! valid next-token completions together with human-readable descriptions.
//!
//! Data flow: raw line → [`tokenize`] → [`Resolver`] walking the registered
//! grammar tree, calling suggestion providers for the active position and
//! filtering by the partially typed token → [`Resolution`] → [`ResultCache`].
//!
//! The grammar model is built once at startup and never mutated; everything
//! produced during a resolution call lives only for that call.

pub mod cache;
pub mod cli;
pub mod generator;
pub mod matcher;
pub mod ollama;
pub mod resolver;
pub mod spec;
pub mod token;

#[cfg(test)]
mod tests;

pub use cache::ResultCache;
pub use matcher::FilterStrategy;
pub use resolver::{ProcessedToken, Resolution, Resolver};
pub use spec::registry::SpecRegistry;
pub use spec::{Argument, OptionFlag, Subcommand, Suggestion, SuggestionKind};
pub use token::{Token, tokenize};

/// The completion engine: a spec registry plus the one-slot result cache.
///
/// The cache is owned by the engine rather than living in module state, so
/// embedding consumers control its lifetime and can reset it explicitly.
#[derive(Debug, Default)]
pub struct Engine {
    registry: SpecRegistry,
    cache: ResultCache,
}

impl Engine {
    #[must_use]
    pub fn new(registry: SpecRegistry) -> Self {
        Self {
            registry,
            cache: ResultCache::new(),
        }
    }

    /// Engine preloaded with the built-in demo grammars.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new(SpecRegistry::with_builtins())
    }

    #[must_use]
    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// Registers another grammar; drops the memoized resolution since it
    /// may have been computed against the smaller registry.
    pub fn register(&mut self, spec: Subcommand) {
        self.cache.clear();
        self.registry.register(spec);
    }

    /// Drops the memoized resolution.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolves suggestions for the raw line, memoizing the result.
    ///
    /// An unknown root command, an unknown token in scope, or a malformed
    /// grammar all produce an empty resolution; this call never fails.
    pub fn load_suggestions(&mut self, line: &str) -> Resolution {
        if let Some(cached) = self.cache.get(line) {
            log::debug!("result cache hit for {line:?}");
            return cached;
        }

        let tokens = token::tokenize(line);
        let typed = tokens
            .last()
            .filter(|t| !t.complete)
            .map_or(0, |t| t.text.chars().count());

        let mut resolution = match tokens.split_first() {
            None => Resolution::default(),
            Some((root, rest)) => match self.registry.get(&root.text) {
                None => {
                    log::debug!("no spec registered for root command {:?}", root.text);
                    Resolution::default()
                }
                Some(spec) => Resolver::new(&self.registry).resolve(rest, spec),
            },
        };
        resolution.typed = typed;

        self.cache.store(line, resolution.clone());
        resolution
    }
}
