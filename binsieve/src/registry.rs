//! Registry of loaded matchers and the option values bound to them.
//!
//! Matchers are registered in-process at startup; the registry does not care
//! how they were discovered. A matcher participates in a run only if at
//! least one of its options received a value, and only participating
//! matchers are ever invoked.

use std::path::Path;
use tracing::warn;

use crate::errors::{ScanError, ScanResult};
use crate::matcher::{
    BitSeqMatcher, BoundOption, ByteSeqMatcher, CompiledMatcher, MatchVerdict, Matcher,
    MatcherDescriptor, SubstringMatcher,
};

struct RegisteredMatcher {
    matcher: Box<dyn Matcher>,
    bindings: Vec<BoundOption>,
}

/// Owns the registered matchers and their bound options
#[derive(Default)]
pub struct MatcherRegistry {
    entries: Vec<RegisteredMatcher>,
}

impl MatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in matchers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(SubstringMatcher::new());
        registry.register(ByteSeqMatcher::new());
        registry.register(BitSeqMatcher::new());
        registry
    }

    pub fn register(&mut self, matcher: impl Matcher + 'static) {
        self.entries.push(RegisteredMatcher {
            matcher: Box::new(matcher),
            bindings: Vec::new(),
        });
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &MatcherDescriptor> {
        self.entries.iter().map(|e| e.matcher.descriptor())
    }

    /// Binds a value to an option, routed by option name. Every option name
    /// belongs to exactly one matcher's schema; an unrecognized name is a
    /// configuration mistake and fails before any traversal.
    pub fn bind(&mut self, option: &str, value: &str) -> ScanResult<()> {
        for entry in &mut self.entries {
            if entry.matcher.descriptor().supports(option) {
                entry.bindings.push(BoundOption {
                    name: option.to_string(),
                    value: value.to_string(),
                });
                return Ok(());
            }
        }
        Err(ScanError::unknown_option(option))
    }

    /// Binds a value to a named matcher's option, checking the option
    /// against that matcher's declared schema.
    pub fn bind_to(&mut self, matcher: &str, option: &str, value: &str) -> ScanResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.matcher.descriptor().name == matcher)
            .ok_or_else(|| ScanError::unknown_matcher(matcher))?;
        if !entry.matcher.descriptor().supports(option) {
            return Err(ScanError::unknown_option(option));
        }
        entry.bindings.push(BoundOption {
            name: option.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Names of matchers with at least one bound option
    pub fn participating(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| !e.bindings.is_empty())
            .map(|e| e.matcher.descriptor().name)
            .collect()
    }

    /// Compiles every participating matcher's pattern. Pattern errors are
    /// fatal here, before the walk begins.
    pub fn compile(&self) -> ScanResult<CompiledSet> {
        let mut matchers = Vec::new();
        for entry in self.entries.iter().filter(|e| !e.bindings.is_empty()) {
            let name = entry.matcher.descriptor().name;
            let compiled = entry.matcher.compile(&entry.bindings)?;
            matchers.push(CompiledEntry {
                name,
                matcher: compiled,
            });
        }
        Ok(CompiledSet { matchers })
    }
}

struct CompiledEntry {
    name: &'static str,
    matcher: Box<dyn CompiledMatcher>,
}

/// The participating matchers, compiled and ready to evaluate files
pub struct CompiledSet {
    matchers: Vec<CompiledEntry>,
}

impl CompiledSet {
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Runs every compiled matcher against one file. An IO failure
    /// downgrades that matcher's verdict to `Failed` for this file only;
    /// it never aborts the walk.
    pub fn evaluate(&self, path: &Path) -> Vec<MatchVerdict> {
        self.matchers
            .iter()
            .map(|entry| match entry.matcher.match_file(path) {
                Ok(true) => MatchVerdict::Matched,
                Ok(false) => MatchVerdict::NotMatched,
                Err(err) => {
                    warn!(matcher = entry.name, path = %path.display(), %err, "matcher failed");
                    MatchVerdict::Failed(err.to_string())
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_bind_routes_by_option_name() {
        let mut registry = MatcherRegistry::with_builtins();
        registry.bind("substring", "hello").unwrap();
        registry.bind("bit-seq", "0b101").unwrap();
        let mut participating = registry.participating();
        participating.sort_unstable();
        assert_eq!(participating, vec!["bit-seq", "substring"]);
    }

    #[test]
    fn test_bind_unknown_option() {
        let mut registry = MatcherRegistry::with_builtins();
        let err = registry.bind("frobnicate", "1").unwrap_err();
        assert!(matches!(err, ScanError::UnknownOption(_)));
    }

    #[test]
    fn test_bind_to_checks_schema() {
        let mut registry = MatcherRegistry::with_builtins();
        registry.bind_to("substring", "substring", "abc").unwrap();

        let err = registry.bind_to("substring", "bit-seq", "1").unwrap_err();
        assert!(matches!(err, ScanError::UnknownOption(_)));

        let err = registry.bind_to("no-such", "substring", "abc").unwrap_err();
        assert!(matches!(err, ScanError::UnknownMatcher(_)));
    }

    #[test]
    fn test_unbound_matchers_not_compiled() {
        let mut registry = MatcherRegistry::with_builtins();
        registry.bind("substring", "abc").unwrap();
        let compiled = registry.compile().unwrap();
        assert_eq!(compiled.len(), 1);
    }

    #[test]
    fn test_compile_surfaces_pattern_errors() {
        let mut registry = MatcherRegistry::with_builtins();
        registry.bind("byte-seq", "12abc").unwrap();
        assert!(matches!(
            registry.compile(),
            Err(ScanError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_evaluate_verdicts() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello world")?;

        let mut registry = MatcherRegistry::with_builtins();
        registry.bind("substring", "world")?;
        registry.bind("byte-seq", "0xdeadbeef")?;
        let compiled = registry.compile()?;

        let verdicts = compiled.evaluate(&path);
        assert_eq!(
            verdicts,
            vec![MatchVerdict::Matched, MatchVerdict::NotMatched]
        );
        Ok(())
    }

    #[test]
    fn test_evaluate_failure_is_local() -> anyhow::Result<()> {
        let dir = tempdir()?;

        let mut registry = MatcherRegistry::with_builtins();
        registry.bind("substring", "x")?;
        let compiled = registry.compile()?;

        // Reading a directory as a file fails; the verdict degrades to
        // Failed instead of propagating
        let verdicts = compiled.evaluate(dir.path());
        assert!(matches!(verdicts[0], MatchVerdict::Failed(_)));
        Ok(())
    }
}
