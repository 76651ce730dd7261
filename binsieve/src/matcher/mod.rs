//! Matcher capabilities: named, independently registered units that decide
//! whether one file satisfies one content criterion.
//!
//! A matcher publishes a descriptor (purpose, author, declared options) and
//! compiles its bound option values into a ready-to-run form once per
//! process. The compiled form is what the walker invokes per file.

pub mod bit_seq;
pub mod byte_seq;
pub mod substring;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};
use crate::pattern::Pattern;
use crate::scanner;

pub use bit_seq::BitSeqMatcher;
pub use byte_seq::ByteSeqMatcher;
pub use substring::SubstringMatcher;

/// One option a matcher declares in its schema
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub takes_value: bool,
    pub description: &'static str,
}

/// Identity and metadata of a matcher, created once at registration
#[derive(Debug, Clone)]
pub struct MatcherDescriptor {
    pub name: &'static str,
    pub purpose: &'static str,
    pub author: &'static str,
    pub options: Vec<OptionSpec>,
}

impl MatcherDescriptor {
    pub fn supports(&self, option: &str) -> bool {
        self.options.iter().any(|o| o.name == option)
    }
}

/// A value supplied by the invoker for one of a matcher's declared options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundOption {
    pub name: String,
    pub value: String,
}

/// Outcome of evaluating one matcher against one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchVerdict {
    Matched,
    NotMatched,
    /// The matcher could not examine the file (open or read error). Local
    /// to this one evaluation; the walk continues.
    Failed(String),
}

/// A registrable matcher capability
pub trait Matcher: Send + Sync {
    fn descriptor(&self) -> &MatcherDescriptor;

    /// Turns the bound option values into a ready-to-run matcher. Called
    /// once per process, before traversal; pattern errors are fatal here.
    fn compile(&self, bindings: &[BoundOption]) -> ScanResult<Box<dyn CompiledMatcher>>;
}

/// A matcher with its pattern parsed, ready to examine files
pub trait CompiledMatcher: Send + Sync {
    /// Opens `path` read-only and scans it. The file handle is released on
    /// every exit path. Returns whether the file satisfies the criterion.
    fn match_file(&self, path: &Path) -> ScanResult<bool>;
}

/// Shared compiled form for all pattern-based matchers: one canonical
/// pattern driven through the scanner variant it calls for.
pub(crate) struct CompiledPattern {
    pattern: Arc<Pattern>,
}

impl CompiledPattern {
    pub(crate) fn new(pattern: Arc<Pattern>) -> Self {
        CompiledPattern { pattern }
    }
}

impl CompiledMatcher for CompiledPattern {
    fn match_file(&self, path: &Path) -> ScanResult<bool> {
        let file = open_file(path)?;
        let mut reader = BufReader::new(file);
        let found = match self.pattern.as_ref() {
            Pattern::Bytes(p) => scanner::scan_bytes(&mut reader, p)?,
            Pattern::Bits(p) => scanner::scan_bits(&mut reader, p)?,
        };
        if let Some(offset) = found {
            debug!(path = %path.display(), offset, "pattern found");
        }
        Ok(found.is_some())
    }
}

pub(crate) fn open_file(path: &Path) -> ScanResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::file_not_found(path),
        std::io::ErrorKind::PermissionDenied => ScanError::permission_denied(path),
        _ => ScanError::IoError(e),
    })
}

/// Looks up the value bound to `name`, which compile() requires present
pub(crate) fn bound_value<'a>(bindings: &'a [BoundOption], name: &str) -> ScanResult<&'a str> {
    bindings
        .iter()
        .find(|b| b.name == name)
        .map(|b| b.value.as_str())
        .ok_or_else(|| ScanError::config_error(format!("missing value for --{name}")))
}
