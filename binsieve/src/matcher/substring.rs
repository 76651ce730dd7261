//! Literal text matcher: reports files whose contents contain the given
//! byte string anywhere, text or binary alike.

use super::{
    bound_value, BoundOption, CompiledMatcher, CompiledPattern, Matcher, MatcherDescriptor,
    OptionSpec,
};
use crate::errors::ScanResult;
use crate::pattern::{Pattern, PatternKind};

pub const OPT_SUBSTRING: &str = "substring";

pub struct SubstringMatcher {
    descriptor: MatcherDescriptor,
}

impl SubstringMatcher {
    pub fn new() -> Self {
        SubstringMatcher {
            descriptor: MatcherDescriptor {
                name: "substring",
                purpose: "Search for a literal text fragment in file contents",
                author: "binsieve developers",
                options: vec![OptionSpec {
                    name: OPT_SUBSTRING,
                    takes_value: true,
                    description: "Text fragment to search for",
                }],
            },
        }
    }
}

impl Default for SubstringMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for SubstringMatcher {
    fn descriptor(&self) -> &MatcherDescriptor {
        &self.descriptor
    }

    fn compile(&self, bindings: &[BoundOption]) -> ScanResult<Box<dyn CompiledMatcher>> {
        let value = bound_value(bindings, OPT_SUBSTRING)?;
        let pattern = Pattern::compile(PatternKind::Literal, value)?;
        Ok(Box::new(CompiledPattern::new(pattern)))
    }
}
