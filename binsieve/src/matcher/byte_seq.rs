//! Numeric byte-sequence matcher: the option value is parsed as an unsigned
//! integer (auto-detected base), encoded into its minimal byte count, and
//! searched in both byte orders, since the byte order of scanned files is
//! unknown to the caller.

use super::{
    bound_value, BoundOption, CompiledMatcher, CompiledPattern, Matcher, MatcherDescriptor,
    OptionSpec,
};
use crate::errors::ScanResult;
use crate::pattern::{Pattern, PatternKind};

pub const OPT_BYTE_SEQ: &str = "byte-seq";

pub struct ByteSeqMatcher {
    descriptor: MatcherDescriptor,
}

impl ByteSeqMatcher {
    pub fn new() -> Self {
        ByteSeqMatcher {
            descriptor: MatcherDescriptor {
                name: "byte-seq",
                purpose: "Search for a numeric value encoded in either byte order",
                author: "binsieve developers",
                options: vec![OptionSpec {
                    name: OPT_BYTE_SEQ,
                    takes_value: true,
                    description: "Number to search for (decimal, 0x hex or 0 octal)",
                }],
            },
        }
    }
}

impl Default for ByteSeqMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for ByteSeqMatcher {
    fn descriptor(&self) -> &MatcherDescriptor {
        &self.descriptor
    }

    fn compile(&self, bindings: &[BoundOption]) -> ScanResult<Box<dyn CompiledMatcher>> {
        let value = bound_value(bindings, OPT_BYTE_SEQ)?;
        let pattern = Pattern::compile(PatternKind::NumericBytes, value)?;
        Ok(Box::new(CompiledPattern::new(pattern)))
    }
}
