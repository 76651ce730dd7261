//! Bit-sequence matcher: the option value is either a `0b` bit literal
//! (leading zeros significant, any positive length) or a number contributing
//! the bits up to its highest set bit. The sequence is searched at every bit
//! offset of the file, byte-aligned or not.

use super::{
    bound_value, BoundOption, CompiledMatcher, CompiledPattern, Matcher, MatcherDescriptor,
    OptionSpec,
};
use crate::errors::ScanResult;
use crate::pattern::{Pattern, PatternKind};

pub const OPT_BIT_SEQ: &str = "bit-seq";

pub struct BitSeqMatcher {
    descriptor: MatcherDescriptor,
}

impl BitSeqMatcher {
    pub fn new() -> Self {
        BitSeqMatcher {
            descriptor: MatcherDescriptor {
                name: "bit-seq",
                purpose: "Search for a bit sequence at any bit offset",
                author: "binsieve developers",
                options: vec![OptionSpec {
                    name: OPT_BIT_SEQ,
                    takes_value: true,
                    description: "Bit sequence to search for (0b literal or number)",
                }],
            },
        }
    }
}

impl Default for BitSeqMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for BitSeqMatcher {
    fn descriptor(&self) -> &MatcherDescriptor {
        &self.descriptor
    }

    fn compile(&self, bindings: &[BoundOption]) -> ScanResult<Box<dyn CompiledMatcher>> {
        let value = bound_value(bindings, OPT_BIT_SEQ)?;
        let pattern = Pattern::compile(PatternKind::BitSequence, value)?;
        Ok(Box::new(CompiledPattern::new(pattern)))
    }
}
