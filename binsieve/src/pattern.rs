//! Parsing of matcher option values into canonical, search-ready patterns.
//!
//! A pattern is parsed once per matcher per process; the result is immutable
//! and cached, since the search target never changes between files.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::errors::{ScanError, ScanResult};

static PATTERN_CACHE: Lazy<DashMap<(PatternKind, String), Arc<Pattern>>> = Lazy::new(DashMap::new);

/// How an option value is interpreted by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Raw text, matched byte for byte
    Literal,
    /// Unsigned integer matched in either byte order
    NumericBytes,
    /// Bit string (`0b` literal) or unsigned integer matched at any bit offset
    BitSequence,
}

/// Byte-sequence search target. `big` always holds the primary encoding;
/// `little` holds the alternate byte order for numeric literals and is
/// absent for raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytePattern {
    big: Vec<u8>,
    little: Option<Vec<u8>>,
}

impl BytePattern {
    pub fn len(&self) -> usize {
        self.big.len()
    }

    pub fn is_empty(&self) -> bool {
        self.big.is_empty()
    }

    /// True if `window` equals either encoding. `window` must have the
    /// pattern's length.
    pub(crate) fn matches(&self, window: &[u8]) -> bool {
        window == &self.big[..] || self.little.as_deref() == Some(window)
    }
}

/// Bit-sequence search target: an ordered run of 0/1 values, most
/// significant bit first. The length may be any positive count of bits,
/// including non-multiples of 8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPattern {
    bits: Vec<u8>,
}

impl BitPattern {
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub(crate) fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Bytes the scanner must retain across reads: `ceil(bit_len / 8)`,
    /// rounded up because bit windows are not byte-aligned.
    pub(crate) fn carry_bytes(&self) -> usize {
        self.bits.len().div_ceil(8)
    }
}

/// Canonical search target, immutable once constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Bytes(BytePattern),
    Bits(BitPattern),
}

impl Pattern {
    /// Parses `value` under the given interpretation, consulting the
    /// process-wide cache first.
    pub fn compile(kind: PatternKind, value: &str) -> ScanResult<Arc<Pattern>> {
        let key = (kind, value.to_string());
        if let Some(hit) = PATTERN_CACHE.get(&key) {
            return Ok(hit.clone());
        }
        let pattern = Arc::new(match kind {
            PatternKind::Literal => Self::literal(value)?,
            PatternKind::NumericBytes => Self::numeric_bytes(value)?,
            PatternKind::BitSequence => Self::bit_sequence(value)?,
        });
        PATTERN_CACHE.insert(key, pattern.clone());
        Ok(pattern)
    }

    /// Raw text target: the bytes of `text`, no alternate encoding
    pub fn literal(text: &str) -> ScanResult<Pattern> {
        if text.is_empty() {
            return Err(ScanError::invalid_pattern("empty search text"));
        }
        Ok(Pattern::Bytes(BytePattern {
            big: text.as_bytes().to_vec(),
            little: None,
        }))
    }

    /// Numeric target: the value encoded into its minimal byte count, in
    /// both byte orders. A window matches if it equals either encoding,
    /// because the byte order of the scanned file is unknown.
    pub fn numeric_bytes(value: &str) -> ScanResult<Pattern> {
        let num = parse_auto_radix(value)?;
        if num == 0 {
            return Err(ScanError::invalid_pattern(format!(
                "'{value}' encodes a zero-length byte sequence"
            )));
        }
        let len = (64 - num.leading_zeros() as usize).div_ceil(8);
        let big = num.to_be_bytes()[8 - len..].to_vec();
        let little = num.to_le_bytes()[..len].to_vec();
        Ok(Pattern::Bytes(BytePattern {
            big,
            little: Some(little),
        }))
    }

    /// Bit-sequence target. A `0b` literal is taken bit for bit, leading
    /// zeros included; a plain number contributes exactly the bits up to
    /// its highest set bit. Only one orientation is searched.
    pub fn bit_sequence(value: &str) -> ScanResult<Pattern> {
        if let Some(body) = value.strip_prefix("0b") {
            if body.is_empty() {
                return Err(ScanError::invalid_pattern("'0b' carries no bits"));
            }
            let bits = body
                .chars()
                .map(|c| match c {
                    '0' => Ok(0),
                    '1' => Ok(1),
                    other => Err(ScanError::invalid_pattern(format!(
                        "invalid binary digit '{other}' in '{value}'"
                    ))),
                })
                .collect::<ScanResult<Vec<u8>>>()?;
            return Ok(Pattern::Bits(BitPattern { bits }));
        }

        let num = parse_auto_radix(value)?;
        if num == 0 {
            return Err(ScanError::invalid_pattern(format!(
                "'{value}' encodes a zero-length bit sequence"
            )));
        }
        let bit_len = 64 - num.leading_zeros() as usize;
        let bits = (0..bit_len)
            .rev()
            .map(|i| ((num >> i) & 1) as u8)
            .collect();
        Ok(Pattern::Bits(BitPattern { bits }))
    }
}

/// Unsigned integer parse with C-style base auto-detection: `0x`/`0X` is
/// hex, a leading `0` is octal, anything else is decimal.
fn parse_auto_radix(value: &str) -> ScanResult<u64> {
    let parsed = if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if value.len() > 1 && value.starts_with('0') {
        u64::from_str_radix(&value[1..], 8)
    } else {
        value.parse::<u64>()
    };
    parsed.map_err(|_| ScanError::invalid_pattern(format!("invalid numeric value '{value}'")))
}
