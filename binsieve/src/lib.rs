//! binsieve scans a directory tree and reports the files whose contents
//! satisfy a boolean combination of matcher criteria: literal text, numeric
//! byte sequences in either byte order, and bit sequences at arbitrary bit
//! offsets. Files of any size are examined through a bounded read buffer
//! that never misses a match spanning two reads.

pub mod combine;
pub mod config;
pub mod errors;
pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod walk;

pub use combine::CombinationPolicy;
pub use config::{OptionBinding, ScanConfig};
pub use errors::{ScanError, ScanResult};
pub use matcher::{BoundOption, MatchVerdict, Matcher, MatcherDescriptor, OptionSpec};
pub use registry::{CompiledSet, MatcherRegistry};
pub use report::ScanReport;
pub use walk::walk;
