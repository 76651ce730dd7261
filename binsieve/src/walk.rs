//! Directory traversal driving the matcher set and combinator.
//!
//! Every regular file reachable from the root is evaluated; symbolic links
//! and unreadable entries are skipped silently. Traversal order follows the
//! underlying directory listing and is not specified. Depth is unbounded:
//! the walker recycles directory handles internally, so no file-descriptor
//! cap needs tuning here.

use ignore::WalkBuilder;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::registry::MatcherRegistry;
use crate::report::ScanReport;

/// Walks the configured root, evaluates every regular file against the
/// participating matchers and reports those the policy accepts.
///
/// Pattern and root errors surface here, before the first file is visited.
/// Per-file read errors degrade to `Failed` verdicts and do not stop the
/// walk.
pub fn walk(config: &ScanConfig, registry: &MatcherRegistry) -> ScanResult<ScanReport> {
    let compiled = registry.compile()?;
    validate_root(&config.root_path)?;

    let policy = config.policy();
    info!(
        root = %config.root_path.display(),
        matchers = compiled.len(),
        use_or = policy.use_or,
        invert = policy.invert,
        "starting scan"
    );

    let mut report = ScanReport::new();
    let walker = WalkBuilder::new(&config.root_path)
        .standard_filters(false)
        .follow_links(false)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%err, "skipping unreadable entry");
                report.skip();
                continue;
            }
        };
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() {
            debug!(path = %entry.path().display(), "skipping symbolic link");
            report.skip();
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let verdicts = compiled.evaluate(entry.path());
        let reported = policy.decide(&verdicts);
        report.record(entry.into_path(), reported);
    }

    info!(
        "scan complete: {} of {} files matched, {} skipped",
        report.files_matched, report.files_scanned, report.files_skipped
    );
    Ok(report)
}

/// The root must exist, be a directory (symlinks are not followed) and be
/// readable; anything else is fatal before traversal begins.
fn validate_root(root: &Path) -> ScanResult<()> {
    let metadata = fs::symlink_metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::file_not_found(root),
        std::io::ErrorKind::PermissionDenied => ScanError::permission_denied(root),
        _ => ScanError::IoError(e),
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::not_a_directory(root));
    }
    fs::read_dir(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => ScanError::permission_denied(root),
        _ => ScanError::IoError(e),
    })?;
    Ok(())
}
