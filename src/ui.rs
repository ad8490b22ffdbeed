//! Terminal output for the release summary.
//!
//! Human-facing lines go to stderr so stdout carries only `key=value` outputs
//! when no output file is configured.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::manifest::ManifestChange;
use crate::release::ReleaseOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("WARNING:").yellow().bold(), warning);
}

/// One line describing the baseline → new tag transition
pub fn format_tag_change(outcome: &ReleaseOutcome) -> String {
    match &outcome.baseline_tag {
        Some(old) => format!(
            "{} → {} ({} change, {} commits)",
            old, outcome.tag_name, outcome.change_class, outcome.commit_count
        ),
        None => format!(
            "{} (initial tag, {} change)",
            outcome.tag_name, outcome.change_class
        ),
    }
}

/// Print warnings, the proposed/created tag and manifest changes.
pub fn display_release_summary(outcome: &ReleaseOutcome, manifests: &[ManifestChange]) {
    for warning in &outcome.warnings {
        display_boundary_warning(warning);
    }

    let change = format_tag_change(outcome);
    match &outcome.created {
        Some(reference) => display_success(&format!("Created {} [{}]", change, reference.ref_name)),
        None => display_status(&format!("Dry run: would create {}", change)),
    }

    for manifest in manifests {
        let verb = if manifest.written { "Updated" } else { "Would update" };
        display_status(&format!(
            "{} {} version to {}",
            verb,
            manifest.path.display(),
            outcome.version
        ));
    }
}
