//! Completion telemetry
//!
//! Specimens announce arc completion with a `[KBE:x]` tag line through
//! `tracing`. This is an informal convention the host dashboards grep for,
//! not a wire format.

use crate::specimen::SpecimenMeta;

/// Emit the completion tag line for a specimen
pub fn log_completion(meta: &SpecimenMeta, detail: &str) {
    tracing::info!(
        target: "navicue::kbe",
        specimen = meta.id,
        series = meta.series,
        "[KBE:{}] {} {}",
        meta.kbe.code(),
        meta.title,
        detail
    );
}

/// Emit a gate-opened line (the payoff moment began)
pub fn log_gate(meta: &SpecimenMeta) {
    tracing::debug!(
        target: "navicue::kbe",
        specimen = meta.id,
        "[KBE:{}] {} gate=open",
        meta.kbe.code(),
        meta.title
    );
}
