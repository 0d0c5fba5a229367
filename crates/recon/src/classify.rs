use crate::model::{Classification, ConfiguredTable, ReconciliationResult, RequirementEntry};
use crate::normalize::normalize_sensor_name;

/// Classify one requirement against the configured table.
///
/// The table is keyed by the *raw* configured name while the probe uses the
/// *normalized* requirement name. A configured `AccelX` is therefore never
/// found by `Accel_X` (which normalizes to `Accel`). This asymmetry is the
/// current contract; `tests/integration.rs` pins it.
pub fn classify_entry(requirement: &RequirementEntry, table: &ConfiguredTable) -> ReconciliationResult {
    let lookup_key = normalize_sensor_name(&requirement.sensor_name);
    let configured = table.get(&lookup_key);

    let classification = match configured {
        None => Classification::Missing,
        Some(state) => classify_state(requirement.is_required, state),
    };

    ReconciliationResult {
        sensor_name: requirement.sensor_name.clone(),
        is_required: requirement.is_required,
        lookup_key,
        classification,
        matched_configured_state: configured.map(str::to_string),
    }
}

/// Compare a required flag against a configured state token.
///
/// Tokens other than `true`/`false` (any case) mismatch both polarities.
pub fn classify_state(is_required: bool, configured_state: &str) -> Classification {
    let expected = if is_required { "true" } else { "false" };
    if configured_state.eq_ignore_ascii_case(expected) {
        Classification::Consistent
    } else {
        Classification::Mismatched
    }
}

/// One result per requirement, in requirement order.
pub fn reconcile(requirements: &[RequirementEntry], table: &ConfiguredTable) -> Vec<ReconciliationResult> {
    requirements.iter().map(|r| classify_entry(r, table)).collect()
}
