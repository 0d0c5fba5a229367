//! Requirement-name → configuration-name mapping.
//!
//! The requirement sheet lists multi-axis sensors once per axis
//! (`Accel_X`, `Accel_Y`); the configuration lists the physical sensor once.
//! Normalizing collapses the axis rows onto one lookup key.

/// Remove every `_`, then one trailing `X` or `Y` (axis suffix).
///
/// Total and case-sensitive: lowercase `x`/`y` are kept.
pub fn normalize_sensor_name(name: &str) -> String {
    let mut key: String = name.chars().filter(|&c| c != '_').collect();
    if key.ends_with(['X', 'Y']) {
        key.pop();
    }
    key
}
