//! Identity and address normalization shared by consolidation and selection.

/// Normalize a facility identifier for identity comparison.
///
/// Trims whitespace and strips leading zeros, so `"007"` and `"7"` compare
/// equal. An id made only of zeros becomes `"0"`. Returns `None` for a blank id.
#[must_use]
pub fn normalize_facility_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped = trimmed.trim_start_matches('0');
    if stripped.is_empty() {
        Some("0".to_string())
    } else {
        Some(stripped.to_string())
    }
}

/// Whether an address is usable: non-blank and not a `nan` placeholder.
#[must_use]
pub fn is_valid_address(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
}

/// The address as it should appear on a consolidated record.
///
/// Placeholders collapse to the empty string.
#[must_use]
pub fn clean_address(raw: &str) -> String {
    if is_valid_address(raw) {
        raw.trim().to_string()
    } else {
        String::new()
    }
}

/// Grouping key for the `(facility_id, address)` duplicate pass.
#[must_use]
pub fn address_key(raw: &str) -> String {
    clean_address(raw).to_lowercase()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
