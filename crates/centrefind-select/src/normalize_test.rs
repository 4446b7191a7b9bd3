use super::*;

// -----------------------------------------------------------------------
// normalize_facility_id
// -----------------------------------------------------------------------

#[test]
fn facility_id_strips_leading_zeros() {
    assert_eq!(normalize_facility_id("007").as_deref(), Some("7"));
    assert_eq!(normalize_facility_id("7").as_deref(), Some("7"));
}

#[test]
fn facility_id_trims_whitespace() {
    assert_eq!(normalize_facility_id("  0042 ").as_deref(), Some("42"));
}

#[test]
fn facility_id_all_zeros_is_zero() {
    assert_eq!(normalize_facility_id("000").as_deref(), Some("0"));
    assert_eq!(normalize_facility_id("0").as_deref(), Some("0"));
}

#[test]
fn facility_id_blank_is_none() {
    assert_eq!(normalize_facility_id(""), None);
    assert_eq!(normalize_facility_id("   "), None);
}

#[test]
fn facility_id_keeps_inner_zeros() {
    assert_eq!(normalize_facility_id("0100").as_deref(), Some("100"));
}

#[test]
fn facility_id_alphanumeric_strips_only_leading_zeros() {
    assert_eq!(normalize_facility_id("00A10").as_deref(), Some("A10"));
}

// -----------------------------------------------------------------------
// address validity
// -----------------------------------------------------------------------

#[test]
fn address_nan_placeholders_are_invalid() {
    assert!(!is_valid_address("nan"));
    assert!(!is_valid_address("NaN"));
    assert!(!is_valid_address("  nan "));
}

#[test]
fn address_blank_is_invalid() {
    assert!(!is_valid_address(""));
    assert!(!is_valid_address(" \t "));
}

#[test]
fn address_real_value_is_valid() {
    assert!(is_valid_address("123 Main St"));
    // A word merely containing "nan" is a real address.
    assert!(is_valid_address("Nantwich Road"));
}

#[test]
fn clean_address_trims_and_blanks_placeholders() {
    assert_eq!(clean_address("  123 Main St "), "123 Main St");
    assert_eq!(clean_address("NaN"), "");
}

#[test]
fn address_key_lowercases_and_trims() {
    assert_eq!(address_key(" 123 MAIN St "), "123 main st");
    assert_eq!(address_key("nan"), address_key(""));
}
