//! Structural check for LCP license JSON.

use serde_json::Value;

/// JSON pointers that must resolve to a non-empty string in every license.
const REQUIRED_STRINGS: &[&str] = &[
    "/id",
    "/issued",
    "/provider",
    "/encryption/profile",
    "/encryption/content_key/algorithm",
    "/encryption/content_key/encrypted_value",
    "/encryption/user_key/algorithm",
    "/encryption/user_key/key_check",
    "/encryption/user_key/text_hint",
    "/signature/algorithm",
    "/signature/certificate",
    "/signature/value",
];

/// Returns `true` if `license` has every field a usable LCP license needs.
///
/// This only checks structure; it says nothing about whether the signature
/// verifies or the passphrase is known.
///
/// ```
/// use folio_publication::is_well_formed;
/// use serde_json::json;
///
/// assert!(!is_well_formed(&json!({"id": "abc"})));
/// assert!(!is_well_formed(&json!("not an object")));
/// ```
pub fn is_well_formed(license: &Value) -> bool {
    let strings = REQUIRED_STRINGS
        .iter()
        .all(|pointer| license.pointer(pointer).and_then(Value::as_str).is_some_and(|s| !s.is_empty()));
    let links = license.get("links").and_then(Value::as_array).is_some_and(|links| !links.is_empty());
    strings && links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::tests::well_formed_license;
    use rstest::rstest;

    #[test]
    fn test_complete_license_is_well_formed() {
        assert!(is_well_formed(&well_formed_license()));
    }

    #[rstest]
    #[case("/id")]
    #[case("/provider")]
    #[case("/encryption/content_key/encrypted_value")]
    #[case("/encryption/user_key/text_hint")]
    #[case("/encryption/user_key/key_check")]
    #[case("/signature/value")]
    fn test_missing_field(#[case] pointer: &str) {
        let mut license = well_formed_license();
        let (parent, field) = pointer.rsplit_once('/').unwrap();
        let parent = if parent.is_empty() { &mut license } else { license.pointer_mut(parent).unwrap() };
        parent.as_object_mut().unwrap().remove(field);
        assert!(!is_well_formed(&license));
    }

    #[test]
    fn test_empty_string_is_missing() {
        let mut license = well_formed_license();
        license["id"] = Value::from("");
        assert!(!is_well_formed(&license));
    }

    #[test]
    fn test_links_required() {
        let mut license = well_formed_license();
        license["links"] = Value::Array(vec![]);
        assert!(!is_well_formed(&license));
        license.as_object_mut().unwrap().remove("links");
        assert!(!is_well_formed(&license));
    }
}
