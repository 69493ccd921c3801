//! Identifier casing and sanitization.

use crate::NameError;

/// Uppercase the first character of a segment and lowercase the rest.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Check whether a name is PascalCase (e.g., "PascalCase" but not "pascal_case")
pub fn is_pascal_case(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Convert a string to PascalCase (e.g., "pascal_case" -> "PascalCase")
///
/// Every underscore-separated segment is capitalized, so letters after the
/// first one are lowercased: "MyMockType" becomes "Mymocktype".
pub fn to_pascal_case(s: &str) -> String {
    s.split('_').map(capitalize).collect()
}

/// Turn an arbitrary record label into a class identifier.
///
/// Leading underscores are kept. Spaces, hyphens, underscores and any other
/// non-alphanumeric character split the remainder into segments, which are
/// capitalized and joined. A result starting with a digit gets a `_` prefix.
///
/// ```
/// use litgen_core::sanitize_class_name;
///
/// assert_eq!(sanitize_class_name("My-Mock Type"), "MyMockType");
/// assert_eq!(sanitize_class_name("9 My Mock Type"), "_9MyMockType");
/// ```
pub fn sanitize_class_name(s: &str) -> String {
    let body = s.trim_start_matches('_');
    let prefix = &s[..s.len() - body.len()];

    let mut sanitized = String::from(prefix);
    for segment in body.split(|c: char| !c.is_alphanumeric()) {
        sanitized.push_str(&capitalize(segment));
    }

    if sanitized.starts_with(|c: char| c.is_numeric()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

/// Derive an enum key (SCREAMING_SNAKE_CASE) from a class label.
///
/// Letters are uppercased as-is (no split on case boundaries), every run of
/// non-alphanumeric characters becomes a single underscore. Keys that would
/// start with a digit are prefixed with `_`, and a leading underscore in the
/// input is doubled.
pub fn create_enum_key_from_class_name(s: &str) -> Result<String, NameError> {
    if s.is_empty() {
        return Err(NameError::EmptyInput);
    }

    let mut key = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_uppercase());
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    while key.len() > 1 && key.ends_with('_') {
        key.pop();
    }

    if key.starts_with(|c: char| c.is_ascii_digit()) || s.starts_with('_') {
        key.insert(0, '_');
    }
    Ok(key)
}

/// Check whether a name can be used verbatim as an identifier in generated code.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pascal_case() {
        assert!(is_pascal_case("PascalCase"));
        assert!(is_pascal_case("AnotherExample"));
        assert!(is_pascal_case("Platform2"));
        assert!(!is_pascal_case("notPascalCase"));
        assert!(!is_pascal_case("another_example"));
        assert!(!is_pascal_case("Another-Example"));
        assert!(!is_pascal_case(""));
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("pascal_case"), "PascalCase");
        assert_eq!(to_pascal_case("another_example"), "AnotherExample");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_pascal_case_lowercases_segment_tails() {
        assert_eq!(to_pascal_case("alreadyPascalCase"), "Alreadypascalcase");
        assert_eq!(to_pascal_case("MyMockType"), "Mymocktype");
    }

    #[test]
    fn test_sanitize_class_name() {
        assert_eq!(sanitize_class_name("My_Mock_Type"), "MyMockType");
        assert_eq!(sanitize_class_name("my_mock_type"), "MyMockType");
        assert_eq!(sanitize_class_name("MyMockType"), "Mymocktype");
        assert_eq!(sanitize_class_name("My Mock Type"), "MyMockType");
        assert_eq!(sanitize_class_name("My-Mock-Type"), "MyMockType");
        assert_eq!(sanitize_class_name("9MyMockType"), "_9mymocktype");
        assert_eq!(sanitize_class_name("9 My Mock Type"), "_9MyMockType");
        assert_eq!(sanitize_class_name("9-My-Mock-Type"), "_9MyMockType");
        assert_eq!(sanitize_class_name("_MyMockType"), "_Mymocktype");
    }

    #[test]
    fn test_sanitize_class_name_drops_punctuation() {
        assert_eq!(
            sanitize_class_name("Electrophysiology (ecephys)"),
            "ElectrophysiologyEcephys"
        );
        assert_eq!(sanitize_class_name("v1.2"), "V12");
        assert_eq!(sanitize_class_name(""), "");
    }

    #[test]
    fn test_sanitize_class_name_never_starts_with_digit() {
        for input in ["1", "42 things", "0_zero", "7-up", "3.14", "9MyMockType", "a1"] {
            let name = sanitize_class_name(input);
            assert!(
                !name.starts_with(|c: char| c.is_ascii_digit()),
                "{input:?} -> {name:?}"
            );
        }
    }

    #[test]
    fn test_create_enum_key_from_class_name() {
        let key = |s| create_enum_key_from_class_name(s).unwrap();
        assert_eq!(key("MyClassName"), "MYCLASSNAME");
        assert_eq!(key("my_class_name"), "MY_CLASS_NAME");
        assert_eq!(key("My-Class-Name"), "MY_CLASS_NAME");
        assert_eq!(key("My Class Name"), "MY_CLASS_NAME");
        assert_eq!(key("9MyClassName"), "_9MYCLASSNAME");
        assert_eq!(key("_MyClassName"), "__MYCLASSNAME");
        assert_eq!(key("9"), "_9");
    }

    #[test]
    fn test_create_enum_key_from_empty_name() {
        assert_eq!(
            create_enum_key_from_class_name(""),
            Err(NameError::EmptyInput)
        );
    }

    #[test]
    fn test_create_enum_key_alphabet() {
        for input in ["a b", "x--y", "Électro (phys)", "tab\tname", "ß", "__", "end."] {
            let key = create_enum_key_from_class_name(input).unwrap();
            assert!(
                key.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'),
                "{input:?} -> {key:?}"
            );
        }
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("name"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("field_2"));
        assert!(!is_valid_identifier("2field"));
        assert!(!is_valid_identifier("with space"));
        assert!(!is_valid_identifier(""));
    }
}
