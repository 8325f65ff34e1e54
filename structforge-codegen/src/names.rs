//! Accessor naming: the bit-exact getter/setter contract generated code
//! exposes, memoized per field name.

use heck::{ToLowerCamelCase, ToPascalCase};
use std::collections::HashMap;

const BOOL_PREFIXES: [&str; 6] = ["is_", "has_", "had_", "was_", "were_", "have_"];

/// Memoizing cache for getter/setter method names. Both names for a field
/// are derived together on first use and reused afterwards.
#[derive(Default)]
pub struct NameCache {
    getters: HashMap<String, String>,
    setters: HashMap<String, String>,
}

impl NameCache {
    pub fn new() -> Self {
        NameCache::default()
    }

    /// `get` + PascalCase(field), e.g. `is_active` -> `getIsActive`.
    pub fn getter(&mut self, field_name: &str) -> String {
        self.fill(field_name);
        self.getters[field_name].clone()
    }

    /// `set` + PascalCase(field), e.g. `is_active` -> `setIsActive`.
    pub fn setter(&mut self, field_name: &str) -> String {
        self.fill(field_name);
        self.setters[field_name].clone()
    }

    fn fill(&mut self, field_name: &str) {
        if !self.getters.contains_key(field_name) {
            let classified = field_name.to_pascal_case();
            self.getters
                .insert(field_name.to_string(), format!("get{classified}"));
            self.setters
                .insert(field_name.to_string(), format!("set{classified}"));
        }
    }
}

/// Whether the field name carries a boolean prefix that earns a short
/// getter alias.
pub fn uses_short_getter(field_name: &str) -> bool {
    BOOL_PREFIXES.iter().any(|p| field_name.starts_with(p))
}

/// The ergonomic alias offered next to the canonical getter:
/// lowerCamelCase of the full field name, e.g. `is_active` -> `isActive`.
pub fn short_getter_name(field_name: &str) -> String {
    field_name.to_lower_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_getter_and_setter_names() {
        let mut names = NameCache::new();
        assert_eq!(names.getter("name"), "getName");
        assert_eq!(names.setter("name"), "setName");
        assert_eq!(names.getter("is_active"), "getIsActive");
        assert_eq!(names.setter("is_active"), "setIsActive");
        assert_eq!(names.getter("number_of_active_users"), "getNumberOfActiveUsers");
    }

    #[test]
    fn test_names_are_memoized_together() {
        let mut names = NameCache::new();
        names.getter("day");
        assert_eq!(names.setters.len(), 1);
        assert_eq!(names.setter("day"), "setDay");
        assert_eq!(names.getters.len(), 1);
    }

    #[test]
    fn test_short_getter_prefixes() {
        for name in [
            "is_active",
            "has_chapters",
            "had_cover",
            "was_published",
            "were_sold",
            "have_reviews",
        ] {
            assert!(uses_short_getter(name), "{name} should use a short getter");
        }
        assert!(!uses_short_getter("active"));
        assert!(!uses_short_getter("island")); // prefix needs the underscore
    }

    #[test]
    fn test_short_getter_name() {
        assert_eq!(short_getter_name("is_active"), "isActive");
        assert_eq!(short_getter_name("was_published_on_day"), "wasPublishedOnDay");
    }
}
