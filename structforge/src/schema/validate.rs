//! Validation rules derived from field flags.
//!
//! The rules are schema semantics, not emitted text: the emission engine
//! renders them into the generated type's validation hook, composite-field
//! contributions first, per-subfield rules after.

use serde::Serialize;

use super::field::Field;

/// One line of a generated validation hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValidatorRule {
    Present {
        field: String,
    },
    Unique {
        field: String,
        context: Vec<String>,
    },
    PresentAndUnique {
        field: String,
        context: Vec<String>,
    },
}

impl ValidatorRule {
    pub fn field(&self) -> &str {
        match self {
            ValidatorRule::Present { field }
            | ValidatorRule::Unique { field, .. }
            | ValidatorRule::PresentAndUnique { field, .. } => field,
        }
    }
}

/// Derive the validation rule for a single field, if its flags call for one.
pub fn rule_for_field(field: &Field) -> Option<ValidatorRule> {
    let context = field.uniqueness_context().to_vec();
    match (field.is_required(), field.is_unique()) {
        (true, true) => Some(ValidatorRule::PresentAndUnique {
            field: field.name().to_string(),
            context,
        }),
        (true, false) => Some(ValidatorRule::Present {
            field: field.name().to_string(),
        }),
        (false, true) => Some(ValidatorRule::Unique {
            field: field.name().to_string(),
            context,
        }),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_unique_with_context() {
        let field = Field::string("plan_name")
            .required()
            .unique_within(&["day"])
            .unwrap();
        assert_eq!(
            rule_for_field(&field),
            Some(ValidatorRule::PresentAndUnique {
                field: "plan_name".into(),
                context: vec!["day".into()],
            })
        );
    }

    #[test]
    fn test_required_only() {
        let field = Field::string("name").required();
        assert_eq!(
            rule_for_field(&field),
            Some(ValidatorRule::Present { field: "name".into() })
        );
    }

    #[test]
    fn test_unique_only() {
        let field = Field::string("email").unique().unwrap();
        assert_eq!(
            rule_for_field(&field),
            Some(ValidatorRule::Unique {
                field: "email".into(),
                context: vec![],
            })
        );
    }

    #[test]
    fn test_no_flags_no_rule() {
        assert_eq!(rule_for_field(&Field::string("bio")), None);
    }
}
