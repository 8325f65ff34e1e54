//! Lowering: from the schema model to the emission IR. All naming and
//! derivation decisions happen here; the emitter only formats.

use structforge::error::Result;
use structforge::inflect::{classify, singularize, type_class_name};
use structforge::schema::{
    rule_for_field, Association, CompositeField, Field, ScalarKind, Structure, Type, TypeField,
    ValidatorRule,
};

use crate::ir::{Accessor, AssocAccessor, PositionIr, ReadArm, TypeIr, WriteArm};
use crate::names::{short_getter_name, uses_short_getter, NameCache};

/// Lower every type of the structure, in declaration order.
pub fn lower(structure: &Structure) -> Result<Vec<TypeIr>> {
    structure.validate()?;
    structure
        .types()
        .map(|ty| lower_type(structure, ty))
        .collect()
}

/// Lower a single type into its emission IR.
pub fn lower_type(structure: &Structure, ty: &Type) -> Result<TypeIr> {
    let config = structure.config();
    let mut names = NameCache::new();

    let managed = managed_fields(ty);

    let fields: Vec<String> = managed.iter().map(|(f, _)| f.name().to_string()).collect();

    let default_values: Vec<_> = managed
        .iter()
        .filter(|(f, _)| f.name() != "id")
        .filter_map(|(f, _)| f.default().map(|v| (f.name().to_string(), v.clone())))
        .collect();

    let generated_fields: Vec<_> = managed
        .iter()
        .flat_map(|(f, _)| f.generated_fields().iter())
        .map(|g| (g.name().to_string(), g.cast()))
        .collect();

    let mut accessors = Vec::new();
    for (field, trim) in &managed {
        if field.name() == "id" {
            continue;
        }
        let short_getter = (field.kind() == ScalarKind::Bool
            && uses_short_getter(field.name()))
        .then(|| short_getter_name(field.name()));
        accessors.push(Accessor {
            field: field.name().to_string(),
            getter: names.getter(field.name()),
            setter: Some(names.setter(field.name())),
            short_getter,
            kind: field.kind(),
            required: field.is_required(),
            protected_setter: field.protects_setter(),
            trim_value: *trim,
        });
    }
    for (field, _) in &managed {
        for generated in field.generated_fields() {
            // Generated columns get a read-only accessor; the short alias
            // follows the name prefix alone.
            let short_getter =
                uses_short_getter(generated.name()).then(|| short_getter_name(generated.name()));
            accessors.push(Accessor {
                field: generated.name().to_string(),
                getter: names.getter(generated.name()),
                setter: None,
                short_getter,
                kind: generated.cast(),
                required: false,
                protected_setter: false,
                trim_value: false,
            });
        }
    }

    let read_arms: Vec<ReadArm> = managed
        .iter()
        .filter(|(f, _)| f.deserializes())
        .map(|(f, _)| ReadArm {
            field: f.name().to_string(),
            kind: f.kind(),
        })
        .collect();

    let mut write_arms: Vec<WriteArm> = Vec::new();
    for (field, _) in &managed {
        let cast = field.kind();
        match write_arms.iter_mut().find(|arm| arm.cast == cast) {
            Some(arm) => arm.fields.push(field.name().to_string()),
            None => write_arms.push(WriteArm {
                cast,
                fields: vec![field.name().to_string()],
            }),
        }
    }

    let validator_rules = validator_rules(ty);
    let association_accessors = association_accessors(ty);

    let position = ty.fields().values().find_map(|entry| match entry {
        TypeField::Composite(CompositeField::Position(p)) => Some(PositionIr {
            mode: p.mode(),
            context: p.context().to_vec(),
        }),
        _ => None,
    });

    Ok(TypeIr {
        type_name: type_class_name(ty.name()),
        table_name: ty.name().to_string(),
        namespace: structure.namespace().map(|s| s.to_string()),
        header_comment: config.header_comment.clone(),
        doc_properties: config.doc_properties.clone(),
        fields,
        default_values,
        generated_fields,
        order_by: ty.order_by().to_vec(),
        protected_fields: ty.protected_fields().to_vec(),
        capabilities: ty.capabilities().to_vec(),
        position,
        accessors,
        read_arms,
        write_arms,
        association_accessors,
        serialize_extra: ty.serialize_list().to_vec(),
        validator_rules,
        deprecate_long_bool_getter: config.deprecate_long_bool_getter,
    })
}

/// Managed columns in order: `id` first, declared fields with composites
/// flattened in place (name fields marked for trimming), association
/// foreign keys last.
fn managed_fields(ty: &Type) -> Vec<(Field, bool)> {
    let mut managed: Vec<(Field, bool)> = Vec::new();
    for entry in ty.fields().values() {
        match entry {
            TypeField::Scalar(f) => managed.push((f.clone(), false)),
            TypeField::Composite(c) => {
                let trim = matches!(c, CompositeField::Name(_));
                for f in c.fields() {
                    managed.push((f, trim));
                }
            }
        }
    }
    for association in ty.associations().values() {
        for field in association.injected_fields() {
            if !managed.iter().any(|(m, _)| m.name() == field.name()) {
                managed.push((field, false));
            }
        }
    }
    managed
}

/// Validation lines in declaration order: composite-contributed lines
/// first within each composite, then its subfields; association-injected
/// foreign keys last.
fn validator_rules(ty: &Type) -> Vec<ValidatorRule> {
    let mut rules = Vec::new();
    for entry in ty.fields().values() {
        match entry {
            TypeField::Scalar(f) => rules.extend(rule_for_field(f)),
            TypeField::Composite(c) => {
                rules.extend(c.validator_rules());
                for f in c.fields() {
                    rules.extend(rule_for_field(&f));
                }
            }
        }
    }
    for association in ty.associations().values() {
        for field in association.injected_fields() {
            rules.extend(rule_for_field(&field));
        }
    }
    rules
}

fn association_accessors(ty: &Type) -> Vec<AssocAccessor> {
    ty.associations()
        .values()
        .map(|association| match association {
            Association::BelongsTo(a) => AssocAccessor::BelongsTo {
                getter: format!("get{}", classify(a.name())),
                setter: format!("set{}", classify(a.name())),
                fk_field: a.field_name(),
                target_class: type_class_name(&a.target_type_name()),
                target_table: a.target_type_name(),
                required: a.is_required(),
            },
            Association::HasOne(a) => AssocAccessor::HasOne {
                getter: format!("get{}", classify(a.name())),
                setter: format!("set{}", classify(a.name())),
                fk_field: a.field_name(),
                target_class: type_class_name(&a.target_type_name()),
                target_table: a.target_type_name(),
                required: a.is_required(),
            },
            Association::HasMany(a) => AssocAccessor::HasMany {
                getter: format!("get{}", classify(a.name())),
                finder_field: format!("{}_finder", a.name()),
                target_class: type_class_name(&a.target_type_name()),
                target_table: a.target_type_name(),
                fk_field: a.source_key_field_name(),
                order_by: a.order_clause().map(|s| s.to_string()),
            },
            Association::HasAndBelongsToMany(a) => AssocAccessor::Habtm {
                getter: format!("get{}", classify(a.name())),
                finder_field: format!("{}_finder", a.name()),
                target_class: type_class_name(&a.target_type_name()),
                target_table: a.target_type_name(),
                join_table: a.join_table_name(),
                left_field: a.left_field_name(),
                right_field: a.right_field_name(),
                add_method: format!("add{}", classify(a.name())),
                remove_method: format!("remove{}", classify(a.name())),
                clear_method: format!("clear{}", classify(a.name())),
                order_by: a.order_clause().map(|s| s.to_string()),
                source_singular: singularize(a.source_type_name()),
                target_singular: singularize(&a.target_type_name()),
            },
        })
        .collect()
}
