//! Emission: render a [`TypeIr`] into formatted Rust source.
//!
//! The emitted definition is an artifact, not part of this workspace: it
//! references the external `structforge_runtime` crate for entity storage,
//! finders, join-table mutation, casting and validation, the same way the
//! original generated classes leaned on their object library.

use heck::{ToPascalCase, ToSnakeCase};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use structforge::error::{Result, StructureError};
use structforge::inflect::humanize;
use structforge::schema::{Capability, InsertMode, ScalarKind};
use structforge::Value;

use crate::ir::{Accessor, AssocAccessor, TypeIr};

/// File name for a type's emitted definition, e.g. `Book` -> `book.rs`.
pub fn file_name(ir: &TypeIr) -> String {
    format!("{}.rs", ir.type_name.to_snake_case())
}

/// Render the full definition: header comment, imports, struct and impls.
pub fn emit_type(ir: &TypeIr) -> Result<String> {
    let tokens = type_tokens(ir);
    let file: syn::File = syn::parse2(tokens).map_err(|e| {
        StructureError::Schema(format!(
            "emitted definition for '{}' does not parse: {e}",
            ir.type_name
        ))
    })?;

    let mut out = String::new();
    if let Some(header) = &ir.header_comment {
        for line in header.lines() {
            if line.is_empty() {
                out.push_str("//\n");
            } else {
                out.push_str("// ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push('\n');
    }
    if let Some(namespace) = &ir.namespace {
        out.push_str(&format!("//! Part of the `{namespace}` model.\n\n"));
    }
    out.push_str(&prettyplease::unparse(&file));
    Ok(out)
}

fn type_tokens(ir: &TypeIr) -> TokenStream {
    let imports = import_tokens(ir);
    let struct_def = struct_tokens(ir);
    let base = base_impl_tokens(ir);
    let read_hook = read_hook_tokens(ir);
    let dispatcher = dispatcher_tokens(ir);
    let accessors = accessors_impl_tokens(ir);
    let associations = associations_impl_tokens(ir);
    let serialize = serialize_tokens(ir);
    let validate = validate_tokens(ir);
    let behaviours = behaviour_tokens(ir);

    quote! {
        #imports
        #struct_def
        #base
        #read_hook
        #dispatcher
        #accessors
        #associations
        #serialize
        #validate
        #behaviours
    }
}

fn import_tokens(ir: &TypeIr) -> TokenStream {
    let mut items: Vec<&str> = vec!["Cast", "Entity", "Value"];
    if !ir.finder_fields().is_empty() {
        items.push("Finder");
    }
    if ir
        .association_accessors
        .iter()
        .any(|a| matches!(a, AssocAccessor::Habtm { .. }))
    {
        items.push("RuntimeError");
    }
    if !ir.validator_rules.is_empty() {
        items.push("Validator");
    }
    if !ir.generated_fields.is_empty() {
        items.push("ValueCaster");
    }
    let kinds: Vec<ScalarKind> = ir.accessors.iter().map(|a| a.kind).collect();
    if kinds.contains(&ScalarKind::Date) {
        items.push("Date");
    }
    if kinds.contains(&ScalarKind::DateTime) {
        items.push("DateTime");
    }
    if kinds.contains(&ScalarKind::Json) {
        items.push("JsonValue");
    }
    items.sort();
    let idents: Vec<_> = items.iter().map(|i| format_ident!("{i}")).collect();

    let once_cell = if ir.finder_fields().is_empty() {
        quote! {}
    } else {
        quote! { use std::cell::OnceCell; }
    };

    quote! {
        use structforge_runtime::{#(#idents),*};
        #once_cell
    }
}

fn struct_tokens(ir: &TypeIr) -> TokenStream {
    let name = format_ident!("{}", ir.type_name);
    let table_doc = format!(" A record from the `{}` table.", ir.table_name);
    let property_docs: Vec<String> = ir
        .doc_properties
        .iter()
        .map(|(property, ty)| format!(" @property {ty} ${property}"))
        .collect();
    let finder_fields: Vec<_> = ir
        .finder_fields()
        .iter()
        .map(|f| format_ident!("{f}"))
        .collect();

    quote! {
        #[doc = #table_doc]
        #(#[doc = #property_docs])*
        pub struct #name {
            entity: Entity,
            #(#finder_fields: OnceCell<Finder>,)*
        }
    }
}

fn base_impl_tokens(ir: &TypeIr) -> TokenStream {
    let name = format_ident!("{}", ir.type_name);
    let table_name = &ir.table_name;
    let fields = &ir.fields;
    let generated_names: Vec<&String> = ir.generated_fields.iter().map(|(n, _)| n).collect();
    let finder_fields: Vec<_> = ir
        .finder_fields()
        .iter()
        .map(|f| format_ident!("{f}"))
        .collect();

    let order_by = if ir.order_by == ["id"] {
        quote! {}
    } else {
        let order_by = &ir.order_by;
        quote! {
            pub const ORDER_BY: &'static [&'static str] = &[#(#order_by),*];
        }
    };

    let protected = if ir.protected_fields.is_empty() {
        quote! {}
    } else {
        let protected = &ir.protected_fields;
        quote! {
            pub const PROTECTED_FIELDS: &'static [&'static str] = &[#(#protected),*];
        }
    };

    let defaults = if ir.default_values.is_empty() {
        quote! {}
    } else {
        let entries: Vec<TokenStream> = ir
            .default_values
            .iter()
            .map(|(field, value)| {
                let literal = value_literal(value);
                quote! { (#field, #literal) }
            })
            .collect();
        quote! {
            /// Default values applied to unset fields on insert.
            pub fn default_field_values() -> Vec<(&'static str, Value)> {
                vec![#(#entries),*]
            }
        }
    };

    let configure = if ir.generated_fields.is_empty() {
        quote! {}
    } else {
        let entries: Vec<TokenStream> = ir
            .generated_fields
            .iter()
            .map(|(field, cast)| {
                let cast = cast_tokens(*cast);
                quote! { (#field, #cast) }
            })
            .collect();
        quote! {
            fn configure(&mut self) {
                self.entity.set_generated_fields_value_caster(ValueCaster::new(&[
                    #(#entries),*
                ]));
            }
        }
    };

    let construct = quote! {
        #name {
            entity,
            #(#finder_fields: OnceCell::new(),)*
        }
    };
    let new = if ir.generated_fields.is_empty() {
        quote! {
            pub fn new(entity: Entity) -> Self {
                #construct
            }
        }
    } else {
        quote! {
            pub fn new(entity: Entity) -> Self {
                let mut record = #construct;
                record.configure();
                record
            }
        }
    };

    quote! {
        impl #name {
            /// Name of the table where records are stored.
            pub const TABLE_NAME: &'static str = #table_name;
            /// Table fields managed by this record.
            pub const FIELDS: &'static [&'static str] = &[#(#fields),*];
            /// Generated fields that are loaded, but not managed.
            pub const GENERATED_FIELDS: &'static [&'static str] = &[#(#generated_names),*];
            #order_by
            #protected

            #new

            pub fn id(&self) -> i64 {
                self.entity.id()
            }

            pub fn is_saved(&self) -> bool {
                self.entity.is_saved()
            }

            #defaults
            #configure
        }
    }
}

fn read_hook_tokens(ir: &TypeIr) -> TokenStream {
    if ir.read_arms.is_empty() {
        return quote! {};
    }
    let name = format_ident!("{}", ir.type_name);
    let arms: Vec<TokenStream> = ir
        .read_arms
        .iter()
        .map(|arm| {
            let field = &arm.field;
            let cast = cast_tokens(arm.kind);
            quote! { #field => #cast.apply(value), }
        })
        .collect();

    quote! {
        impl #name {
            /// Read with per-field deserializing on top of the base read.
            pub fn field_value(&self, name: &str) -> Value {
                let value = self.entity.field_value(name);
                if value.is_null() {
                    return Value::Null;
                }
                match name {
                    #(#arms)*
                    _ => value,
                }
            }
        }
    }
}

fn dispatcher_tokens(ir: &TypeIr) -> TokenStream {
    let name = format_ident!("{}", ir.type_name);
    let arms: Vec<TokenStream> = ir
        .write_arms
        .iter()
        .map(|arm| {
            let fields = &arm.fields;
            if arm.cast == ScalarKind::Mixed {
                quote! {
                    #(#fields)|* => {
                        self.entity.write_field(name, value);
                    }
                }
            } else {
                let cast = cast_tokens(arm.cast);
                quote! {
                    #(#fields)|* => {
                        self.entity.write_field(name, #cast.apply(value));
                    }
                }
            }
        })
        .collect();

    quote! {
        impl #name {
            /// Cast and store a field value. Writes to generated fields or
            /// unknown names are rejected, except while the entity is
            /// loading from storage.
            pub fn set_field_value(&mut self, name: &str, value: Value) -> &mut Self {
                if value.is_null() {
                    self.entity.write_field(name, Value::Null);
                    return self;
                }
                match name {
                    #(#arms)*
                    _ => {
                        if self.entity.is_loading() {
                            self.entity.write_field(name, value);
                        } else if Self::GENERATED_FIELDS.contains(&name) {
                            panic!("generated field {name} cannot be set by directly assigning a value");
                        } else {
                            panic!("field {name} does not exist in this table");
                        }
                    }
                }
                self
            }
        }
    }
}

fn accessors_impl_tokens(ir: &TypeIr) -> TokenStream {
    if ir.accessors.is_empty() {
        return quote! {};
    }
    let name = format_ident!("{}", ir.type_name);
    let methods: Vec<TokenStream> = ir
        .accessors
        .iter()
        .map(|accessor| accessor_tokens(ir, accessor))
        .collect();

    quote! {
        #[allow(non_snake_case)]
        impl #name {
            #(#methods)*
        }
    }
}

fn accessor_tokens(ir: &TypeIr, accessor: &Accessor) -> TokenStream {
    let field = &accessor.field;
    let getter_doc = format!(" Return value of `{field}` field.");
    let return_ty = getter_return(accessor.kind, accessor.required);
    let conversion = getter_conversion(accessor.kind, accessor.required);
    let read = if ir.read_arms.is_empty() {
        quote! { self.entity.field_value(#field) }
    } else {
        quote! { self.field_value(#field) }
    };

    let mut tokens = TokenStream::new();

    if let Some(short) = &accessor.short_getter {
        let short_ident = format_ident!("{short}");
        tokens.extend(quote! {
            #[doc = #getter_doc]
            pub fn #short_ident(&self) -> #return_ty {
                #read #conversion
            }
        });
    }

    let getter = format_ident!("{}", accessor.getter);
    let deprecation = match (&accessor.short_getter, ir.deprecate_long_bool_getter) {
        (Some(short), true) => {
            let note = format!("use {short}()");
            quote! { #[deprecated(note = #note)] }
        }
        _ => quote! {},
    };
    tokens.extend(quote! {
        #[doc = #getter_doc]
        #deprecation
        pub fn #getter(&self) -> #return_ty {
            #read #conversion
        }
    });

    if let Some(setter) = &accessor.setter {
        let setter_doc = format!(" Set value of `{field}` field.");
        let setter_ident = format_ident!("{setter}");
        let param_ty = setter_param(accessor.kind, accessor.required);
        let value_expr = setter_value(accessor.kind, accessor.required, accessor.trim_value);
        let visibility = if accessor.protected_setter {
            quote! {}
        } else {
            quote! { pub }
        };
        tokens.extend(quote! {
            #[doc = #setter_doc]
            #visibility fn #setter_ident(&mut self, value: #param_ty) -> &mut Self {
                self.set_field_value(#field, #value_expr);
                self
            }
        });
    }

    tokens
}

fn associations_impl_tokens(ir: &TypeIr) -> TokenStream {
    if ir.association_accessors.is_empty() {
        return quote! {};
    }
    let name = format_ident!("{}", ir.type_name);
    let read_hook = !ir.read_arms.is_empty();
    let methods: Vec<TokenStream> = ir
        .association_accessors
        .iter()
        .map(|accessor| association_tokens(accessor, read_hook))
        .collect();

    quote! {
        #[allow(non_snake_case)]
        impl #name {
            #(#methods)*
        }
    }
}

fn association_tokens(accessor: &AssocAccessor, read_hook: bool) -> TokenStream {
    match accessor {
        AssocAccessor::BelongsTo {
            getter,
            setter,
            fk_field,
            target_class,
            target_table,
            ..
        }
        | AssocAccessor::HasOne {
            getter,
            setter,
            fk_field,
            target_class,
            target_table,
            ..
        } => {
            let getter_ident = format_ident!("{getter}");
            let setter_ident = format_ident!("{setter}");
            let target = format_ident!("{target_class}");
            let getter_doc = format!(" Return the {} referenced by `{fk_field}`.", target_class);
            let setter_doc = format!(" Point `{fk_field}` at the given {}.", target_class);
            let read = if read_hook {
                quote! { self.field_value(#fk_field) }
            } else {
                quote! { self.entity.field_value(#fk_field) }
            };
            quote! {
                #[doc = #getter_doc]
                pub fn #getter_ident(&self) -> Option<#target> {
                    self.entity
                        .related_by_id(#target_table, #read.to_opt_int())
                        .map(#target::new)
                }

                #[doc = #setter_doc]
                pub fn #setter_ident(&mut self, value: &#target) -> &mut Self {
                    self.set_field_value(#fk_field, Value::from(value.id()));
                    self
                }
            }
        }
        AssocAccessor::HasMany {
            getter,
            finder_field,
            target_table,
            fk_field,
            order_by,
            ..
        } => {
            let getter_ident = format_ident!("{getter}");
            let finder_ident = format_ident!("{finder_field}");
            let doc = format!(" Return the `{target_table}` finder instance, scoped by this record.");
            let ordering = match order_by {
                Some(clause) => quote! { .ordered_by(#clause) },
                None => quote! {},
            };
            quote! {
                #[doc = #doc]
                pub fn #getter_ident(&self) -> &Finder {
                    self.#finder_ident.get_or_init(|| {
                        self.entity
                            .finder(#target_table)
                            .scoped_by(#fk_field, self.entity.id())
                            #ordering
                    })
                }
            }
        }
        AssocAccessor::Habtm {
            getter,
            finder_field,
            target_class,
            target_table,
            join_table,
            left_field,
            right_field,
            add_method,
            remove_method,
            clear_method,
            order_by,
            source_singular,
            target_singular,
        } => {
            let getter_ident = format_ident!("{getter}");
            let finder_ident = format_ident!("{finder_field}");
            let add_ident = format_ident!("{add_method}");
            let remove_ident = format_ident!("{remove_method}");
            let clear_ident = format_ident!("{clear_method}");
            let target = format_ident!("{target_class}");
            let param_ident = format_ident!("{}", target_table.to_snake_case());
            let scope_field = format!("{join_table}.{left_field}");
            let ordering = match order_by {
                Some(clause) => quote! { .ordered_by(#clause) },
                None => quote! {},
            };

            let owner_unsaved = format!("{} needs to be saved first", ucfirst(source_singular));
            let related_unsaved =
                format!("All {} needs to be saved first", humanize(target_singular));
            let getter_doc =
                format!(" Return the `{target_table}` finder instance, joined through `{join_table}`.");
            let add_doc = format!(
                " Create connections between this {source_singular} and the given {target_table}."
            );
            let remove_doc = format!(
                " Drop connections between this {source_singular} and the given {target_table}."
            );
            let clear_doc =
                format!(" Drop all connections between {target_table} and this {source_singular}.");

            quote! {
                #[doc = #getter_doc]
                pub fn #getter_ident(&self) -> &Finder {
                    self.#finder_ident.get_or_init(|| {
                        self.entity
                            .finder(#target_table)
                            .join_table(#join_table)
                            .scoped_by(#scope_field, self.entity.id())
                            #ordering
                    })
                }

                #[doc = #add_doc]
                pub fn #add_ident(&mut self, #param_ident: &[&#target]) -> Result<&mut Self, RuntimeError> {
                    if !self.is_saved() {
                        panic!(#owner_unsaved);
                    }
                    let mut ids = Vec::new();
                    for related in #param_ident {
                        if !related.is_saved() {
                            panic!(#related_unsaved);
                        }
                        ids.push(related.id());
                    }
                    self.entity
                        .join_table(#join_table, #left_field, #right_field)
                        .add(self.id(), &ids)?;
                    Ok(self)
                }

                #[doc = #remove_doc]
                pub fn #remove_ident(&mut self, #param_ident: &[&#target]) -> Result<&mut Self, RuntimeError> {
                    if !self.is_saved() {
                        panic!(#owner_unsaved);
                    }
                    let mut ids = Vec::new();
                    for related in #param_ident {
                        if !related.is_saved() {
                            panic!(#related_unsaved);
                        }
                        ids.push(related.id());
                    }
                    self.entity
                        .join_table(#join_table, #left_field, #right_field)
                        .remove(self.id(), &ids)?;
                    Ok(self)
                }

                #[doc = #clear_doc]
                pub fn #clear_ident(&mut self) -> Result<&mut Self, RuntimeError> {
                    if !self.is_saved() {
                        panic!(#owner_unsaved);
                    }
                    self.entity
                        .join_table(#join_table, #left_field, #right_field)
                        .clear(self.id())?;
                    Ok(self)
                }
            }
        }
    }
}

fn serialize_tokens(ir: &TypeIr) -> TokenStream {
    if ir.serialize_extra.is_empty() {
        return quote! {};
    }
    let name = format_ident!("{}", ir.type_name);
    let entries: Vec<TokenStream> = ir
        .serialize_extra
        .iter()
        .map(|field| {
            let getter = format_ident!("get{}", field.to_pascal_case());
            quote! { (#field, Value::from(self.#getter())) }
        })
        .collect();

    quote! {
        #[allow(non_snake_case)]
        impl #name {
            /// Extra fields exposed beyond the base representation.
            pub fn serialize_extra(&self) -> Vec<(&'static str, Value)> {
                vec![#(#entries),*]
            }
        }
    }
}

fn validate_tokens(ir: &TypeIr) -> TokenStream {
    if ir.validator_rules.is_empty() {
        return quote! {};
    }
    let name = format_ident!("{}", ir.type_name);
    let lines: Vec<TokenStream> = ir
        .validator_rules
        .iter()
        .map(|rule| {
            use structforge::schema::ValidatorRule::*;
            match rule {
                Present { field } => quote! { validator.present(#field); },
                Unique { field, context } => {
                    quote! { validator.unique(#field, &[#(#context),*]); }
                }
                PresentAndUnique { field, context } => {
                    quote! { validator.present_and_unique(#field, &[#(#context),*]); }
                }
            }
        })
        .collect();

    quote! {
        impl #name {
            /// Validate record properties before the record is saved.
            pub fn validate(&self, validator: &mut Validator) {
                #(#lines)*
            }
        }
    }
}

fn behaviour_tokens(ir: &TypeIr) -> TokenStream {
    let name = format_ident!("{}", ir.type_name);
    let mut tokens = TokenStream::new();

    for capability in &ir.capabilities {
        match capability {
            Capability::CreatedAt => tokens.extend(quote! {
                impl structforge_runtime::behaviour::CreatedAt for #name {
                    fn created_at_value(&self) -> Value {
                        self.entity.field_value("created_at")
                    }
                }
            }),
            Capability::UpdatedAt => tokens.extend(quote! {
                impl structforge_runtime::behaviour::UpdatedAt for #name {
                    fn updated_at_value(&self) -> Value {
                        self.entity.field_value("updated_at")
                    }
                }
            }),
            Capability::Position => {
                let position = match &ir.position {
                    Some(p) => p.clone(),
                    None => continue,
                };
                let mode = match position.mode {
                    InsertMode::Head => quote! {
                        structforge_runtime::behaviour::PositionMode::Head
                    },
                    InsertMode::Tail => quote! {
                        structforge_runtime::behaviour::PositionMode::Tail
                    },
                };
                let context = &position.context;
                tokens.extend(quote! {
                    impl structforge_runtime::behaviour::Positioned for #name {
                        fn position_mode(&self) -> structforge_runtime::behaviour::PositionMode {
                            #mode
                        }

                        fn position_context(&self) -> &'static [&'static str] {
                            &[#(#context),*]
                        }
                    }
                });
            }
        }
    }

    tokens
}

fn cast_tokens(kind: ScalarKind) -> TokenStream {
    match kind {
        ScalarKind::Int => quote! { Cast::Int },
        ScalarKind::Float => quote! { Cast::Float },
        ScalarKind::Bool => quote! { Cast::Bool },
        ScalarKind::Date => quote! { Cast::Date },
        ScalarKind::DateTime => quote! { Cast::DateTime },
        ScalarKind::Json => quote! { Cast::Json },
        // String is the fallback for anything else.
        ScalarKind::String | ScalarKind::Mixed => quote! { Cast::String },
    }
}

fn getter_return(kind: ScalarKind, required: bool) -> TokenStream {
    let base = match kind {
        ScalarKind::String => quote! { String },
        ScalarKind::Int => quote! { i64 },
        ScalarKind::Float => quote! { f64 },
        ScalarKind::Bool => quote! { bool },
        ScalarKind::Date => quote! { Date },
        ScalarKind::DateTime => quote! { DateTime },
        ScalarKind::Json => quote! { JsonValue },
        ScalarKind::Mixed => return quote! { Value },
    };
    if required {
        base
    } else {
        quote! { Option<#base> }
    }
}

fn getter_conversion(kind: ScalarKind, required: bool) -> TokenStream {
    let method = match (kind, required) {
        (ScalarKind::String, true) => "to_string_value",
        (ScalarKind::String, false) => "to_opt_string",
        (ScalarKind::Int, true) => "to_int",
        (ScalarKind::Int, false) => "to_opt_int",
        (ScalarKind::Float, true) => "to_float",
        (ScalarKind::Float, false) => "to_opt_float",
        (ScalarKind::Bool, true) => "to_bool",
        (ScalarKind::Bool, false) => "to_opt_bool",
        (ScalarKind::Date, true) => "to_date",
        (ScalarKind::Date, false) => "to_opt_date",
        (ScalarKind::DateTime, true) => "to_datetime",
        (ScalarKind::DateTime, false) => "to_opt_datetime",
        (ScalarKind::Json, true) => "to_json",
        (ScalarKind::Json, false) => "to_opt_json",
        (ScalarKind::Mixed, _) => return quote! {},
    };
    let method = format_ident!("{method}");
    quote! { .#method() }
}

fn setter_param(kind: ScalarKind, required: bool) -> TokenStream {
    let base = match kind {
        ScalarKind::String => quote! { &str },
        ScalarKind::Int => quote! { i64 },
        ScalarKind::Float => quote! { f64 },
        ScalarKind::Bool => quote! { bool },
        ScalarKind::Date => quote! { Date },
        ScalarKind::DateTime => quote! { DateTime },
        ScalarKind::Json => quote! { &JsonValue },
        ScalarKind::Mixed => return quote! { Value },
    };
    if required {
        base
    } else {
        quote! { Option<#base> }
    }
}

fn setter_value(kind: ScalarKind, required: bool, trim: bool) -> TokenStream {
    match kind {
        ScalarKind::Mixed => quote! { value },
        ScalarKind::String if trim => {
            if required {
                quote! { Value::from(value.trim()) }
            } else {
                quote! { value.map(|value| Value::from(value.trim())).unwrap_or(Value::Null) }
            }
        }
        ScalarKind::Json => {
            if required {
                quote! { Value::from(value.clone()) }
            } else {
                quote! { value.map(|value| Value::from(value.clone())).unwrap_or(Value::Null) }
            }
        }
        _ => {
            if required {
                quote! { Value::from(value) }
            } else {
                quote! { value.map(Value::from).unwrap_or(Value::Null) }
            }
        }
    }
}

fn value_literal(value: &Value) -> TokenStream {
    match value {
        Value::Null => quote! { Value::Null },
        Value::Bool(b) => quote! { Value::from(#b) },
        Value::Int(n) => quote! { Value::from(#n) },
        Value::Float(f) => quote! { Value::from(#f) },
        Value::String(s) => quote! { Value::from(#s) },
        Value::Date(d) => {
            let s = d.format("%Y-%m-%d").to_string();
            quote! { Value::date_from_str(#s) }
        }
        Value::DateTime(dt) => {
            let s = dt.format("%Y-%m-%d %H:%M:%S").to_string();
            quote! { Value::datetime_from_str(#s) }
        }
        Value::Json(j) => {
            let s = j.to_string();
            quote! { Value::json_from_str(#s) }
        }
    }
}

fn ucfirst(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_type;
    use structforge::schema::{
        BelongsTo, Field, HasAndBelongsToMany, HasMany, NameField, PositionField, Structure,
    };

    fn emit_for(structure: &Structure, type_name: &str) -> String {
        let ir = lower_type(structure, structure.get_type(type_name).unwrap()).unwrap();
        emit_type(&ir).unwrap()
    }

    fn writers() -> Structure {
        let mut structure = Structure::new();
        structure
            .add_type("writers")
            .unwrap()
            .add_composite(NameField::new().required())
            .unwrap()
            .add_field(Field::bool("is_active").default_value(true))
            .unwrap();
        structure
    }

    #[test]
    fn test_emitted_source_is_valid_rust() {
        let code = emit_for(&writers(), "writers");
        assert!(syn::parse_file(&code).is_ok(), "not valid Rust:\n{code}");
    }

    #[test]
    fn test_boolean_field_gets_both_getters() {
        let code = emit_for(&writers(), "writers");
        assert!(code.contains("pub fn isActive(&self)"));
        assert!(code.contains("pub fn getIsActive(&self)"));
        assert!(code.contains("pub fn setIsActive(&mut self"));
        // Non-prefixed fields only get the canonical getter.
        assert!(code.contains("pub fn getName(&self)"));
        assert!(!code.contains("fn name(&self)"));
    }

    #[test]
    fn test_deprecation_of_long_bool_getter_is_config_driven() {
        let mut structure = writers();
        let code = emit_for(&structure, "writers");
        assert!(!code.contains("deprecated"));

        structure.config_mut().deprecate_long_bool_getter = true;
        let code = emit_for(&structure, "writers");
        assert!(code.contains("#[deprecated(note = \"use isActive()\")]"));
    }

    #[test]
    fn test_name_field_setter_trims() {
        let code = emit_for(&writers(), "writers");
        assert!(code.contains("Value::from(value.trim())"));
    }

    #[test]
    fn test_default_values_skip_identity_field() {
        let code = emit_for(&writers(), "writers");
        assert!(code.contains("default_field_values"));
        assert!(code.contains("(\"is_active\", Value::from(true))"));
        assert!(!code.contains("(\"id\","));
    }

    #[test]
    fn test_dispatcher_rejects_unknown_and_generated_fields() {
        let code = emit_for(&writers(), "writers");
        assert!(code.contains("if self.entity.is_loading()"));
        assert!(code.contains("cannot be set by directly assigning a value"));
        assert!(code.contains("does not exist in this table"));
    }

    #[test]
    fn test_no_read_hook_without_deserializing_fields() {
        let code = emit_for(&writers(), "writers");
        assert!(!code.contains("pub fn field_value"));
    }

    #[test]
    fn test_json_extraction_emits_casters_and_read_hook() {
        let mut structure = Structure::new();
        structure
            .add_type("stats_snapshots")
            .unwrap()
            .add_field(Field::date("day").required())
            .unwrap()
            .add_field(
                Field::json("stats")
                    .extract_value("plan_name", "$.plan_name", ScalarKind::String, true)
                    .unwrap()
                    .extract_value("is_used_on_day", "$.is_used_on_day", ScalarKind::Bool, false)
                    .unwrap(),
            )
            .unwrap();

        let code = emit_for(&structure, "stats_snapshots");
        assert!(code.contains("pub struct StatsSnapshot"));
        assert!(code.contains("ValueCaster::new"));
        assert!(code.contains("(\"plan_name\", Cast::String)"));
        assert!(code.contains("(\"is_used_on_day\", Cast::Bool)"));
        assert!(code.contains("pub fn field_value"));
        assert!(code.contains("\"stats\" => Cast::Json.apply(value)"));
        // Generated fields are read-only.
        assert!(code.contains("pub fn getPlanName"));
        assert!(!code.contains("pub fn setPlanName"));
        assert!(code.contains("pub fn isUsedOnDay"));
    }

    #[test]
    fn test_mixed_field_is_passed_through_untyped() {
        let mut structure = Structure::new();
        structure
            .add_type("events")
            .unwrap()
            .add_field(Field::mixed("payload"))
            .unwrap();

        let code = emit_for(&structure, "events");
        assert!(code.contains("pub fn getPayload(&self) -> Value"));
        // Mixed values skip casting in the write dispatcher: only the id
        // arm casts.
        assert!(code.contains("\"payload\" => {"));
        assert!(code.contains("Cast::Int.apply(value)"));
        assert!(!code.contains("Cast::String"));
    }

    #[test]
    fn test_validate_hook_only_when_rules_exist() {
        let code = emit_for(&writers(), "writers");
        assert!(code.contains("pub fn validate"));
        assert!(code.contains("validator.present(\"name\");"));

        let mut bare = Structure::new();
        bare.add_type("events")
            .unwrap()
            .add_field(Field::string("note"))
            .unwrap();
        let code = emit_for(&bare, "events");
        assert!(!code.contains("pub fn validate"));
    }

    #[test]
    fn test_belongs_to_accessors() {
        let mut structure = Structure::new();
        structure.add_type("writers").unwrap();
        structure
            .add_type("books")
            .unwrap()
            .add_association(BelongsTo::new("writer"))
            .unwrap();

        let code = emit_for(&structure, "books");
        assert!(code.contains("pub fn getWriter(&self) -> Option<Writer>"));
        assert!(code.contains("pub fn setWriter(&mut self, value: &Writer)"));
        assert!(code.contains("pub fn getWriterId(&self)"));
    }

    #[test]
    fn test_has_many_finder_is_memoized_and_ordered() {
        let mut structure = Structure::new();
        structure.add_type("chapters").unwrap();
        structure
            .add_type("books")
            .unwrap()
            .add_association(HasMany::new("chapters").order_by("position"))
            .unwrap();

        let code = emit_for(&structure, "books");
        assert!(code.contains("chapters_finder: OnceCell<Finder>"));
        assert!(code.contains("self.chapters_finder.get_or_init"));
        assert!(code.contains(".scoped_by(\"book_id\", self.entity.id())"));
        assert!(code.contains(".ordered_by(\"position\")"));
    }

    #[test]
    fn test_habtm_mutators() {
        let mut structure = Structure::new();
        structure.add_type("writers").unwrap();
        structure
            .add_type("books")
            .unwrap()
            .add_association(HasAndBelongsToMany::new("writers"))
            .unwrap();

        let code = emit_for(&structure, "books");
        assert!(code.contains("pub fn addWriters"));
        assert!(code.contains("pub fn removeWriters"));
        assert!(code.contains("pub fn clearWriters"));
        assert!(code.contains("\"Book needs to be saved first\""));
        assert!(code.contains("\"All writer needs to be saved first\""));
        assert!(code.contains(".join_table(\"books_writers\", \"book_id\", \"writer_id\")"));
        assert!(code.contains(".scoped_by(\"books_writers.book_id\", self.entity.id())"));
    }

    #[test]
    fn test_position_capability_emits_behaviour_impl() {
        let mut structure = Structure::new();
        structure
            .add_type("position_tail_entries")
            .unwrap()
            .add_composite(PositionField::new().tail())
            .unwrap();

        let code = emit_for(&structure, "position_tail_entries");
        assert!(code.contains("impl structforge_runtime::behaviour::Positioned for PositionTailEntry"));
        assert!(code.contains("PositionMode::Tail"));
    }

    #[test]
    fn test_header_comment_and_file_name() {
        let mut structure = writers();
        structure.config_mut().header_comment = Some("Generated model.\nDo not edit.".into());
        let ir = lower_type(&structure, structure.get_type("writers").unwrap()).unwrap();
        let code = emit_type(&ir).unwrap();
        assert!(code.starts_with("// Generated model.\n// Do not edit.\n"));
        assert_eq!(file_name(&ir), "writer.rs");
    }

    #[test]
    fn test_order_by_emitted_only_when_customized() {
        let mut structure = Structure::new();
        structure.add_type("events").unwrap();
        let code = emit_for(&structure, "events");
        assert!(!code.contains("ORDER_BY"));

        let mut structure = Structure::new();
        structure
            .add_type("events")
            .unwrap()
            .add_field(Field::datetime("happened_at").required())
            .unwrap()
            .set_order_by(&["happened_at", "id"]);
        let code = emit_for(&structure, "events");
        assert!(code.contains("pub const ORDER_BY: &'static [&'static str] = &[\"happened_at\", \"id\"]"));
    }
}
