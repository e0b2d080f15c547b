use crate::component::Component;
use crate::error::ValidationError;
use crate::resource::{Relation, Resource};
use std::collections::HashSet;

/// Validates the invariants that must hold before a component is handed to the construction
/// engine: unique identities per collection, exactly one of access/input per element, and the
/// `external` relation / access-without-relation rules that apply to resources only.
pub fn validate_component(component: &Component) -> Result<(), ValidationError> {
    validate_resources(component)?;
    validate_sources(component)?;
    validate_references(component)?;
    Ok(())
}

fn validate_resources(component: &Component) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for resource in &component.resources {
        let identity = identity_of(&component.meta.name, &resource.meta)?;

        if !seen.insert(identity.clone()) {
            return Err(ValidationError::DuplicateIdentity {
                component: component.meta.name.clone(),
                kind: "resources",
                identity,
            });
        }

        check_access_or_input(&component.meta.name, "resources", &identity, resource)?;

        if resource.relation == Some(Relation::External) && resource.access_or_input.is_input() {
            return Err(ValidationError::ExternalRelationWithInput {
                component: component.meta.name.clone(),
                identity,
            });
        }
        if resource.access_or_input.is_access() && resource.relation.is_none() {
            return Err(ValidationError::AccessWithoutRelation {
                component: component.meta.name.clone(),
                identity,
            });
        }
    }
    Ok(())
}

fn validate_sources(component: &Component) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for source in &component.sources {
        let identity = identity_of(&component.meta.name, &source.meta)?;

        if !seen.insert(identity.clone()) {
            return Err(ValidationError::DuplicateIdentity {
                component: component.meta.name.clone(),
                kind: "sources",
                identity,
            });
        }

        if source.access_or_input.validate().is_err() {
            let err = source.access_or_input.validate().unwrap_err();
            return Err(match err {
                crate::access_or_input::AccessOrInputError::Neither => {
                    ValidationError::MissingAccessOrInput {
                        component: component.meta.name.clone(),
                        kind: "sources",
                        identity,
                    }
                }
                crate::access_or_input::AccessOrInputError::Both => {
                    ValidationError::ConflictingAccessOrInput {
                        component: component.meta.name.clone(),
                        kind: "sources",
                        identity,
                    }
                }
            });
        }
    }
    Ok(())
}

fn validate_references(component: &Component) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for reference in &component.references {
        let identity = identity_of(&component.meta.name, &reference.meta)?;
        if !seen.insert(identity.clone()) {
            return Err(ValidationError::DuplicateIdentity {
                component: component.meta.name.clone(),
                kind: "references",
                identity,
            });
        }
    }
    Ok(())
}

fn check_access_or_input(
    component_name: &str,
    kind: &'static str,
    identity: &str,
    resource: &Resource,
) -> Result<(), ValidationError> {
    resource.access_or_input.validate().map_err(|e| match e {
        crate::access_or_input::AccessOrInputError::Neither => {
            ValidationError::MissingAccessOrInput {
                component: component_name.to_string(),
                kind,
                identity: identity.to_string(),
            }
        }
        crate::access_or_input::AccessOrInputError::Both => {
            ValidationError::ConflictingAccessOrInput {
                component: component_name.to_string(),
                kind,
                identity: identity.to_string(),
            }
        }
    })
}

fn identity_of(
    component_name: &str,
    meta: &crate::meta::ElementMeta,
) -> Result<String, ValidationError> {
    meta.identity()
        .map(|id| id.canonical())
        .map_err(|source| ValidationError::Identity {
            component: component_name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_or_input::AccessOrInput;
    use crate::component::{Component, Provider};
    use crate::meta::{ComponentMeta, ElementMeta};
    use crate::resource::Resource;
    use crate::typed_spec::{TypedSpec, TypedTag};
    use assert2::assert;

    fn component_with_resource(
        access_or_input: AccessOrInput,
        relation: Option<Relation>,
    ) -> Component {
        Component {
            meta: ComponentMeta::new("example.com/demo", "v1.0.0"),
            provider: Provider::new("acme"),
            resources: vec![Resource {
                meta: ElementMeta::new("cfg", "v1.0.0"),
                resource_type: "blob".to_string(),
                relation,
                source_refs: vec![],
                access_or_input,
            }],
            sources: vec![],
            references: vec![],
        }
    }

    #[test]
    fn rejects_neither_access_nor_input() {
        let component = component_with_resource(AccessOrInput::default(), Some(Relation::Local));
        let err = validate_component(&component).unwrap_err();
        assert!(matches!(err, ValidationError::MissingAccessOrInput { .. }));
    }

    #[test]
    fn rejects_both_access_and_input() {
        let spec = TypedSpec::new(TypedTag::new("utf8", "v2alpha1"), serde_json::json!({}));
        let access_or_input = AccessOrInput {
            access: Some(spec.clone()),
            input: Some(spec),
        };
        let component = component_with_resource(access_or_input, Some(Relation::Local));
        let err = validate_component(&component).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ConflictingAccessOrInput { .. }
        ));
    }

    #[test]
    fn rejects_access_without_relation() {
        let spec = TypedSpec::new(TypedTag::new("localBlob", "v1"), serde_json::json!({}));
        let component = component_with_resource(AccessOrInput::access(spec), None);
        let err = validate_component(&component).unwrap_err();
        assert!(matches!(err, ValidationError::AccessWithoutRelation { .. }));
    }

    #[test]
    fn rejects_external_relation_with_input() {
        let spec = TypedSpec::new(TypedTag::new("utf8", "v2alpha1"), serde_json::json!({}));
        let component =
            component_with_resource(AccessOrInput::input(spec), Some(Relation::External));
        let err = validate_component(&component).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ExternalRelationWithInput { .. }
        ));
    }

    #[test]
    fn accepts_well_formed_component() {
        let spec = TypedSpec::new(
            TypedTag::new("utf8", "v2alpha1"),
            serde_json::json!({"text": "hi"}),
        );
        let component = component_with_resource(AccessOrInput::input(spec), None);
        assert!(validate_component(&component).is_ok());
    }

    #[test]
    fn rejects_duplicate_resource_identity() {
        let spec = || {
            TypedSpec::new(
                TypedTag::new("utf8", "v2alpha1"),
                serde_json::json!({"text": "hi"}),
            )
        };
        let mut component = component_with_resource(AccessOrInput::input(spec()), None);
        component.resources.push(Resource {
            meta: ElementMeta::new("cfg", "v1.0.0"),
            resource_type: "blob".to_string(),
            relation: None,
            source_refs: vec![],
            access_or_input: AccessOrInput::input(spec()),
        });
        let err = validate_component(&component).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateIdentity { .. }));
    }
}
