//! Property tests for validation rules of the AOP model

use aop_core::{
    classify_object, Association, ComponentAssociation, KeyEvent, KeyEventRelationship,
    KeyEventType, NodeType, ValidationError,
};
use proptest::prelude::*;

fn event_id() -> impl Strategy<Value = String> {
    "[1-9][0-9]{0,4}"
}

fn key_event(id: &str, ke_type: KeyEventType) -> KeyEvent {
    KeyEvent::from_uri(format!("https://identifiers.org/aop.events/{}", id), "", ke_type).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_relationship_rejects_self_loop(id in event_id(), ker in "[1-9][0-9]{0,4}") {
        let upstream = key_event(&id, KeyEventType::Mie);
        let downstream = key_event(&id, KeyEventType::Ao);

        let result = KeyEventRelationship::new(ker.clone(), format!("https://identifiers.org/aop.relationships/{}", ker), upstream, downstream);
        let is_self_loop = matches!(result, Err(ValidationError::SelfLoop { .. }));
        prop_assert!(is_self_loop);
    }

    #[test]
    fn prop_relationship_accepts_distinct_endpoints(a in event_id(), b in event_id()) {
        prop_assume!(a != b);
        let relationship = KeyEventRelationship::new(
            "1",
            "https://identifiers.org/aop.relationships/1",
            key_event(&a, KeyEventType::Ke),
            key_event(&b, KeyEventType::Ke),
        )
        .unwrap();

        let edge = relationship.to_graph_edge();
        prop_assert_ne!(edge.source, edge.target);
    }

    #[test]
    fn prop_component_without_process_has_no_elements(
        name in "[a-z ]{0,20}",
        object in "(http://purl.obolibrary.org/obo/GO_[0-9]{7})?",
        action in "[a-z ]{0,12}",
    ) {
        let component = ComponentAssociation::new("https://identifiers.org/aop.events/1", "")
            .unwrap()
            .with_ke_name(name.clone())
            .with_process_name(name)
            .with_object(object, "", "")
            .with_action(action);

        prop_assert!(component.to_graph_elements().is_empty());
    }

    #[test]
    fn prop_organ_context_always_classifies_as_organ(iri in "http://x\\.org/[A-Za-z_0-9]{1,12}", name in "[a-z]{0,10}") {
        let node_type = classify_object(&iri, &name, "http://aopkb.org/aop_ontology#OrganContext");
        prop_assert_eq!(node_type, NodeType::Organ);
    }

    #[test]
    fn prop_uberon_objects_are_organs(id in "[0-9]{7}") {
        let iri = format!("http://purl.obolibrary.org/obo/UBERON_{}", id);
        prop_assert_eq!(classify_object(&iri, "", ""), NodeType::Organ);
    }
}
