//! Integration tests for editor crate: render intents flowing into the document

use lowcode_editor::{Catalog, EditorError, Mutation, MutationError, PageDocument};
use lowcode_registry::builtins::builtin_registrations;
use lowcode_registry::ComponentRegistry;
use lowcode_render::{DragEvent, DragPhase, DropPosition, RenderEngine, RenderOptions, RenderMode};
use lowcode_schema::{
    find_node_by_id, AdvancedConfig, ComponentConfigure, ComponentNode, MaterialDescriptor,
    PageSchema, Props,
};
use serde_json::json;

fn registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.register_many(builtin_registrations());
    registry
}

fn catalog(registry: &ComponentRegistry) -> Catalog {
    registry
        .get_all_components()
        .iter()
        .map(|registration| registration.descriptor.clone())
        .collect()
}

fn page() -> PageSchema {
    PageSchema::new("home", "Home", ComponentNode::new("container", "root"))
}

#[test]
fn test_panel_drop_round_trip() {
    let registry = registry();
    let mut doc = PageDocument::new(page()).with_catalog(catalog(&registry));
    let mut engine = RenderEngine::new(
        doc.schema().clone(),
        registry,
        RenderOptions::for_mode(RenderMode::Design),
    );
    let mut events = engine.subscribe();

    let position = engine.classify_drop("root", 150.0, 0.0, 300.0).unwrap();
    engine.handle_drag_event(DragEvent::from_panel(DragPhase::Drop, "text").over("root", position));

    let mut added = None;
    while let Ok(event) = events.try_recv() {
        if let Some(result) = doc.apply_event(&event).unwrap() {
            added = Some(result.node_id);
        }
    }
    let added = added.unwrap();

    let node = find_node_by_id(doc.root(), &added).unwrap();
    assert_eq!(node.component_type, "text");
    assert_eq!(node.props["content"], json!("Text"));
    assert_eq!(node.parent_id.as_deref(), Some("root"));

    engine.set_schema(doc.schema().clone());
    let vnode = engine.render();
    assert!(vnode.text_content().contains("Text"));
}

#[test]
fn test_prop_change_and_removal_through_events() {
    let registry = registry();
    let root = ComponentNode::new("container", "root")
        .with_child(ComponentNode::new("button", "b"))
        .with_child(ComponentNode::new("text", "t"));
    let mut doc = PageDocument::new(PageSchema::new("p", "P", root)).with_catalog(catalog(&registry));
    let mut engine = RenderEngine::new(doc.schema().clone(), registry, RenderOptions::for_mode(RenderMode::Design));
    let mut events = engine.subscribe();

    assert!(engine.handle_prop_change("b", "text", json!("Save")));
    assert!(engine.remove_component("t"));

    while let Ok(event) = events.try_recv() {
        doc.apply_event(&event).unwrap();
    }

    assert_eq!(find_node_by_id(doc.root(), "b").unwrap().props["text"], json!("Save"));
    assert!(find_node_by_id(doc.root(), "t").is_none());
    assert_eq!(doc.version, 2);
}

#[test]
fn test_initial_children_are_cloned_with_fresh_ids() {
    let mut card = MaterialDescriptor::new("card", "card").container();
    card.configure = Some(ComponentConfigure {
        advanced: Some(AdvancedConfig {
            initial_children: vec![ComponentNode::new("text", "template-title")],
        }),
        ..Default::default()
    });

    let mut doc = PageDocument::new(page());
    doc.register_descriptors([
        MaterialDescriptor::new("container", "container").container(),
        card,
    ]);

    let first = doc
        .apply(Mutation::AddComponent {
            component_type: "card".to_string(),
            target_node_id: "root".to_string(),
            position: DropPosition::Inside,
            props: Props::new(),
        })
        .unwrap();
    let second = doc
        .apply(Mutation::AddComponent {
            component_type: "card".to_string(),
            target_node_id: "root".to_string(),
            position: DropPosition::Inside,
            props: Props::new(),
        })
        .unwrap();

    let a = find_node_by_id(doc.root(), &first.node_id).unwrap();
    let b = find_node_by_id(doc.root(), &second.node_id).unwrap();
    assert_eq!(a.children.len(), 1);
    assert_ne!(a.children[0].id, "template-title");
    assert_ne!(a.children[0].id, b.children[0].id);
}

#[test]
fn test_rejected_move_is_reported() {
    let mut doc = PageDocument::new(PageSchema::new(
        "p",
        "P",
        ComponentNode::new("container", "root").with_child(ComponentNode::new("container", "box")),
    ))
    .with_catalog(catalog(&registry()));

    let result = doc.apply(Mutation::MoveComponent {
        source_node_id: "root".to_string(),
        target_node_id: "box".to_string(),
        position: DropPosition::Inside,
    });
    assert!(matches!(
        result,
        Err(EditorError::Mutation(MutationError::RootNode(_)))
    ));
    assert_eq!(doc.version, 0);
}

#[test]
fn test_file_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("home.page.json");

    let mut doc = PageDocument::new(page()).with_catalog(catalog(&registry()));
    doc.apply(Mutation::AddComponent {
        component_type: "button".to_string(),
        target_node_id: "root".to_string(),
        position: DropPosition::Inside,
        props: Props::new(),
    })?;
    doc.save_as(&path)?;
    assert!(!doc.is_dirty());

    let loaded = PageDocument::load(&path)?;
    assert_eq!(loaded.root().children.len(), 1);
    assert_eq!(loaded.root().children[0].props["text"], json!("Button"));
    assert_eq!(loaded.path.as_deref(), Some(path.as_path()));

    let mut other = PageDocument::new(page());
    let report = other.import_json(&doc.export_json()?);
    assert!(report.success, "{}", report.message);
    assert_eq!(other.root(), doc.root());
    Ok(())
}
