#![cfg(target_arch = "wasm32")]

use lowcode_wasm::Canvas;
use serde_json::Value;
use wasm_bindgen_test::wasm_bindgen_test;

const PAGE: &str = r#"{
    "id": "home",
    "name": "Home",
    "title": "Home",
    "root": {
        "id": "root",
        "componentType": "container",
        "children": [{ "id": "t", "componentType": "text", "props": { "content": "Hi" } }]
    }
}"#;

#[wasm_bindgen_test]
fn canvas_renders_and_accepts_a_drop() {
    let mut canvas = Canvas::new(PAGE, None).unwrap();
    assert!(canvas.render().unwrap().contains("Hi"));

    canvas
        .drag(r#"{"phase":"drop","sourceComponentType":"button","targetNodeId":"root","position":"inside"}"#)
        .unwrap();
    assert_eq!(canvas.version(), 1);

    let exported: Value = serde_json::from_str(&canvas.export_schema().unwrap()).unwrap();
    assert_eq!(exported["root"]["children"].as_array().unwrap().len(), 2);
}

#[wasm_bindgen_test]
fn runtime_canvas_ignores_drops() {
    let mut canvas = Canvas::new(PAGE, Some("runtime".to_string())).unwrap();
    canvas
        .drag(r#"{"phase":"drop","sourceComponentType":"button","targetNodeId":"root","position":"inside"}"#)
        .unwrap();
    assert_eq!(canvas.version(), 0);
}
