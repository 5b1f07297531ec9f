use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lowcode_registry::builtins::builtin_registrations;
use lowcode_registry::ComponentRegistry;
use lowcode_render::{RenderEngine, RenderMode, RenderOptions};
use lowcode_schema::{ComponentNode, PageSchema};

/// Form-like page: `sections` containers holding `fields` text/input pairs
fn build_page(sections: usize, fields: usize) -> PageSchema {
    let mut root = ComponentNode::new("container", "root");
    for s in 0..sections {
        let mut section = ComponentNode::new("form", format!("s{}", s));
        for f in 0..fields {
            section
                .children
                .push(ComponentNode::new("text", format!("s{}-l{}", s, f)).with_prop("content", "Label"));
            section
                .children
                .push(ComponentNode::new("input", format!("s{}-i{}", s, f)));
        }
        root.children.push(section);
    }
    PageSchema::new("bench", "Bench", root)
}

fn registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.register_many(builtin_registrations());
    registry
}

fn render_small_page(c: &mut Criterion) {
    let mut engine = RenderEngine::new(build_page(3, 5), registry(), RenderOptions::default());

    c.bench_function("render_page_34_nodes", |b| b.iter(|| black_box(engine.render())));
}

fn render_large_page_design(c: &mut Criterion) {
    let mut engine = RenderEngine::new(
        build_page(20, 25),
        registry(),
        RenderOptions::for_mode(RenderMode::Design),
    );
    engine.select_component(Some("s10-i10".to_string()));

    c.bench_function("render_page_1021_nodes_design", |b| {
        b.iter(|| black_box(engine.render()))
    });
}

fn resolve_large_page(c: &mut Criterion) {
    let mut engine = RenderEngine::new(build_page(20, 25), registry(), RenderOptions::default());

    c.bench_function("resolve_page_1021_nodes", |b| {
        b.iter(|| black_box(engine.resolve()))
    });
}

criterion_group!(benches, render_small_page, render_large_page_design, resolve_large_page);
criterion_main!(benches);
