use super::{build_registry, load_store, read_schema};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use lowcode_registry::ComponentRegistry;
use lowcode_render::{RenderEngine, RenderOptions};
use lowcode_schema::PageSchema;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Page schema JSON file
    pub input: PathBuf,

    /// Materials directory (overrides materialsDir in the config file)
    #[arg(short, long)]
    pub materials: Option<String>,

    /// Render mode (design, preview, runtime)
    #[arg(long)]
    pub mode: Option<String>,

    /// Select a node before rendering
    #[arg(long)]
    pub select: Option<String>,

    /// Write the rendered tree here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Render `schema` once and serialize the VNode tree
pub fn render_to_json(
    schema: PageSchema,
    registry: ComponentRegistry,
    options: RenderOptions,
    selected: Option<String>,
) -> Result<String> {
    let mut engine = RenderEngine::new(schema, registry, options);
    if selected.is_some() {
        engine.select_component(selected);
    }
    let vnode = engine.render();
    serde_json::to_string_pretty(&vnode).context("Failed to serialize rendered tree")
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let options = config.render_options(args.mode.as_deref())?;

    eprintln!(
        "🎨 {} {} ({} mode)",
        "Rendering".green().bold(),
        args.input.display(),
        options.mode
    );

    let store = load_store(config.get_materials_dir(cwd, args.materials.as_deref()).as_ref())?;
    let registry = build_registry(&store);
    let schema = read_schema(&PathBuf::from(cwd).join(&args.input))?;

    let json = render_to_json(schema, registry, options, args.select)?;

    match args.output {
        Some(output) => {
            let output = PathBuf::from(cwd).join(output);
            std::fs::write(&output, json)
                .with_context(|| format!("Cannot write {}", output.display()))?;
            eprintln!("   {} {}", "✓".green(), output.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
