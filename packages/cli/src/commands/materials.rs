use super::load_store;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lowcode_material::MaterialStore;
use lowcode_schema::MaterialDescriptor;
use std::collections::BTreeMap;

#[derive(Args, Debug)]
pub struct MaterialsArgs {
    /// Materials directory (overrides materialsDir in the config file)
    #[arg(short, long)]
    pub materials: Option<String>,

    /// Only list materials of this group
    #[arg(short, long)]
    pub group: Option<String>,

    /// Only list materials carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Print the matching descriptors as JSON
    #[arg(long)]
    pub json: bool,
}

/// Materials matching the group and tag filters, grouped for display
pub fn select_materials(
    store: &MaterialStore,
    group: Option<&str>,
    tag: Option<&str>,
) -> BTreeMap<String, Vec<MaterialDescriptor>> {
    let mut groups = store.group_materials();
    if let Some(group) = group {
        groups.retain(|name, _| name == group);
    }
    if let Some(tag) = tag {
        for materials in groups.values_mut() {
            materials.retain(|m| m.tags.contains(tag));
        }
        groups.retain(|_, materials| !materials.is_empty());
    }
    groups
}

pub fn materials(args: MaterialsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let dir = config
        .get_materials_dir(cwd, args.materials.as_deref())
        .ok_or_else(|| anyhow::anyhow!("No materials directory. Pass --materials or set materialsDir"))?;

    println!("📦 {} {}", "Materials".green().bold(), dir.display());
    let store = load_store(Some(&dir))?;
    let groups = select_materials(&store, args.group.as_deref(), args.tag.as_deref());

    if args.json {
        let all: Vec<&MaterialDescriptor> = groups.values().flatten().collect();
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    println!();
    for (group, materials) in &groups {
        println!("   {}", group.bold());
        for material in materials {
            let marker = if material.accepts_children() {
                "▣".cyan()
            } else {
                "▪".normal()
            };
            println!(
                "     {} {} {}",
                marker,
                material.type_name,
                format!("({})", material.display_title()).dimmed()
            );
        }
    }

    let count: usize = groups.values().map(Vec::len).sum();
    println!();
    println!("   {} material(s) in {} group(s)", count, groups.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MaterialStore {
        let mut store = MaterialStore::new();
        store.collect(
            MaterialDescriptor::new("", "input")
                .with_group("form")
                .with_tag("field"),
        );
        store.collect(MaterialDescriptor::new("", "select").with_group("form"));
        store.collect(MaterialDescriptor::new("", "chart").with_group("data").with_tag("field"));
        store
    }

    #[test]
    fn test_group_filter() {
        let groups = select_materials(&store(), Some("form"), None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["form"].len(), 2);
    }

    #[test]
    fn test_tag_filter_drops_empty_groups() {
        let groups = select_materials(&store(), Some("form"), Some("field"));
        assert_eq!(groups["form"].len(), 1);
        assert_eq!(groups["form"][0].type_name, "input");

        let groups = select_materials(&store(), None, Some("missing"));
        assert!(groups.is_empty());
    }
}
