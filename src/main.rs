use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;

use sollum_assets::conversion::convert_scene;
use sollum_assets::import::import_gltf;
use sollum_assets::scene_graph::{NodeId, Scene};
use sollum_assets::ConversionConfig;

/// Turns imported drawables and fragments into flat, tagged assets.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// glTF or GLB file to convert
    input: PathBuf,

    /// Index of the scene to load (defaults to the document's default scene)
    #[arg(long)]
    scene: Option<usize>,

    /// Keep a fragment's lone drawable model as an asset instead of discarding it
    #[arg(long)]
    keep_single_models: bool,

    /// Rename and tag bound boxes before removing them
    #[arg(long)]
    flatten_bound_boxes: bool,

    /// Only print the imported hierarchy
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn conversion_config(&self) -> ConversionConfig {
        ConversionConfig {
            discard_single_model_assets: !self.keep_single_models,
            flatten_bound_boxes: self.flatten_bound_boxes,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();
    let mut scene = import_gltf(&args.input, args.scene)?;

    println!("Imported hierarchy:");
    print_hierarchy(&scene);

    if args.dry_run {
        return Ok(());
    }

    let report = convert_scene(&mut scene, &args.conversion_config());

    println!();
    println!("Converted hierarchy:");
    print_hierarchy(&scene);

    println!();
    println!(
        "{} assets, {} nodes removed, {} renamed",
        report.assets.len(),
        report.removed,
        report.renamed
    );
    for failure in &report.failures {
        println!("  {} failed on {:?}: {}", failure.stage, failure.node, failure.error);
    }
    if let Some(error) = &report.aborted {
        println!("Conversion stopped early: {}", error);
    }

    Ok(())
}

fn print_hierarchy(scene: &Scene) {
    for (id, _) in scene.roots() {
        print_node(scene, id, 1);
    }
}

fn print_node(scene: &Scene, id: NodeId, depth: usize) {
    let Some(node) = scene.get_node(id) else {
        return;
    };

    let mut line = format!("{}{}", "  ".repeat(depth), node.name);
    if let Some(type_tag) = node.type_tag {
        line.push_str(&format!(" [{}]", type_tag));
    }
    if !node.meshes.is_empty() {
        line.push_str(&format!(" meshes: {}", node.meshes.iter().join(", ")));
    }
    if node.is_asset() {
        line.push_str(" (asset)");
    }
    println!("{}", line);

    for &child_id in &node.child_ids {
        print_node(scene, child_id, depth + 1);
    }
}
