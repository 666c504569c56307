use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use graphview_core::{GraphSnapshot, NodeId};
use graphview_events::LayoutName;
use graphview_graph::{GraphModel, Orientation};
use graphview_workbench::{GraphSession, WorkbenchSettings};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print node, edge and kind counts of a snapshot
    Summary {
        /// Path to the JSON snapshot
        snapshot: PathBuf,
    },
    /// Run a layout preset and print the resulting positions as JSON
    Layout {
        snapshot: PathBuf,

        /// organic, sequential, hierarchy, lens, radial or structural.
        /// Defaults to the preset saved in the settings.
        #[arg(short, long)]
        layout: Option<String>,

        /// Center node for radial layouts
        #[arg(long)]
        center: Option<String>,

        #[arg(long)]
        radius: Option<f32>,

        /// 0 (loose) to 10 (tight)
        #[arg(long)]
        tightness: Option<u8>,

        /// down, up, left or right
        #[arg(long)]
        orientation: Option<String>,

        /// Limit the layout to these node ids
        #[arg(long, value_delimiter = ',')]
        nodes: Vec<String>,
    },
    /// Export node attributes as CSV
    Export {
        snapshot: PathBuf,

        /// Attribute columns to include after the ID column
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct Placement<'a> {
    id: &'a NodeId,
    x: f32,
    y: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let settings = WorkbenchSettings::load();

    match args.command {
        Command::Summary { snapshot } => {
            let model = GraphModel::from_snapshot(read_snapshot(&snapshot)?)?;
            print_summary(&model);
        }
        Command::Layout {
            snapshot,
            layout,
            center,
            radius,
            tightness,
            orientation,
            nodes,
        } => {
            let name = match layout {
                Some(layout) => LayoutName::parse(&layout)
                    .ok_or_else(|| anyhow!("Unknown layout '{}'", layout))?,
                None => settings.layout_name,
            };
            let mut params = settings.layout.clone();
            if let Some(center) = center {
                params.center = Some(NodeId(center));
            }
            if let Some(radius) = radius {
                params.radius = radius;
            }
            if let Some(tightness) = tightness {
                params.tightness = tightness;
            }
            if let Some(orientation) = orientation {
                params.orientation = parse_orientation(&orientation)?;
            }

            let mut session = GraphSession::from_snapshot(read_snapshot(&snapshot)?, &settings)?;
            let ids: Vec<NodeId> = nodes.into_iter().map(NodeId).collect();
            let moved = session.apply_layout_with(name, &ids, &params)?;
            tracing::info!("Moved {} nodes", moved);

            let placements: Vec<Placement> = session
                .model()
                .nodes()
                .map(|n| Placement {
                    id: &n.id,
                    x: n.position.x,
                    y: n.position.y,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&placements)?);
        }
        Command::Export {
            snapshot,
            columns,
            out,
        } => {
            let session = GraphSession::from_snapshot(read_snapshot(&snapshot)?, &settings)?;
            let csv = session.export_csv(&columns)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Wrote {} rows to {:?}", session.model().node_count(), path);
                }
                None => println!("{}", csv),
            }
        }
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<GraphSnapshot> {
    GraphSnapshot::load(path).with_context(|| format!("Failed to load snapshot {:?}", path))
}

fn parse_orientation(value: &str) -> Result<Orientation> {
    match value.to_ascii_lowercase().as_str() {
        "down" => Ok(Orientation::Down),
        "up" => Ok(Orientation::Up),
        "left" => Ok(Orientation::Left),
        "right" => Ok(Orientation::Right),
        other => Err(anyhow!("Unknown orientation '{}'", other)),
    }
}

fn print_summary(model: &GraphModel) {
    println!("Nodes: {}", model.node_count());
    println!("Edges: {}", model.edge_count());

    for kind in graphview_core::NodeKind::ALL {
        let count = model.nodes().filter(|n| n.kind == kind).count();
        if count > 0 {
            println!("  {:<12} {}", kind.as_str(), count);
        }
    }

    let mapped = model.edges().filter(|e| e.field_mapping.is_some()).count();
    let self_loops = model.edges().filter(|e| e.is_self_loop()).count();
    println!("Field-mapped edges: {}", mapped);
    println!("Self loops: {}", self_loops);

    if let Some(busiest) = model.nodes().max_by_key(|n| model.degree(&n.id)) {
        println!(
            "Busiest node: {} ({} edges)",
            busiest.id,
            model.degree(&busiest.id)
        );
    }
}
