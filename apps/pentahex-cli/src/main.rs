use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use pentahex_geometry::{Constants, Face};
use pentahex_render::{DebugTextRenderer, DrawList, RenderView, Renderer};
use pentahex_tiling::{NodeId, RuleKind, Tiling, TilingInspector, TilingSummary};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Faces on the closed pentagonal hexecontahedron.
const SOLID_FACES: usize = 60;

#[derive(Parser)]
#[command(name = "pentahex-cli", about = "Pentagonal hexecontahedron faces and tilings")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derived face constants
    Constants {
        #[arg(long)]
        json: bool,
    },
    /// Print the face vertices and strip triangles
    Face {
        #[arg(long)]
        json: bool,
    },
    /// Grow a tiling from one root face and report its topology
    Tile {
        /// Placement rule: `planar` or `solid`
        #[arg(short, long, default_value = "solid")]
        rule: RuleKind,
        /// Maximum number of faces to create
        #[arg(short, long, default_value = "60")]
        max_faces: usize,
        #[arg(long)]
        json: bool,
        /// Fail on link conflicts or an unclosed solid
        #[arg(long)]
        strict: bool,
        /// Print every placed face
        #[arg(long)]
        dump: bool,
        /// Print placement and links of one node
        #[arg(long)]
        node: Option<usize>,
    },
}

#[derive(Serialize)]
struct FaceReport {
    vertices: Vec<[f32; 2]>,
    strip: Vec<u16>,
    triangles: Vec<[u16; 3]>,
    area: f32,
}

#[derive(Serialize)]
struct TileReport {
    summary: TilingSummary,
    state_hash: String,
    valid: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let constants = Constants::compute().context("deriving face constants")?;

    match cli.command {
        Commands::Constants { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&constants)?);
            } else {
                println!("pentahex-cli v{}", env!("CARGO_PKG_VERSION"));
                println!("phi        = {:.15}", constants.phi());
                println!("ksi        = {:.15}", constants.ksi());
                println!("A          = {:.15}", constants.a());
                println!("R          = {:.15}", constants.r());
                println!("AngleA     = {:.4} deg", constants.angle_a().to_degrees());
                println!("AngleB     = {:.4} deg", constants.angle_b().to_degrees());
                println!("apex       = {:.4} deg", constants.apex_angle().to_degrees());
                println!("dihedral   = {:.4} deg", constants.dihedral().to_degrees());
                println!("inradius   = {:.15}", constants.inradius());
            }
        }
        Commands::Face { json } => {
            let face = Face::build(&constants);
            let report = FaceReport {
                vertices: face.vertices().iter().map(|v| v.position).collect(),
                strip: face.indices().to_vec(),
                triangles: face.triangles().to_vec(),
                area: face.area(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (i, [x, y]) in report.vertices.iter().enumerate() {
                    println!("v{i} = ({x:+.6}, {y:+.6})");
                }
                println!("strip     = {:?}", report.strip);
                println!("triangles = {:?}", report.triangles);
                println!("area      = {:.6}", report.area);
            }
        }
        Commands::Tile {
            rule,
            max_faces,
            json,
            strict,
            dump,
            node,
        } => {
            let face = Face::build(&constants);
            let mut tiling = Tiling::new(&constants, rule);
            let created = tiling
                .grow(max_faces)
                .with_context(|| format!("growing {rule} tiling"))?;
            tracing::info!(rule = %rule, created, total = tiling.len(), "tiling grown");

            let validation = tiling.validate();
            let report = TileReport {
                summary: TilingInspector::summary(&tiling, &face),
                state_hash: format!("{:#018x}", tiling.state_hash()),
                valid: validation.is_ok(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.summary);
                println!("state_hash={} valid={}", report.state_hash, report.valid);
            }

            if let Some(id) = node {
                let info = TilingInspector::inspect_node(&tiling, NodeId(id))
                    .with_context(|| format!("node #{id} not in a {}-face tiling", tiling.len()))?;
                println!("{info}");
            }

            if dump {
                let draw = DrawList::from_tiling(&face, &tiling, 1.0);
                let mut view = RenderView::default();
                view.fit(draw.bounding_radius());
                print!("{}", DebugTextRenderer::new().render(&draw, &view));
            }

            if strict {
                validation.context("tiling links are inconsistent")?;
                if rule == RuleKind::Solid && max_faces >= SOLID_FACES && !tiling.is_closed() {
                    bail!(
                        "solid tiling did not close: {} faces, {} open slots",
                        report.summary.faces,
                        report.summary.open_slots
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_arguments_parse() {
        let cli = Cli::parse_from([
            "pentahex-cli", "tile", "--rule", "planar", "--max-faces", "5", "--strict",
        ]);
        match cli.command {
            Commands::Tile {
                rule,
                max_faces,
                strict,
                json,
                ..
            } => {
                assert_eq!(rule, RuleKind::Planar);
                assert_eq!(max_faces, 5);
                assert!(strict && !json);
            }
            _ => panic!("expected tile"),
        }
    }

    #[test]
    fn unknown_rule_is_rejected() {
        assert!(Cli::try_parse_from(["pentahex-cli", "tile", "--rule", "cube"]).is_err());
    }
}
