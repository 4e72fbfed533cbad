use glam::DVec3;
use pentahex_geometry::{Face, VERTEX_COUNT};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::tiling::{NodeId, Tiling};

/// World-space vertices closer than this are welded together.
const WELD_TOLERANCE: f64 = 1e-4;

/// Read-only queries over a tiling for the CLI and the desktop panel.
pub struct TilingInspector;

impl TilingInspector {
    /// Weld the faces' world-space corners and count the resulting mesh.
    pub fn summary(tiling: &Tiling, face: &Face) -> TilingSummary {
        let outline = face.outline().map(|p| p.as_dvec2().extend(0.0));
        let mut welded: Vec<DVec3> = Vec::new();
        let mut degree: Vec<usize> = Vec::new();
        let mut edges = BTreeSet::new();

        for node in tiling.nodes() {
            let ids: [usize; VERTEX_COUNT] = outline.map(|p| {
                let world = node.model().transform_point3(p);
                match welded.iter().position(|w| w.distance(world) < WELD_TOLERANCE) {
                    Some(i) => i,
                    None => {
                        welded.push(world);
                        degree.push(0);
                        welded.len() - 1
                    }
                }
            });
            for k in 0..VERTEX_COUNT {
                degree[ids[k]] += 1;
                let (a, b) = (ids[k], ids[(k + 1) % VERTEX_COUNT]);
                edges.insert((a.min(b), a.max(b)));
            }
        }

        let faces = tiling.len();
        let vertices = welded.len();
        TilingSummary {
            rule: tiling.rule_name(),
            faces,
            edges: edges.len(),
            vertices,
            five_fold: degree.iter().filter(|d| **d == 5).count(),
            three_fold: degree.iter().filter(|d| **d == 3).count(),
            open_slots: tiling.nodes().iter().map(|n| n.open_slots()).sum(),
            max_depth: tiling.max_depth(),
            euler_characteristic: vertices as i64 - edges.len() as i64 + faces as i64,
            closed: tiling.is_closed(),
        }
    }

    /// Placement and links of a single node.
    pub fn inspect_node(tiling: &Tiling, id: NodeId) -> Option<NodeInfo> {
        tiling.node(id).map(|node| {
            let c = node.center();
            let n = node.normal();
            NodeInfo {
                id,
                depth: node.depth(),
                center: [c.x, c.y, c.z],
                normal: [n.x, n.y, n.z],
                neighbors: *node.neighbors(),
            }
        })
    }
}

/// Mesh counts for a tiling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TilingSummary {
    pub rule: &'static str,
    pub faces: usize,
    pub edges: usize,
    pub vertices: usize,
    pub five_fold: usize,
    pub three_fold: usize,
    pub open_slots: usize,
    pub max_depth: u32,
    pub euler_characteristic: i64,
    pub closed: bool,
}

impl std::fmt::Display for TilingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tiling ({}): F={} E={} V={} five-fold={} three-fold={} chi={} open_slots={} depth={} closed={}",
            self.rule,
            self.faces,
            self.edges,
            self.vertices,
            self.five_fold,
            self.three_fold,
            self.euler_characteristic,
            self.open_slots,
            self.max_depth,
            self.closed
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub depth: u32,
    pub center: [f64; 3],
    pub normal: [f64; 3],
    pub neighbors: [Option<NodeId>; 5],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let links: Vec<String> = self
            .neighbors
            .iter()
            .map(|n| n.map_or_else(|| "-".to_string(), |id| id.to_string()))
            .collect();
        write!(
            f,
            "Node {} depth={} center=({:.3}, {:.3}, {:.3}) normal=({:.3}, {:.3}, {:.3}) links=[{}]",
            self.id,
            self.depth,
            self.center[0],
            self.center[1],
            self.center[2],
            self.normal[0],
            self.normal[1],
            self.normal[2],
            links.join(" ")
        )
    }
}
