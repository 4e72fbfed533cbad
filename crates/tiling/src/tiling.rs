use glam::{DMat4, DVec3, Mat4};
use pentahex_geometry::Constants;
use serde::Serialize;

use crate::rule::{PlacementRule, RuleKind, SLOT_COUNT, Slot};

/// Two placements closer than this (per matrix element) are the same face.
const POSE_TOLERANCE: f64 = 1e-4;

/// Errors from placing and linking pentagon nodes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TilingError {
    #[error("neighbor slot must be in [0, 4], not {0}")]
    InvalidSlot(i32),
    #[error("node {0} does not belong to this tiling")]
    UnknownNode(NodeId),
    #[error("slot {slot} of node {node} already links to {existing}, cannot link to {incoming}")]
    InconsistentSlot {
        node: NodeId,
        slot: Slot,
        existing: NodeId,
        incoming: NodeId,
    },
    #[error("slot {slot} of node {node} is empty, expected a link back to {expected}")]
    MissingBackLink {
        node: NodeId,
        slot: Slot,
        expected: NodeId,
    },
    #[error("unknown placement rule `{0}` (expected `planar` or `solid`)")]
    UnknownRule(String),
}

/// Index of a node in its [`Tiling`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One placed pentagon: a model matrix and up to five neighbor links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PentagonNode {
    model: DMat4,
    neighbors: [Option<NodeId>; SLOT_COUNT],
    depth: u32,
    placed_from: Option<(NodeId, Slot)>,
}

impl PentagonNode {
    fn root() -> Self {
        Self {
            model: DMat4::IDENTITY,
            neighbors: [None; SLOT_COUNT],
            depth: 0,
            placed_from: None,
        }
    }

    pub fn model(&self) -> DMat4 {
        self.model
    }

    /// Single-precision model matrix for upload.
    pub fn model_matrix(&self) -> Mat4 {
        self.model.as_mat4()
    }

    pub fn neighbors(&self) -> &[Option<NodeId>; SLOT_COUNT] {
        &self.neighbors
    }

    pub fn neighbor(&self, slot: Slot) -> Option<NodeId> {
        self.neighbors[slot.index()]
    }

    /// Placement steps from the root.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The parent and slot this node was first placed from. `None` for the root.
    pub fn placed_from(&self) -> Option<(NodeId, Slot)> {
        self.placed_from
    }

    /// Face origin (incircle center) in world space.
    pub fn center(&self) -> DVec3 {
        self.model.w_axis.truncate()
    }

    /// Outward face normal in world space.
    pub fn normal(&self) -> DVec3 {
        self.model.z_axis.truncate()
    }

    pub fn open_slots(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_none()).count()
    }
}

/// Arena of pentagon nodes connected through neighbor slots.
///
/// Nodes never own each other; links are `NodeId` indices into the arena.
/// A placement that lands on an existing node's pose reuses that node, so a
/// closed rule grows into a finite mesh instead of stacking duplicates.
#[derive(Debug)]
pub struct Tiling {
    rule: Box<dyn PlacementRule>,
    nodes: Vec<PentagonNode>,
}

impl Tiling {
    /// Create a tiling holding only the root face at the identity placement.
    pub fn new(constants: &Constants, kind: RuleKind) -> Self {
        Self::with_rule(kind.build(constants))
    }

    pub fn with_rule(rule: Box<dyn PlacementRule>) -> Self {
        Self {
            rule,
            nodes: vec![PentagonNode::root()],
        }
    }

    pub fn rule_name(&self) -> &'static str {
        self.rule.name()
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root node is never removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&PentagonNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[PentagonNode] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PentagonNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Drop every node except the root.
    pub fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = PentagonNode::root();
    }

    /// Compute the neighbor of `parent` in `slot` without inserting it.
    pub fn place_neighbor(&self, parent: NodeId, slot: i32) -> Result<PentagonNode, TilingError> {
        let slot = Slot::new(slot)?;
        self.place(parent, slot)
    }

    fn place(&self, parent: NodeId, slot: Slot) -> Result<PentagonNode, TilingError> {
        let parent_node = self.node(parent).ok_or(TilingError::UnknownNode(parent))?;
        let mut neighbors = [None; SLOT_COUNT];
        if let Some(back) = self.rule.reciprocal(slot) {
            neighbors[back.index()] = Some(parent);
        }
        Ok(PentagonNode {
            model: parent_node.model * self.rule.slot_transform(slot),
            neighbors,
            depth: parent_node.depth + 1,
            placed_from: Some((parent, slot)),
        })
    }

    /// Fill `slot` of `parent` and return the neighbor's id.
    ///
    /// An already-filled slot returns its current neighbor. A placement that
    /// matches an existing node's pose links to that node.
    pub fn attach(&mut self, parent: NodeId, slot: i32) -> Result<NodeId, TilingError> {
        let slot = Slot::new(slot)?;
        let candidate = self.place(parent, slot)?;
        self.insert(parent, slot, candidate)
    }

    fn insert(
        &mut self,
        parent: NodeId,
        slot: Slot,
        candidate: PentagonNode,
    ) -> Result<NodeId, TilingError> {
        if let Some(existing) = self.nodes[parent.0].neighbor(slot) {
            return Ok(existing);
        }

        let back = self.rule.reciprocal(slot);
        let child = match self.find_pose(&candidate.model) {
            Some(existing) => {
                if let Some(back) = back {
                    match self.nodes[existing.0].neighbor(back) {
                        Some(other) if other != parent => {
                            return Err(TilingError::InconsistentSlot {
                                node: existing,
                                slot: back,
                                existing: other,
                                incoming: parent,
                            });
                        }
                        _ => self.nodes[existing.0].neighbors[back.index()] = Some(parent),
                    }
                }
                tracing::trace!(%parent, %slot, child = %existing, "linked to existing node");
                existing
            }
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(candidate);
                tracing::trace!(%parent, %slot, child = %id, "placed node");
                id
            }
        };

        self.nodes[parent.0].neighbors[slot.index()] = Some(child);
        Ok(child)
    }

    fn find_pose(&self, model: &DMat4) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.model.abs_diff_eq(*model, POSE_TOLERANCE))
            .map(NodeId)
    }

    /// Breadth-first fill of every open slot.
    ///
    /// Creates at most `max_faces` nodes in total; placements landing on
    /// existing nodes are still linked once the cap is reached. Returns the
    /// number of nodes created.
    pub fn grow(&mut self, max_faces: usize) -> Result<usize, TilingError> {
        let before = self.nodes.len();
        let mut cursor = 0;
        while cursor < self.nodes.len() {
            self.fill_open_slots(NodeId(cursor), max_faces)?;
            cursor += 1;
        }
        let created = self.nodes.len() - before;
        tracing::debug!(rule = self.rule.name(), created, total = self.nodes.len(), "grew tiling");
        Ok(created)
    }

    /// Fill the open slots of the outermost ring only.
    pub fn grow_ring(&mut self, max_faces: usize) -> Result<usize, TilingError> {
        let before = self.nodes.len();
        let outer = self.max_depth();
        let ring: Vec<NodeId> = self
            .iter()
            .filter(|(_, n)| n.depth == outer)
            .map(|(id, _)| id)
            .collect();
        for id in ring {
            self.fill_open_slots(id, max_faces)?;
        }
        Ok(self.nodes.len() - before)
    }

    fn fill_open_slots(&mut self, id: NodeId, max_faces: usize) -> Result<(), TilingError> {
        for slot in Slot::ALL {
            if self.nodes[id.0].neighbor(slot).is_some() {
                continue;
            }
            let candidate = self.place(id, slot)?;
            if self.nodes.len() >= max_faces && self.find_pose(&candidate.model).is_none() {
                continue;
            }
            self.insert(id, slot, candidate)?;
        }
        Ok(())
    }

    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// True when every slot of every node is linked.
    pub fn is_closed(&self) -> bool {
        self.nodes.iter().all(|n| n.open_slots() == 0)
    }

    /// Check that every link of a mutual rule is mirrored by its neighbor.
    pub fn validate(&self) -> Result<(), TilingError> {
        for (id, node) in self.iter() {
            for slot in Slot::ALL {
                let (Some(neighbor), Some(back)) = (node.neighbor(slot), self.rule.reciprocal(slot))
                else {
                    continue;
                };
                let mirrored = self
                    .node(neighbor)
                    .ok_or(TilingError::UnknownNode(neighbor))?
                    .neighbor(back);
                match mirrored {
                    Some(m) if m == id => {}
                    Some(existing) => {
                        return Err(TilingError::InconsistentSlot {
                            node: neighbor,
                            slot: back,
                            existing,
                            incoming: id,
                        });
                    }
                    None => {
                        return Err(TilingError::MissingBackLink {
                            node: neighbor,
                            slot: back,
                            expected: id,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Per-node model matrices in arena order.
    pub fn model_matrices(&self) -> Vec<Mat4> {
        self.nodes.iter().map(PentagonNode::model_matrix).collect()
    }

    /// Mean of the face centers.
    pub fn centroid(&self) -> DVec3 {
        let sum: DVec3 = self.nodes.iter().map(PentagonNode::center).sum();
        sum / self.nodes.len() as f64
    }

    /// Deterministic FNV-1a hash of every placement and link.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for node in &self.nodes {
            for value in node.model.to_cols_array() {
                mix(&value.to_le_bytes());
            }
            for neighbor in node.neighbors {
                let raw = neighbor.map_or(u64::MAX, |n| n.0 as u64);
                mix(&raw.to_le_bytes());
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pentahex_geometry::Face;

    fn tiling(kind: RuleKind) -> Tiling {
        Tiling::new(&Constants::compute().unwrap(), kind)
    }

    /// Translates by `slot` units along X; every neighbor claims slot 0 back.
    #[derive(Debug)]
    struct SlidingRule;

    impl PlacementRule for SlidingRule {
        fn name(&self) -> &'static str {
            "sliding"
        }

        fn slot_transform(&self, slot: Slot) -> DMat4 {
            DMat4::from_translation(DVec3::new(slot.index() as f64, 0.0, 0.0))
        }

        fn reciprocal(&self, _slot: Slot) -> Option<Slot> {
            Some(Slot::ALL[0])
        }
    }

    #[test]
    fn starts_with_root_at_identity() {
        let t = tiling(RuleKind::Solid);
        assert_eq!(t.len(), 1);
        let root = t.node(t.root()).unwrap();
        assert_eq!(root.model(), DMat4::IDENTITY);
        assert_eq!(root.open_slots(), 5);
        assert_eq!(root.placed_from(), None);
    }

    #[test]
    fn place_neighbor_is_deterministic() {
        for kind in [RuleKind::Planar, RuleKind::Solid] {
            let t = tiling(kind);
            let a = t.place_neighbor(t.root(), 0).unwrap();
            let b = t.place_neighbor(t.root(), 0).unwrap();
            assert_eq!(a.model(), b.model());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn place_neighbor_rejects_out_of_range_slots() {
        let t = tiling(RuleKind::Planar);
        assert_eq!(
            t.place_neighbor(t.root(), 5).unwrap_err(),
            TilingError::InvalidSlot(5)
        );
        assert_eq!(
            t.place_neighbor(t.root(), -1).unwrap_err(),
            TilingError::InvalidSlot(-1)
        );
    }

    #[test]
    fn place_neighbor_rejects_unknown_parent() {
        let t = tiling(RuleKind::Solid);
        assert_eq!(
            t.place_neighbor(NodeId(7), 0).unwrap_err(),
            TilingError::UnknownNode(NodeId(7))
        );
    }

    #[test]
    fn place_neighbor_does_not_insert() {
        let t = tiling(RuleKind::Solid);
        t.place_neighbor(t.root(), 2).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn planar_neighbor_matches_reference_chain() {
        let c = Constants::compute().unwrap();
        let mut t = Tiling::new(&c, RuleKind::Planar);
        let id = t.attach(t.root(), 0).unwrap();
        let expected = DMat4::from_rotation_z(c.angle_b())
            * DMat4::from_translation(DVec3::new(0.0, 2.0 * c.r(), 0.0));
        assert!(t.node(id).unwrap().model().abs_diff_eq(expected, 1e-12));
        assert!((t.node(id).unwrap().center().length() - 2.0 * c.r()).abs() < 1e-12);
    }

    #[test]
    fn planar_links_are_one_way() {
        let mut t = tiling(RuleKind::Planar);
        let id = t.attach(t.root(), 1).unwrap();
        assert_eq!(t.node(t.root()).unwrap().neighbor(Slot::ALL[1]), Some(id));
        assert_eq!(t.node(id).unwrap().open_slots(), 5);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn attach_is_idempotent() {
        let mut t = tiling(RuleKind::Planar);
        let a = t.attach(t.root(), 3).unwrap();
        let b = t.attach(t.root(), 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn solid_links_are_mutual() {
        let mut t = tiling(RuleKind::Solid);
        let root = t.root();
        for (slot, back) in [(0, 0), (1, 2), (2, 1), (3, 4), (4, 3)] {
            let child = t.attach(root, slot).unwrap();
            let child_node = t.node(child).unwrap();
            assert_eq!(child_node.neighbor(Slot::ALL[back]), Some(root));
        }
        t.validate().unwrap();
    }

    #[test]
    fn solid_neighbors_share_the_edge() {
        let c = Constants::compute().unwrap();
        let outline = Face::build(&c).outline().map(|p| p.as_dvec2().extend(0.0));
        let mut t = Tiling::new(&c, RuleKind::Solid);
        let root = t.root();
        for (slot, back) in [(0usize, 0usize), (1, 2), (2, 1), (3, 4), (4, 3)] {
            let child = t.attach(root, slot as i32).unwrap();
            let model = t.node(child).unwrap().model();
            let p = outline[slot];
            let q = outline[(slot + 1) % 5];
            let cp = model.transform_point3(outline[(back + 1) % 5]);
            let cq = model.transform_point3(outline[back]);
            assert!(p.abs_diff_eq(cp, 1e-6), "slot {slot}: {p} vs {cp}");
            assert!(q.abs_diff_eq(cq, 1e-6), "slot {slot}: {q} vs {cq}");
        }
    }

    #[test]
    fn solid_neighbors_fold_by_dihedral() {
        let c = Constants::compute().unwrap();
        let mut t = Tiling::new(&c, RuleKind::Solid);
        for slot in 0..5 {
            let child = t.attach(t.root(), slot).unwrap();
            let normal = t.node(child).unwrap().normal();
            let between = normal.angle_between(DVec3::Z);
            assert!((between - (std::f64::consts::PI - c.dihedral())).abs() < 1e-9);
            // Folded toward the solid's center, which lies below the root.
            assert!(t.node(child).unwrap().center().z < 0.0);
        }
    }

    #[test]
    fn solid_grows_into_sixty_faces() {
        let mut t = tiling(RuleKind::Solid);
        let created = t.grow(60).unwrap();
        assert_eq!(created, 59);
        assert_eq!(t.len(), 60);
        assert!(t.is_closed());
        t.validate().unwrap();
    }

    #[test]
    fn solid_closes_even_with_a_loose_cap() {
        let mut t = tiling(RuleKind::Solid);
        t.grow(10_000).unwrap();
        assert_eq!(t.len(), 60);
        assert!(t.is_closed());
    }

    #[test]
    fn solid_faces_are_equidistant_from_center() {
        let c = Constants::compute().unwrap();
        let mut t = Tiling::new(&c, RuleKind::Solid);
        t.grow(60).unwrap();
        let center = DVec3::new(0.0, 0.0, -c.inradius());
        assert!(t.centroid().abs_diff_eq(center, 1e-6));
        for node in t.nodes() {
            assert!((node.center().distance(center) - c.inradius()).abs() < 1e-6);
            // Outward normals point away from the center.
            assert!(node.normal().dot(node.center() - center) > 0.0);
        }
    }

    #[test]
    fn capped_growth_stops_creating() {
        let mut t = tiling(RuleKind::Solid);
        t.grow(6).unwrap();
        assert_eq!(t.len(), 6);
        assert!(!t.is_closed());
        t.validate().unwrap();
    }

    #[test]
    fn grow_ring_adds_one_layer() {
        let mut t = tiling(RuleKind::Solid);
        let first = t.grow_ring(60).unwrap();
        assert_eq!(first, 5);
        assert_eq!(t.max_depth(), 1);
        t.grow_ring(60).unwrap();
        assert_eq!(t.max_depth(), 2);
        t.validate().unwrap();
    }

    #[test]
    fn planar_growth_respects_cap() {
        let mut t = tiling(RuleKind::Planar);
        t.grow(25).unwrap();
        assert_eq!(t.len(), 25);
        for node in t.nodes() {
            assert!(node.center().z.abs() < 1e-9);
        }
    }

    #[test]
    fn reset_keeps_only_root() {
        let mut t = tiling(RuleKind::Solid);
        t.grow(60).unwrap();
        t.reset();
        assert_eq!(t.len(), 1);
        assert_eq!(t.node(t.root()).unwrap().open_slots(), 5);
    }

    #[test]
    fn conflicting_back_link_is_rejected() {
        let mut t = Tiling::with_rule(Box::new(SlidingRule));
        let root = t.root();
        let a = t.attach(root, 1).unwrap();
        let b = t.attach(root, 2).unwrap();
        // a + 1 lands on b, whose slot 0 already points at the root.
        let err = t.attach(a, 1).unwrap_err();
        assert_eq!(
            err,
            TilingError::InconsistentSlot {
                node: b,
                slot: Slot::ALL[0],
                existing: root,
                incoming: a,
            }
        );
        // The failed call left no half-made link behind.
        assert_eq!(t.node(a).unwrap().neighbor(Slot::ALL[1]), None);
    }

    #[test]
    fn validate_reports_missing_back_link() {
        let mut t = tiling(RuleKind::Solid);
        let root = t.root();
        let child = t.attach(root, 0).unwrap();
        t.nodes[child.0].neighbors[0] = None;
        let err = t.validate().unwrap_err();
        assert_eq!(
            err,
            TilingError::MissingBackLink {
                node: child,
                slot: Slot::ALL[0],
                expected: root,
            }
        );
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn validate_reports_foreign_back_link() {
        let mut t = tiling(RuleKind::Solid);
        let root = t.root();
        let a = t.attach(root, 0).unwrap();
        let b = t.attach(root, 1).unwrap();
        t.nodes[a.0].neighbors[0] = Some(b);
        assert_eq!(
            t.validate().unwrap_err(),
            TilingError::InconsistentSlot {
                node: a,
                slot: Slot::ALL[0],
                existing: b,
                incoming: root,
            }
        );
    }

    #[test]
    fn state_hash_is_deterministic() {
        let mut t1 = tiling(RuleKind::Solid);
        let mut t2 = tiling(RuleKind::Solid);
        t1.grow(60).unwrap();
        t2.grow(60).unwrap();
        assert_eq!(t1.state_hash(), t2.state_hash());

        let mut t3 = tiling(RuleKind::Solid);
        t3.grow(30).unwrap();
        assert_ne!(t1.state_hash(), t3.state_hash());
    }

    #[test]
    fn model_matrices_follow_arena_order() {
        let mut t = tiling(RuleKind::Solid);
        t.grow(12).unwrap();
        let matrices = t.model_matrices();
        assert_eq!(matrices.len(), 12);
        assert_eq!(matrices[0], Mat4::IDENTITY);
    }
}
