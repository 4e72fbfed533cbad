use glam::{DMat4, DVec2, DVec3, DVec4};
use pentahex_geometry::{Constants, Face, VERTEX_COUNT};
use serde::Serialize;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::tiling::TilingError;

/// Number of neighbor slots per face, one per edge.
pub const SLOT_COUNT: usize = 5;

/// A neighbor slot. Slot `i` is the edge from vertex `i` to vertex `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot(u8);

impl Slot {
    pub const ALL: [Slot; SLOT_COUNT] = [Slot(0), Slot(1), Slot(2), Slot(3), Slot(4)];

    /// Validate a raw slot index.
    pub fn new(index: i32) -> Result<Self, TilingError> {
        if (0..SLOT_COUNT as i32).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(TilingError::InvalidSlot(index))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a neighbor is positioned relative to its parent.
///
/// A child's model matrix is `parent.model * slot_transform(slot)`.
pub trait PlacementRule: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Local transform from a parent face to its neighbor in `slot`.
    fn slot_transform(&self, slot: Slot) -> DMat4;

    /// The neighbor's slot that points back at the parent, when links are mutual.
    fn reciprocal(&self, slot: Slot) -> Option<Slot>;
}

/// Flat chain placement: step `2R` up, turn by AngleB, then turn the whole
/// offset by 72° per slot about the face normal.
///
/// Slot 0 is the classic single-neighbor step of the flat layout. The
/// result is an overlapping planar fan that never closes, so links are
/// one-directional.
#[derive(Debug, Clone)]
pub struct PlanarChain {
    transforms: [DMat4; SLOT_COUNT],
}

impl PlanarChain {
    pub fn new(constants: &Constants) -> Self {
        let base = DMat4::from_rotation_z(constants.angle_b())
            * DMat4::from_translation(DVec3::new(0.0, 2.0 * constants.r(), 0.0));
        let transforms = Slot::ALL.map(|slot| {
            DMat4::from_rotation_z(TAU / SLOT_COUNT as f64 * slot.index() as f64) * base
        });
        Self { transforms }
    }
}

impl PlacementRule for PlanarChain {
    fn name(&self) -> &'static str {
        "planar"
    }

    fn slot_transform(&self, slot: Slot) -> DMat4 {
        self.transforms[slot.index()]
    }

    fn reciprocal(&self, _slot: Slot) -> Option<Slot> {
        None
    }
}

/// Edge each slot is glued to on the neighbor.
///
/// Long edges (1, 2) pair with each other around the five-fold apex. The short
/// edges fix the chirality: 0 pairs with itself, 3 with 4.
const GLUE: [u8; SLOT_COUNT] = [0, 2, 1, 4, 3];

/// Edge-to-edge placement folded by the dihedral angle. Growing every slot
/// closes into the 60-face pentagonal hexecontahedron.
#[derive(Debug, Clone)]
pub struct FoldedSolid {
    transforms: [DMat4; SLOT_COUNT],
}

impl FoldedSolid {
    pub fn new(constants: &Constants) -> Self {
        let outline = Face::build(constants).outline().map(|p| p.as_dvec2());
        let frames: [DMat4; SLOT_COUNT] = std::array::from_fn(|i| {
            edge_frame(outline[i], outline[(i + 1) % VERTEX_COUNT])
        });

        // Flip onto the far side of the shared edge, then fold down toward the
        // solid's center.
        let hinge = DMat4::from_rotation_x(constants.dihedral() - PI) * DMat4::from_rotation_z(PI);
        let transforms = std::array::from_fn(|i| {
            frames[i] * hinge * frames[GLUE[i] as usize].inverse()
        });

        tracing::debug!(
            dihedral = constants.dihedral().to_degrees(),
            "folded placement ready"
        );
        Self { transforms }
    }
}

impl PlacementRule for FoldedSolid {
    fn name(&self) -> &'static str {
        "solid"
    }

    fn slot_transform(&self, slot: Slot) -> DMat4 {
        self.transforms[slot.index()]
    }

    fn reciprocal(&self, slot: Slot) -> Option<Slot> {
        Some(Slot(GLUE[slot.index()]))
    }
}

/// Frame on the edge `p -> q`: origin at the incircle tangent point, X along
/// the edge, Z along the face normal, Y pointing out of the face.
fn edge_frame(p: DVec2, q: DVec2) -> DMat4 {
    let x = (q - p).normalize();
    let tangent = p - x * p.dot(x);
    DMat4::from_cols(
        x.extend(0.0).extend(0.0),
        DVec4::new(-x.y, x.x, 0.0, 0.0),
        DVec4::Z,
        DVec4::new(tangent.x, tangent.y, 0.0, 1.0),
    )
}

/// Selectable placement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    Planar,
    #[default]
    Solid,
}

impl RuleKind {
    pub fn build(self, constants: &Constants) -> Box<dyn PlacementRule> {
        match self {
            Self::Planar => Box::new(PlanarChain::new(constants)),
            Self::Solid => Box::new(FoldedSolid::new(constants)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Planar => "planar",
            Self::Solid => "solid",
        }
    }

    /// The other rule.
    pub fn toggled(self) -> Self {
        match self {
            Self::Planar => Self::Solid,
            Self::Solid => Self::Planar,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleKind {
    type Err = TilingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planar" => Ok(Self::Planar),
            "solid" => Ok(Self::Solid),
            _ => Err(TilingError::UnknownRule(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> Constants {
        Constants::compute().unwrap()
    }

    #[test]
    fn slot_bounds() {
        assert_eq!(Slot::new(0).unwrap().index(), 0);
        assert_eq!(Slot::new(4).unwrap().index(), 4);
        assert!(matches!(Slot::new(5), Err(TilingError::InvalidSlot(5))));
        assert!(matches!(Slot::new(-1), Err(TilingError::InvalidSlot(-1))));
    }

    #[test]
    fn planar_slot_zero_is_reference_step() {
        let c = constants();
        let rule = PlanarChain::new(&c);
        let reference = DMat4::from_rotation_z(c.angle_b())
            * DMat4::from_translation(DVec3::new(0.0, 2.0 * c.r(), 0.0));
        assert!(rule.slot_transform(Slot(0)).abs_diff_eq(reference, 1e-12));
    }

    #[test]
    fn planar_slots_are_distinct_turns() {
        let rule = PlanarChain::new(&constants());
        let centers: Vec<DVec3> = Slot::ALL
            .iter()
            .map(|s| rule.slot_transform(*s).w_axis.truncate())
            .collect();
        for i in 0..SLOT_COUNT {
            for j in (i + 1)..SLOT_COUNT {
                assert!(centers[i].distance(centers[j]) > 0.1);
            }
            assert!(centers[i].z.abs() < 1e-12);
        }
    }

    #[test]
    fn glue_table_is_an_involution() {
        for i in 0..SLOT_COUNT {
            assert_eq!(GLUE[GLUE[i] as usize] as usize, i);
        }
    }

    #[test]
    fn folded_transforms_are_mutual_inverses() {
        let rule = FoldedSolid::new(&constants());
        for slot in Slot::ALL {
            let back = rule.reciprocal(slot).unwrap();
            let round_trip = rule.slot_transform(slot) * rule.slot_transform(back);
            assert!(round_trip.abs_diff_eq(DMat4::IDENTITY, 1e-9), "slot {slot}");
        }
    }

    #[test]
    fn folded_transforms_are_rigid() {
        let rule = FoldedSolid::new(&constants());
        for slot in Slot::ALL {
            let m = rule.slot_transform(slot);
            assert!((m.determinant() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn edge_frame_points_outward() {
        // Clockwise outlines run left to right along their top edge.
        let p = DVec2::new(-0.5, 1.0);
        let q = DVec2::new(0.5, 1.0);
        let frame = edge_frame(p, q);
        // Y axis points away from the origin.
        assert!(frame.y_axis.truncate().dot(frame.w_axis.truncate()) > 0.0);
        assert!(frame.w_axis.truncate().abs_diff_eq(DVec3::new(0.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn rule_kind_parsing() {
        assert_eq!("planar".parse::<RuleKind>().unwrap(), RuleKind::Planar);
        assert_eq!("Solid".parse::<RuleKind>().unwrap(), RuleKind::Solid);
        assert!("cube".parse::<RuleKind>().is_err());
        assert_eq!(RuleKind::Planar.toggled(), RuleKind::Solid);
        assert_eq!(RuleKind::default().to_string(), "solid");
    }

    #[test]
    fn built_rules_report_their_names() {
        let c = constants();
        assert_eq!(RuleKind::Planar.build(&c).name(), "planar");
        assert_eq!(RuleKind::Solid.build(&c).name(), "solid");
    }
}
