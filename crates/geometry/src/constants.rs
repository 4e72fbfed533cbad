use serde::Serialize;
use std::f64::consts::PI;

/// Errors from deriving the face constants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{quantity} is outside its valid domain (value {value})")]
    Domain { quantity: &'static str, value: f64 },
}

/// Polynomial fed to the arccos that yields [`Constants::angle_a`].
///
/// Two revisions of the construction disagree on this term. The squared form
/// is the default; the linear form evaluates to about 2.72 for the golden
/// ratio, which is outside arccos's domain, so deriving with it always fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceAngleFormula {
    /// `8ξ² − ξ⁴ − 1`
    #[default]
    Squared,
    /// `8ξ − ξ⁴ − 1`
    Linear,
}

impl FaceAngleFormula {
    fn cosine(self, ksi: f64) -> f64 {
        let ksi4 = ksi * ksi * ksi * ksi;
        match self {
            Self::Squared => 8.0 * ksi * ksi - ksi4 - 1.0,
            Self::Linear => 8.0 * ksi - ksi4 - 1.0,
        }
    }
}

/// The golden ratio, `(1 + √5) / 2`.
pub fn golden_ratio() -> f64 {
    (1.0 + 5.0_f64.sqrt()) / 2.0
}

/// Immutable constant set shared by every face and every placement.
///
/// Lengths are expressed in units of the face's short edge. Angles are in
/// radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Constants {
    phi: f64,
    ksi: f64,
    a: f64,
    r: f64,
    angle_a: f64,
    angle_b: f64,
    apex_angle: f64,
    dihedral: f64,
    inradius: f64,
}

impl Constants {
    /// Derive the constants for the golden ratio.
    pub fn compute() -> Result<Self, GeometryError> {
        Self::derive(golden_ratio())
    }

    /// Derive the constants for an arbitrary `phi`.
    ///
    /// Only the golden ratio produces the hexecontahedron; other values are
    /// accepted as long as every intermediate stays inside its domain.
    pub fn derive(phi: f64) -> Result<Self, GeometryError> {
        Self::derive_with(phi, FaceAngleFormula::default())
    }

    /// Derive the constants, choosing the [`FaceAngleFormula`] for `angle_a`.
    pub fn derive_with(phi: f64, formula: FaceAngleFormula) -> Result<Self, GeometryError> {
        let k = checked_sqrt("81φ − 15", 81.0 * phi - 15.0)?;
        let upper = checked_cbrt("44 + 12φ(9 + k)", 44.0 + 12.0 * phi * (9.0 + k))?;
        let lower = checked_cbrt("44 + 12φ(9 − k)", 44.0 + 12.0 * phi * (9.0 - k))?;

        // Real root of 8ξ³ + 8ξ² − φ² = 0.
        let ksi = (upper + lower - 4.0) / 12.0;
        if !(ksi > -1.0 && ksi < 1.0) {
            return Err(GeometryError::Domain {
                quantity: "ξ",
                value: ksi,
            });
        }

        let a = (1.0 + 2.0 * ksi) / (2.0 * (1.0 - 2.0 * ksi * ksi));
        if !(a.is_finite() && a > 0.0) {
            return Err(GeometryError::Domain {
                quantity: "edge ratio A",
                value: a,
            });
        }
        let r = checked_sqrt("(1 + ξ) / (1 − ξ)", (1.0 + ksi) / (1.0 - ksi))? / 2.0;

        let angle_a = checked_acos("AngleA cosine", formula.cosine(ksi))?;
        let angle_b = checked_acos("−ξ", -ksi)?;

        // Interior angles sum to 3π and the four non-apex angles all equal AngleB.
        let apex_angle = 3.0 * PI - 4.0 * angle_b;
        // Five apex angles meet symmetrically at a five-fold vertex.
        let dihedral =
            2.0 * checked_asin("dihedral half-angle sine", (PI / 5.0).cos() / (apex_angle / 2.0).cos())?;
        // The face origin is the incircle center, R away from every edge.
        let inradius = r * (dihedral / 2.0).tan();

        tracing::debug!(
            phi,
            ksi,
            a,
            r,
            angle_a = angle_a.to_degrees(),
            angle_b = angle_b.to_degrees(),
            dihedral = dihedral.to_degrees(),
            "derived face constants"
        );

        Ok(Self {
            phi,
            ksi,
            a,
            r,
            angle_a,
            angle_b,
            apex_angle,
            dihedral,
            inradius,
        })
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// ξ, the real root of the derived cubic.
    pub fn ksi(&self) -> f64 {
        self.ksi
    }

    /// Long edge length relative to the short edge.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Distance from the face origin to each edge (the face's inradius).
    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn angle_a(&self) -> f64 {
        self.angle_a
    }

    /// Obtuse interior angle, shared by four of the five corners.
    pub fn angle_b(&self) -> f64 {
        self.angle_b
    }

    /// Acute interior angle at the five-fold vertex.
    pub fn apex_angle(&self) -> f64 {
        self.apex_angle
    }

    /// Angle between two adjacent faces of the assembled solid.
    pub fn dihedral(&self) -> f64 {
        self.dihedral
    }

    /// Distance from the solid's center to every face plane.
    pub fn inradius(&self) -> f64 {
        self.inradius
    }
}

fn checked_sqrt(quantity: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value >= 0.0 {
        Ok(value.sqrt())
    } else {
        Err(GeometryError::Domain { quantity, value })
    }
}

fn checked_cbrt(quantity: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value >= 0.0 {
        Ok(value.powf(1.0 / 3.0))
    } else {
        Err(GeometryError::Domain { quantity, value })
    }
}

fn checked_acos(quantity: &'static str, value: f64) -> Result<f64, GeometryError> {
    if (-1.0..=1.0).contains(&value) {
        Ok(value.acos())
    } else {
        Err(GeometryError::Domain { quantity, value })
    }
}

fn checked_asin(quantity: &'static str, value: f64) -> Result<f64, GeometryError> {
    if (-1.0..=1.0).contains(&value) {
        Ok(value.asin())
    } else {
        Err(GeometryError::Domain { quantity, value })
    }
}
