use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use pentahex_geometry::{Face, FaceVertex, INDEX_COUNT, VERTEX_COUNT};
use pentahex_tiling::Tiling;

/// Stride of one [`InstanceInfo`] record in the instance buffer.
pub const INSTANCE_INFO_SIZE: usize = 20;

const _: () = assert!(std::mem::size_of::<InstanceInfo>() == INSTANCE_INFO_SIZE);

/// Per-instance attributes, independent of the node's model matrix.
///
/// `spherical_coordinates` is `(radius, inclination from +Y, azimuth about +Y)`
/// and offsets the instance after its model transform. `rotation` spins the
/// face about its own normal and `scale` shrinks it about its incircle center.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceInfo {
    pub spherical_coordinates: [f32; 3],
    pub rotation: f32,
    pub scale: f32,
}

impl Default for InstanceInfo {
    fn default() -> Self {
        Self {
            spherical_coordinates: [0.0; 3],
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl InstanceInfo {
    pub fn new(spherical_coordinates: Vec3, rotation: f32, scale: f32) -> Self {
        Self {
            spherical_coordinates: spherical_coordinates.to_array(),
            rotation,
            scale,
        }
    }

    /// Cartesian offset encoded by the spherical coordinates.
    pub fn offset(&self) -> Vec3 {
        let [radius, inclination, azimuth] = self.spherical_coordinates;
        radius
            * Vec3::new(
                inclination.sin() * azimuth.cos(),
                inclination.cos(),
                inclination.sin() * azimuth.sin(),
            )
    }
}

/// Everything the rasterizer needs for one frame: the shared face mesh, one
/// model matrix and one [`InstanceInfo`] per node, and a whole-tiling model
/// transform.
#[derive(Debug, Clone)]
pub struct DrawList {
    pub vertices: [FaceVertex; VERTEX_COUNT],
    pub indices: [u16; INDEX_COUNT],
    pub node_models: Vec<[[f32; 4]; 4]>,
    pub instances: Vec<InstanceInfo>,
    pub model: Mat4,
}

impl DrawList {
    /// A draw list holding a single face at the origin.
    pub fn single(face: &Face) -> Self {
        Self {
            vertices: *face.vertices(),
            indices: *face.indices(),
            node_models: vec![Mat4::IDENTITY.to_cols_array_2d()],
            instances: vec![InstanceInfo::default()],
            model: Mat4::IDENTITY,
        }
    }

    /// One instance per tiling node, recentred on the tiling's centroid.
    pub fn from_tiling(face: &Face, tiling: &Tiling, face_scale: f32) -> Self {
        let node_models: Vec<[[f32; 4]; 4]> = tiling
            .model_matrices()
            .iter()
            .map(Mat4::to_cols_array_2d)
            .collect();
        let instances = vec![InstanceInfo::new(Vec3::ZERO, 0.0, face_scale); node_models.len()];
        let model = Mat4::from_translation(-tiling.centroid().as_vec3());

        tracing::debug!(instances = instances.len(), rule = tiling.rule_name(), "built draw list");

        Self {
            vertices: *face.vertices(),
            indices: *face.indices(),
            node_models,
            instances,
            model,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// World-space corner of vertex `vertex` on instance `instance`, matching
    /// the vertex shader's transform chain.
    pub fn world_vertex(&self, instance: usize, vertex: usize) -> Vec3 {
        let info = &self.instances[instance];
        let local = Mat4::from_rotation_z(info.rotation)
            * Mat4::from_scale(Vec3::splat(info.scale))
            * Vec2::from_array(self.vertices[vertex].position)
                .extend(0.0)
                .extend(1.0);
        let node = Mat4::from_cols_array_2d(&self.node_models[instance]);
        (self.model * node * local).truncate() + info.offset()
    }

    /// Largest distance of any drawn corner from the origin.
    pub fn bounding_radius(&self) -> f32 {
        (0..self.instances.len())
            .flat_map(|i| (0..VERTEX_COUNT).map(move |v| (i, v)))
            .map(|(i, v)| self.world_vertex(i, v).length())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pentahex_geometry::Constants;
    use pentahex_tiling::RuleKind;

    fn face() -> Face {
        Face::build(&Constants::compute().unwrap())
    }

    #[test]
    fn instance_record_is_twenty_bytes() {
        assert_eq!(std::mem::size_of::<InstanceInfo>(), 20);
        let records = [InstanceInfo::default(); 3];
        assert_eq!(bytemuck::cast_slice::<_, u8>(&records).len(), 60);
    }

    #[test]
    fn default_instance_is_neutral() {
        let info = InstanceInfo::default();
        assert_eq!(info.offset(), Vec3::ZERO);
        assert_eq!(info.scale, 1.0);
    }

    #[test]
    fn spherical_offset() {
        let info = InstanceInfo::new(
            Vec3::new(2.0, std::f32::consts::FRAC_PI_2, 0.0),
            0.0,
            1.0,
        );
        assert!(info.offset().abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
        let up = InstanceInfo::new(Vec3::new(3.0, 0.0, 1.0), 0.0, 1.0);
        assert!(up.offset().abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-6));
    }

    #[test]
    fn single_face_draw_list() {
        let f = face();
        let draw = DrawList::single(&f);
        assert_eq!(draw.instance_count(), 1);
        assert_eq!(draw.indices, [2, 3, 1, 4, 0]);
        let corner = draw.world_vertex(0, 0);
        assert!(corner.abs_diff_eq(Vec3::new(0.5, f.outline()[0].y, 0.0), 1e-6));
    }

    #[test]
    fn tiling_draw_list_is_centred() {
        let c = Constants::compute().unwrap();
        let f = Face::build(&c);
        let mut tiling = Tiling::new(&c, RuleKind::Solid);
        tiling.grow(60).unwrap();
        let draw = DrawList::from_tiling(&f, &tiling, 1.0);
        assert_eq!(draw.instance_count(), 60);
        assert_eq!(draw.node_models.len(), 60);

        // Face centers sit on the insphere once recentred.
        for i in 0..60 {
            let node = Mat4::from_cols_array_2d(&draw.node_models[i]);
            let center = (draw.model * node).w_axis.truncate();
            assert!((center.length() - c.inradius() as f32).abs() < 1e-3);
        }
        let radius = draw.bounding_radius();
        assert!(radius > c.inradius() as f32 && radius < 4.0, "{radius}");
    }

    #[test]
    fn face_scale_shrinks_corners() {
        let c = Constants::compute().unwrap();
        let f = Face::build(&c);
        let tiling = Tiling::new(&c, RuleKind::Planar);
        let full = DrawList::from_tiling(&f, &tiling, 1.0);
        let shrunk = DrawList::from_tiling(&f, &tiling, 0.5);
        let a = full.world_vertex(0, 2).length();
        let b = shrunk.world_vertex(0, 2).length();
        assert!((b - a * 0.5).abs() < 1e-5);
    }
}
