use glam::Mat4;

use crate::draw::DrawList;

/// Orthographic turntable view of the tiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Rotation about the vertical axis, in radians.
    pub rotation: f32,
    /// Rotation about the horizontal axis, in radians.
    pub tilt: f32,
    /// Half of the visible extent along the viewport's shorter side.
    pub half_extent: f32,
    /// Viewport width over height.
    pub aspect: f32,
    /// Near and far planes sit at this distance from the origin.
    pub depth_radius: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            tilt: 0.35,
            half_extent: 2.0,
            aspect: 800.0 / 600.0,
            depth_radius: 4.0,
        }
    }
}

impl RenderView {
    const MAX_TILT: f32 = 89.0_f32.to_radians();
    const MIN_EXTENT: f32 = 0.25;
    const MAX_EXTENT: f32 = 100.0;

    /// Orthographic projection widened (landscape) or heightened (portrait) to
    /// keep the shorter side at `half_extent`. Depth spans `depth_radius`
    /// independently of zoom.
    pub fn projection(&self) -> Mat4 {
        let e = self.half_extent;
        let depth = self.depth_radius;
        if self.aspect > 1.0 {
            Mat4::orthographic_rh(-e * self.aspect, e * self.aspect, -e, e, -depth, depth)
        } else {
            Mat4::orthographic_rh(-e, e, -e / self.aspect, e / self.aspect, -depth, depth)
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_x(self.tilt) * Mat4::from_rotation_y(self.rotation)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn rotate(&mut self, delta: f32) {
        self.rotation = (self.rotation + delta).rem_euclid(std::f32::consts::TAU);
    }

    pub fn tilt_by(&mut self, delta: f32) {
        self.tilt = (self.tilt + delta).clamp(-Self::MAX_TILT, Self::MAX_TILT);
    }

    /// Multiply the visible extent; factors below 1 zoom in.
    pub fn zoom(&mut self, factor: f32) {
        self.half_extent = (self.half_extent * factor).clamp(Self::MIN_EXTENT, Self::MAX_EXTENT);
    }

    /// Frame a sphere of `radius` around the origin with a small margin.
    ///
    /// Also sizes the depth range to the sphere, so later zooming never clips it.
    pub fn fit(&mut self, radius: f32) {
        let framed = (radius * 1.15).clamp(Self::MIN_EXTENT, Self::MAX_EXTENT);
        self.half_extent = framed;
        self.depth_radius = framed.max(radius + Self::MIN_EXTENT);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a prepared [`DrawList`] and a view; it never touches
/// the tiling itself.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, draw: &DrawList, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, draw: &DrawList, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Pentagon draw list (instances={}) ===\n",
            draw.instance_count()
        ));
        out.push_str(&format!(
            "Mesh: {} vertices, strip {:?}\n",
            draw.vertices.len(),
            draw.indices
        ));
        out.push_str(&format!(
            "View: rotation={:.2} tilt={:.2} half_extent={:.2} aspect={:.2}\n",
            view.rotation, view.tilt, view.half_extent, view.aspect
        ));

        for (i, node) in draw.node_models.iter().enumerate() {
            let world = draw.model * Mat4::from_cols_array_2d(node);
            let c = world.w_axis;
            let n = world.z_axis;
            out.push_str(&format!(
                "  [{i:>3}] center=({:.3}, {:.3}, {:.3}) normal=({:.3}, {:.3}, {:.3}) scale={:.2}\n",
                c.x, c.y, c.z, n.x, n.y, n.z, draw.instances[i].scale
            ));
        }

        out
    }
}
