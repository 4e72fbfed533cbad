use egui::Context as EguiContext;
use pentahex_geometry::{Constants, Face};
use pentahex_input::{Action, InputState};
use pentahex_render::{DrawList, RenderView};
use pentahex_tiling::{RuleKind, Tiling, TilingInspector, TilingSummary};

/// Everything the viewer shows, independent of the GPU.
pub struct AppState {
    constants: Constants,
    face: Face,
    rule: RuleKind,
    max_faces: usize,
    tiling: Tiling,
    pub draw: DrawList,
    summary: TilingSummary,
    face_scale: f32,
    pub view: RenderView,
    pub input: InputState,
    pub show_inspector: bool,
    /// Set when `draw` changed and the GPU instance buffers are stale.
    pub dirty: bool,
}

impl AppState {
    pub fn new(constants: Constants, rule: RuleKind, max_faces: usize) -> Self {
        let face = Face::build(&constants);
        let tiling = Tiling::new(&constants, rule);
        let draw = DrawList::from_tiling(&face, &tiling, 1.0);
        let summary = TilingInspector::summary(&tiling, &face);
        let mut state = Self {
            constants,
            face,
            rule,
            max_faces,
            tiling,
            draw,
            summary,
            face_scale: 1.0,
            view: RenderView::default(),
            input: InputState::new(),
            show_inspector: true,
            dirty: true,
        };
        state.rebuild();
        state
    }

    pub fn tiling(&self) -> &Tiling {
        &self.tiling
    }

    pub fn rule(&self) -> RuleKind {
        self.rule
    }

    /// Apply one action. Returns `true` when the app should quit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Rotate(delta) => self.view.rotate(delta),
            Action::Tilt(delta) => self.view.tilt_by(delta),
            Action::Zoom(factor) => self.view.zoom(factor),
            Action::GrowRing => match self.tiling.grow_ring(self.max_faces) {
                Ok(created) => tracing::info!(created, total = self.tiling.len(), "grew ring"),
                Err(e) => tracing::error!("failed to grow ring: {e}"),
            },
            Action::Reset => {
                self.tiling.reset();
                tracing::info!("tiling reset");
            }
            Action::ToggleRule => {
                self.rule = self.rule.toggled();
                self.tiling = Tiling::new(&self.constants, self.rule);
                tracing::info!(rule = %self.rule, "switched placement rule");
            }
            Action::ToggleInspector => self.show_inspector = !self.show_inspector,
            Action::Quit => return true,
        }
        if action.rebuilds_tiling() {
            self.rebuild();
        }
        false
    }

    /// Apply every action queued for this frame.
    pub fn update(&mut self) -> bool {
        let actions = self.input.frame_actions();
        actions.into_iter().any(|action| self.apply(action))
    }

    fn grow_all(&mut self) {
        match self.tiling.grow(self.max_faces) {
            Ok(created) => tracing::info!(created, total = self.tiling.len(), "grew tiling"),
            Err(e) => tracing::error!("failed to grow tiling: {e}"),
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.draw = DrawList::from_tiling(&self.face, &self.tiling, self.face_scale);
        self.summary = TilingInspector::summary(&self.tiling, &self.face);
        self.view.fit(self.draw.bounding_radius());
        self.dirty = true;
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let mut pending = Vec::new();
        let mut grow_all = false;

        egui::SidePanel::left("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Pentagonal Hexecontahedron");
                ui.separator();

                let c = &self.constants;
                ui.label(format!("phi: {:.6}  ksi: {:.6}", c.phi(), c.ksi()));
                ui.label(format!("A: {:.6}  R: {:.6}", c.a(), c.r()));
                ui.label(format!(
                    "AngleA: {:.3}°  AngleB: {:.3}°",
                    c.angle_a().to_degrees(),
                    c.angle_b().to_degrees()
                ));
                ui.label(format!(
                    "Dihedral: {:.3}°  Inradius: {:.4}",
                    c.dihedral().to_degrees(),
                    c.inradius()
                ));
                ui.separator();

                ui.heading("Tiling");
                let s = &self.summary;
                ui.label(format!("Rule: {}  Faces: {}/{}", s.rule, s.faces, self.max_faces));
                ui.label(format!("V: {}  E: {}  chi: {}", s.vertices, s.edges, s.euler_characteristic));
                ui.label(format!("Five-fold: {}  Three-fold: {}", s.five_fold, s.three_fold));
                ui.label(format!(
                    "Open slots: {}  Depth: {}  Closed: {}",
                    s.open_slots, s.max_depth, s.closed
                ));
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Grow Ring (G)").clicked() {
                        pending.push(Action::GrowRing);
                    }
                    if ui.button("Grow All").clicked() {
                        grow_all = true;
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Reset (R)").clicked() {
                        pending.push(Action::Reset);
                    }
                    if ui.button("Switch Rule (Tab)").clicked() {
                        pending.push(Action::ToggleRule);
                    }
                });

                let mut scale = self.face_scale;
                ui.add(egui::Slider::new(&mut scale, 0.5..=1.0).text("Face scale"));
                if scale != self.face_scale {
                    self.face_scale = scale;
                    self.draw = DrawList::from_tiling(&self.face, &self.tiling, scale);
                    self.dirty = true;
                }

                ui.separator();
                ui.label(format!(
                    "View: rot {:.2}  tilt {:.2}  extent {:.2}",
                    self.view.rotation, self.view.tilt, self.view.half_extent
                ));
                ui.small("F1: Inspector | LMB: Rotate | Arrows: Tilt/Rotate | +/-: Zoom");
            });

        for action in pending {
            self.apply(action);
        }
        if grow_all {
            self.grow_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pentahex_input::Key;

    fn state(rule: RuleKind) -> AppState {
        AppState::new(Constants::compute().unwrap(), rule, 60)
    }

    #[test]
    fn starts_with_root_face() {
        let s = state(RuleKind::Solid);
        assert_eq!(s.tiling().len(), 1);
        assert_eq!(s.draw.instance_count(), 1);
        assert!(s.dirty);
    }

    #[test]
    fn grow_ring_rebuilds_draw_list() {
        let mut s = state(RuleKind::Solid);
        s.dirty = false;
        assert!(!s.apply(Action::GrowRing));
        assert_eq!(s.tiling().len(), 6);
        assert_eq!(s.draw.instance_count(), 6);
        assert!(s.dirty);

        // A second ring extends the outermost layer without closing the solid.
        s.apply(Action::GrowRing);
        assert_eq!(s.tiling().max_depth(), 2);
        assert!(s.tiling().len() < 60);
        assert!(!s.tiling().is_closed());
    }

    #[test]
    fn rings_close_the_solid() {
        let mut s = state(RuleKind::Solid);
        for _ in 0..10 {
            s.apply(Action::GrowRing);
        }
        assert_eq!(s.tiling().len(), 60);
        assert!(s.tiling().is_closed());
    }

    #[test]
    fn reset_and_toggle() {
        let mut s = state(RuleKind::Solid);
        s.apply(Action::GrowRing);
        s.apply(Action::Reset);
        assert_eq!(s.tiling().len(), 1);
        s.apply(Action::ToggleRule);
        assert_eq!(s.rule(), RuleKind::Planar);
        assert_eq!(s.tiling().rule_name(), "planar");
    }

    #[test]
    fn view_actions_keep_buffers_clean() {
        let mut s = state(RuleKind::Planar);
        s.dirty = false;
        s.apply(Action::Rotate(0.5));
        s.apply(Action::Zoom(0.5));
        assert!(!s.dirty);
        assert!((s.view.rotation - 0.5).abs() < 1e-6);
    }

    #[test]
    fn held_mouse_and_escape() {
        let mut s = state(RuleKind::Solid);
        s.input.set_rotating(true);
        assert!(!s.update());
        assert!((s.view.rotation - 0.01).abs() < 1e-6);
        s.input.press(Key::Escape);
        assert!(s.update());
    }
}
