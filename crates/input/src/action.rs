/// A high-level action produced by desktop input.
///
/// The application consumes actions, never raw window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Turn the view about its vertical axis, in radians.
    Rotate(f32),
    /// Tilt the view about its horizontal axis, in radians.
    Tilt(f32),
    /// Scale the visible extent; below 1 zooms in.
    Zoom(f32),
    /// Fill the open slots of the outermost ring only.
    GrowRing,
    /// Drop back to the single root face.
    Reset,
    /// Switch between the planar and folded placement rules.
    ToggleRule,
    /// Show or hide the inspector panel.
    ToggleInspector,
    Quit,
}

impl Action {
    /// Whether the action changes the tiling rather than the view.
    pub fn rebuilds_tiling(self) -> bool {
        matches!(self, Action::GrowRing | Action::Reset | Action::ToggleRule)
    }
}
