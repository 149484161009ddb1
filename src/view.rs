use ggez::glam::Vec2;

use crate::graph::GraphModel;

/// Pan and zoom applied to logical positions: `visual = logical * zoom + offset`.
///
/// `shift` and `scale_about` update the vertices' visual positions in place;
/// [`ViewTransform::apply`] re-derives them all from logical positions after
/// the model changed underneath.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    offset: Vec2,
    zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn to_visual(&self, logical: Vec2) -> Vec2 {
        logical * self.zoom + self.offset
    }

    pub fn to_logical(&self, visual: Vec2) -> Vec2 {
        (visual - self.offset) / self.zoom
    }

    /// Pans the view. Logical positions are untouched.
    pub fn shift(&mut self, graph: &mut GraphModel, displacement: Vec2) {
        self.offset += displacement;
        for visual in graph.visual_positions_mut() {
            *visual += displacement;
        }
    }

    /// Scales the view by `factor` around the screen point `center`.
    pub fn scale_about(&mut self, graph: &mut GraphModel, factor: f32, center: Vec2) {
        self.offset = (self.offset - center) * factor + center;
        self.zoom *= factor;
        for visual in graph.visual_positions_mut() {
            *visual = (*visual - center) * factor + center;
        }
    }

    /// Changes the running zoom by `delta` around `center`, unless that would
    /// take it to `min_zoom` or below. Returns whether the step was applied.
    pub fn zoom_by(
        &mut self,
        graph: &mut GraphModel,
        delta: f32,
        center: Vec2,
        min_zoom: f32,
    ) -> bool {
        let target = self.zoom + delta;
        if target <= min_zoom {
            return false;
        }
        self.scale_about(graph, target / self.zoom, center);
        // Pin the running value so repeated ratios do not drift.
        self.zoom = target;
        true
    }

    pub fn apply(&self, graph: &mut GraphModel) {
        graph.project_visuals(|logical| self.to_visual(logical));
    }
}
