use std::fmt;
use std::path::Path;

use ggez::glam::Vec2;
use log::{debug, info};

use crate::config::{EditorConfig, GraphConfig, NavigationConfig};
use crate::error::GraphFileError;
use crate::format;
use crate::graph::{GraphModel, VertexIndex};
use crate::input::{InputEvent, Key, PointerButton};
use crate::view::ViewTransform;

/// How pointer and keyboard input is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Place, drag and delete vertices.
    #[default]
    Vertex,
    /// Link two vertices; delete edges.
    Edge,
    /// Edit vertex labels.
    Text,
    /// Pan and zoom.
    Navigation,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Vertex, Mode::Edge, Mode::Text, Mode::Navigation];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Vertex => "vertex",
            Mode::Edge => "edge",
            Mode::Text => "text",
            Mode::Navigation => "navigation",
        };
        f.write_str(name)
    }
}

/// One editing session: the graph, the view onto it, the mode and the
/// selected vertex.
pub struct Editor {
    graph: GraphModel,
    view: ViewTransform,
    mode: Mode,
    selected: Option<VertexIndex>,
    pointer: Vec2,
    graph_config: GraphConfig,
    navigation: NavigationConfig,
}

impl Editor {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            graph: GraphModel::new(),
            view: ViewTransform::default(),
            mode: Mode::default(),
            selected: None,
            pointer: Vec2::ZERO,
            graph_config: config.graph,
            navigation: config.navigation,
        }
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> Option<VertexIndex> {
        self.selected
    }

    pub fn graph_config(&self) -> &GraphConfig {
        &self.graph_config
    }

    /// The edge being stretched from the selected vertex to the pointer.
    pub fn rubber_band(&self) -> Option<(Vec2, Vec2)> {
        if self.mode != Mode::Edge {
            return None;
        }
        let from = self.graph.vertex(self.selected?)?.visual_position();
        Some((from, self.pointer))
    }

    pub fn change_state(&mut self, mode: Mode) {
        self.selected = None;
        if self.mode != mode {
            info!("switched to {mode} mode");
        }
        self.mode = mode;
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { pos, .. }
            | InputEvent::PointerUp { pos, .. }
            | InputEvent::PointerMove { pos, .. }
            | InputEvent::Wheel { pos, .. } => self.pointer = pos,
            InputEvent::Key { .. } => {}
        }

        match self.mode {
            Mode::Vertex => self.handle_vertex_mode(event),
            Mode::Edge => self.handle_edge_mode(event),
            Mode::Text => self.handle_text_mode(event),
            Mode::Navigation => self.handle_navigation_mode(event),
        }
    }

    fn handle_vertex_mode(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMove { pos, .. } => {
                if let Some(idx) = self.selected {
                    self.graph.move_vertex_to(idx, self.view.to_logical(pos));
                    self.view.apply(&mut self.graph);
                }
            }
            InputEvent::PointerDown { pos, button } => {
                let clicked = self.graph.find_vertex_at(pos, &self.graph_config);
                match (button, clicked) {
                    (PointerButton::Primary, None) => {
                        self.graph.add_vertex(self.view.to_logical(pos));
                        self.view.apply(&mut self.graph);
                    }
                    (PointerButton::Primary, Some(idx)) => self.selected = Some(idx),
                    (PointerButton::Secondary, Some(idx)) => self.delete_vertex(idx),
                    (PointerButton::Secondary, None) => {}
                }
            }
            InputEvent::PointerUp { .. } => self.selected = None,
            InputEvent::Wheel { .. } | InputEvent::Key { .. } => {}
        }
    }

    fn handle_edge_mode(&mut self, event: &InputEvent) {
        let InputEvent::PointerDown { pos, button } = *event else {
            return;
        };
        match button {
            PointerButton::Primary => {
                match (self.selected, self.graph.find_vertex_at(pos, &self.graph_config)) {
                    (_, None) => self.selected = None,
                    (None, Some(idx)) => self.selected = Some(idx),
                    (Some(from), Some(to)) => {
                        self.graph.add_edge(from, to);
                        self.selected = None;
                    }
                }
            }
            PointerButton::Secondary => {
                if let Some(edge) = self.graph.find_edge_at(pos, &self.graph_config) {
                    self.graph.delete_edge(edge);
                }
            }
        }
    }

    fn handle_text_mode(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
            } => {
                if let Some(idx) = self.graph.find_vertex_at(pos, &self.graph_config) {
                    self.selected = Some(idx);
                }
            }
            InputEvent::Key { key, text } => {
                let Some(idx) = self.selected else {
                    return;
                };
                match key {
                    Key::Backspace => {
                        self.graph.label_mut(idx).pop();
                    }
                    Key::Enter => {
                        debug!("committed label {:?}", self.graph.vertices()[idx].label());
                        self.selected = None;
                    }
                    Key::Other => {
                        // Labels are stored whitespace-separated on disk.
                        if let Some(c) = text.filter(|c| !c.is_control() && !c.is_whitespace()) {
                            self.graph.label_mut(idx).push(c);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_navigation_mode(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMove {
                delta,
                primary_held: true,
                ..
            } => self.view.shift(&mut self.graph, delta),
            InputEvent::Wheel { pos, delta, dt } => {
                let step = dt * delta * self.navigation.sensitivity;
                if !self
                    .view
                    .zoom_by(&mut self.graph, step, pos, self.navigation.min_zoom)
                {
                    debug!("zoom step rejected at {}", self.view.zoom());
                }
            }
            _ => {}
        }
    }

    fn delete_vertex(&mut self, idx: VertexIndex) {
        self.graph.delete_vertex(idx);
        self.selected = match self.selected {
            Some(sel) if sel == idx => None,
            Some(sel) if sel > idx => Some(sel - 1),
            other => other,
        };
    }

    pub fn save(&self, path: &Path) -> Result<(), GraphFileError> {
        format::save(&self.graph, path)
    }

    /// Replaces the graph with the file's contents. On error the current
    /// graph, view and selection are left exactly as they were.
    pub fn load(&mut self, path: &Path) -> Result<(), GraphFileError> {
        let graph = format::load(path)?;
        self.graph = graph;
        self.view = ViewTransform::default();
        self.selected = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn editor() -> Editor {
        Editor::new(&EditorConfig::default())
    }

    fn down(x: f32, y: f32, button: PointerButton) -> InputEvent {
        InputEvent::PointerDown {
            pos: Vec2::new(x, y),
            button,
        }
    }

    fn up(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp {
            pos: Vec2::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn drag(x: f32, y: f32, dx: f32, dy: f32) -> InputEvent {
        InputEvent::PointerMove {
            pos: Vec2::new(x, y),
            delta: Vec2::new(dx, dy),
            primary_held: true,
        }
    }

    fn typed(c: char) -> InputEvent {
        InputEvent::Key {
            key: Key::Other,
            text: Some(c),
        }
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::Key { key, text: None }
    }

    fn click(ed: &mut Editor, x: f32, y: f32, button: PointerButton) {
        ed.handle(&down(x, y, button));
        ed.handle(&up(x, y));
    }

    /// Two vertices at (100,100) and (200,100) placed in vertex mode.
    fn with_pair() -> Editor {
        let mut ed = editor();
        click(&mut ed, 100.0, 100.0, PointerButton::Primary);
        click(&mut ed, 200.0, 100.0, PointerButton::Primary);
        ed
    }

    #[test]
    fn vertex_mode_places_drags_and_deletes() {
        let mut ed = with_pair();
        assert_eq!(ed.graph().vertices().len(), 2);

        ed.handle(&down(101.0, 100.0, PointerButton::Primary));
        assert_eq!(ed.selected(), Some(0));
        ed.handle(&drag(120.0, 140.0, 19.0, 40.0));
        ed.handle(&up(120.0, 140.0));
        assert_eq!(ed.selected(), None);
        assert_eq!(ed.graph().vertices()[0].position(), Vec2::new(120.0, 140.0));

        // Moving without a selection does nothing.
        ed.handle(&drag(300.0, 300.0, 1.0, 1.0));
        assert_eq!(ed.graph().vertices()[0].position(), Vec2::new(120.0, 140.0));

        click(&mut ed, 120.0, 140.0, PointerButton::Secondary);
        assert_eq!(ed.graph().vertices().len(), 1);
        assert_eq!(ed.graph().vertices()[0].position(), Vec2::new(200.0, 100.0));

        // Right click on empty canvas is ignored.
        click(&mut ed, 500.0, 500.0, PointerButton::Secondary);
        assert_eq!(ed.graph().vertices().len(), 1);
    }

    #[test]
    fn edge_mode_links_two_clicked_vertices() {
        let mut ed = with_pair();
        ed.change_state(Mode::Edge);

        ed.handle(&down(100.0, 100.0, PointerButton::Primary));
        assert_eq!(ed.selected(), Some(0));
        ed.handle(&InputEvent::PointerMove {
            pos: Vec2::new(150.0, 120.0),
            delta: Vec2::ZERO,
            primary_held: false,
        });
        assert_eq!(
            ed.rubber_band(),
            Some((Vec2::new(100.0, 100.0), Vec2::new(150.0, 120.0)))
        );
        // Releasing does not end the gesture in edge mode.
        ed.handle(&up(150.0, 120.0));
        assert_eq!(ed.selected(), Some(0));

        ed.handle(&down(200.0, 100.0, PointerButton::Primary));
        assert_eq!(ed.selected(), None);
        assert_eq!(ed.graph().edges().len(), 1);
        assert_eq!((ed.graph().edges()[0].a, ed.graph().edges()[0].b), (0, 1));
        assert_eq!(ed.rubber_band(), None);
    }

    #[test]
    fn edge_mode_click_on_empty_clears_selection() {
        let mut ed = with_pair();
        ed.change_state(Mode::Edge);
        ed.handle(&down(100.0, 100.0, PointerButton::Primary));
        ed.handle(&down(400.0, 400.0, PointerButton::Primary));
        assert_eq!(ed.selected(), None);
        assert!(ed.graph().edges().is_empty());
    }

    #[test]
    fn edge_mode_allows_self_loops() {
        let mut ed = with_pair();
        ed.change_state(Mode::Edge);
        ed.handle(&down(100.0, 100.0, PointerButton::Primary));
        ed.handle(&down(100.0, 100.0, PointerButton::Primary));
        assert_eq!((ed.graph().edges()[0].a, ed.graph().edges()[0].b), (0, 0));
    }

    #[test]
    fn secondary_click_in_edge_mode_only_deletes_edges() {
        let mut ed = with_pair();
        ed.change_state(Mode::Edge);

        ed.handle(&down(100.0, 100.0, PointerButton::Secondary));
        assert_eq!(ed.graph().vertices().len(), 2);

        ed.handle(&down(100.0, 100.0, PointerButton::Primary));
        ed.handle(&down(200.0, 100.0, PointerButton::Primary));
        ed.handle(&down(150.0, 104.0, PointerButton::Secondary));
        assert!(ed.graph().edges().is_empty());
        assert_eq!(ed.graph().vertices().len(), 2);
    }

    #[test]
    fn text_mode_edits_labels() {
        let mut ed = with_pair();
        ed.change_state(Mode::Text);

        // Typing without a selection is ignored.
        ed.handle(&typed('z'));
        assert_eq!(ed.graph().vertices()[0].label(), "");

        ed.handle(&down(200.0, 100.0, PointerButton::Primary));
        for c in "hub!".chars() {
            ed.handle(&typed(c));
        }
        ed.handle(&key(Key::Backspace));
        ed.handle(&typed(' '));
        ed.handle(&typed('\u{8}'));
        assert_eq!(ed.graph().vertices()[1].label(), "hub");

        ed.handle(&key(Key::Enter));
        assert_eq!(ed.selected(), None);
        ed.handle(&typed('x'));
        assert_eq!(ed.graph().vertices()[1].label(), "hub");
    }

    #[test]
    fn backspace_on_empty_label_is_harmless() {
        let mut ed = with_pair();
        ed.change_state(Mode::Text);
        ed.handle(&down(100.0, 100.0, PointerButton::Primary));
        ed.handle(&key(Key::Backspace));
        assert_eq!(ed.graph().vertices()[0].label(), "");
    }

    #[test]
    fn change_state_always_clears_selection() {
        for from in Mode::ALL {
            for to in Mode::ALL {
                let mut ed = with_pair();
                ed.change_state(from);
                if from != Mode::Navigation {
                    ed.handle(&down(100.0, 100.0, PointerButton::Primary));
                }
                ed.change_state(to);
                assert_eq!(ed.selected(), None, "{from} -> {to}");
                assert_eq!(ed.mode(), to);
            }
        }
    }

    #[test]
    fn deleting_another_vertex_keeps_selection_on_same_vertex() {
        let mut ed = with_pair();
        click(&mut ed, 300.0, 100.0, PointerButton::Primary);
        ed.handle(&down(300.0, 100.0, PointerButton::Primary));
        assert_eq!(ed.selected(), Some(2));
        ed.handle(&down(100.0, 100.0, PointerButton::Secondary));
        assert_eq!(ed.selected(), Some(1));
        assert_eq!(ed.graph().vertices()[1].position(), Vec2::new(300.0, 100.0));

        ed.handle(&down(300.0, 100.0, PointerButton::Secondary));
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn navigation_pans_only_with_primary_held() {
        let mut ed = with_pair();
        ed.change_state(Mode::Navigation);
        ed.handle(&drag(110.0, 110.0, 10.0, 10.0));
        ed.handle(&InputEvent::PointerMove {
            pos: Vec2::new(150.0, 150.0),
            delta: Vec2::new(40.0, 40.0),
            primary_held: false,
        });

        let v = &ed.graph().vertices()[0];
        assert_eq!(v.visual_position(), Vec2::new(110.0, 110.0));
        assert_eq!(v.position(), Vec2::new(100.0, 100.0));

        // Clicks never mutate the graph here.
        click(&mut ed, 500.0, 500.0, PointerButton::Primary);
        click(&mut ed, 110.0, 110.0, PointerButton::Secondary);
        assert_eq!(ed.graph().vertices().len(), 2);
    }

    #[test]
    fn placing_after_pan_stores_logical_position() {
        let mut ed = with_pair();
        ed.change_state(Mode::Navigation);
        ed.handle(&drag(0.0, 0.0, 50.0, 0.0));
        ed.change_state(Mode::Vertex);

        click(&mut ed, 400.0, 100.0, PointerButton::Primary);
        let v = &ed.graph().vertices()[2];
        assert_eq!(v.visual_position(), Vec2::new(400.0, 100.0));
        assert_eq!(v.position(), Vec2::new(350.0, 100.0));
        // Existing vertices are still hit where they are drawn.
        assert_eq!(
            ed.graph().find_vertex_at(Vec2::new(150.0, 100.0), ed.graph_config()),
            Some(0)
        );
    }

    #[test]
    fn wheel_zooms_around_pointer_and_respects_floor() {
        let mut ed = with_pair();
        ed.change_state(Mode::Navigation);
        ed.handle(&InputEvent::Wheel {
            pos: Vec2::new(100.0, 100.0),
            delta: 1.0,
            dt: 1.0 / 3.0,
        });
        assert!((ed.view().zoom() - 2.0).abs() < 1e-5);
        let v = ed.graph().vertices();
        assert!(v[0].visual_position().distance(Vec2::new(100.0, 100.0)) < 1e-3);
        assert!(v[1].visual_position().distance(Vec2::new(300.0, 100.0)) < 1e-3);

        ed.handle(&InputEvent::Wheel {
            pos: Vec2::ZERO,
            delta: -10.0,
            dt: 1.0,
        });
        assert!((ed.view().zoom() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn wheel_outside_navigation_is_ignored() {
        let mut ed = with_pair();
        ed.handle(&InputEvent::Wheel {
            pos: Vec2::ZERO,
            delta: 1.0,
            dt: 0.1,
        });
        assert_eq!(ed.view().zoom(), 1.0);
    }

    #[test]
    fn failed_load_keeps_current_graph() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.gph");
        fs::write(&path, "2\n1 1 a\n").unwrap();

        let mut ed = with_pair();
        ed.change_state(Mode::Navigation);
        ed.handle(&drag(0.0, 0.0, 5.0, 5.0));
        let graph_before = ed.graph().clone();
        let view_before = *ed.view();

        let err = ed.load(&path).unwrap_err();
        assert!(matches!(err, GraphFileError::Format { .. }));
        assert_eq!(ed.graph(), &graph_before);
        assert_eq!(ed.view(), &view_before);

        assert!(ed.load(&dir.path().join("missing.gph")).is_err());
        assert_eq!(ed.graph(), &graph_before);
    }

    #[test]
    fn save_and_load_resets_view() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pair.gph");

        let mut ed = with_pair();
        ed.change_state(Mode::Navigation);
        ed.handle(&drag(0.0, 0.0, 30.0, 0.0));
        ed.save(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2\n100 100\n200 100\n0\n"
        );

        let mut fresh = editor();
        fresh.load(&path).unwrap();
        assert_eq!(fresh.view(), &ViewTransform::default());
        assert_eq!(
            fresh.graph().vertices()[1].visual_position(),
            Vec2::new(200.0, 100.0)
        );
    }
}
