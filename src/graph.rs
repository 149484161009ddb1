//! Vertices and edges with positional identity.
//!
//! Positions are `f32` (`glam::Vec2`, the vector type used for drawing).
//! Coordinates with more than about seven significant digits are rounded to
//! the nearest `f32` when loaded.

use ggez::glam::Vec2;
use log::debug;

use crate::config::GraphConfig;
use crate::geometry::{distance_point_to_segment, within_radius};

/// Position of a vertex in [`GraphModel::vertices`]. Not stable across deletion.
pub type VertexIndex = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    label: String,
    position: Vec2,
    visual_position: Vec2,
}

impl Vertex {
    fn new(position: Vec2) -> Self {
        Self {
            label: String::new(),
            position,
            visual_position: position,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Persisted, pan/zoom independent coordinate.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// On-screen coordinate; what picking and drawing use.
    pub fn visual_position(&self) -> Vec2 {
        self.visual_position
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub a: VertexIndex,
    pub b: VertexIndex,
}

impl Edge {
    pub fn touches(&self, idx: VertexIndex) -> bool {
        self.a == idx || self.b == idx
    }
}

/// Ordered vertices plus edges that refer to them by position.
///
/// Indices passed to the mutating methods are trusted: out-of-range indices
/// panic, and `add_edge` stores whatever it is given.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex(&self, idx: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(idx)
    }

    /// Visual endpoints of every edge, in edge order.
    pub fn edge_segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.edges.iter().map(move |e| {
            (
                self.vertices[e.a].visual_position,
                self.vertices[e.b].visual_position,
            )
        })
    }

    /// Appends an unlabeled vertex and returns its index.
    pub fn add_vertex(&mut self, pos: Vec2) -> VertexIndex {
        self.vertices.push(Vertex::new(pos));
        let idx = self.vertices.len() - 1;
        debug!("added vertex {idx} at ({}, {})", pos.x, pos.y);
        idx
    }

    /// Appends an edge. Self-loops and duplicates are kept as given.
    pub fn add_edge(&mut self, a: VertexIndex, b: VertexIndex) {
        debug!("added edge {a} -> {b}");
        self.edges.push(Edge { a, b });
    }

    pub fn move_vertex_to(&mut self, idx: VertexIndex, pos: Vec2) {
        let vertex = &mut self.vertices[idx];
        vertex.position = pos;
        vertex.visual_position = pos;
    }

    pub fn label_mut(&mut self, idx: VertexIndex) -> &mut String {
        &mut self.vertices[idx].label
    }

    /// Removes a vertex, drops its incident edges and shifts every endpoint
    /// above `idx` down by one so surviving edges keep their vertices.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn delete_vertex(&mut self, idx: VertexIndex) {
        self.vertices.remove(idx);

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(idx));
        for edge in &mut self.edges {
            if edge.a > idx {
                edge.a -= 1;
            }
            if edge.b > idx {
                edge.b -= 1;
            }
        }
        debug!(
            "deleted vertex {idx} and {} incident edge(s)",
            before - self.edges.len()
        );
    }

    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn delete_edge(&mut self, idx: usize) {
        self.edges.remove(idx);
        debug!("deleted edge {idx}");
    }

    /// First vertex (lowest index) whose visual position is within the vertex
    /// radius of `p`. Overlapping vertices resolve by insertion order, not by
    /// distance.
    pub fn find_vertex_at(&self, p: Vec2, config: &GraphConfig) -> Option<VertexIndex> {
        self.vertices
            .iter()
            .position(|v| within_radius(p, v.visual_position, config.vertex_radius))
    }

    /// First edge whose visual segment passes closer to `p` than the edge
    /// pick threshold.
    pub fn find_edge_at(&self, p: Vec2, config: &GraphConfig) -> Option<usize> {
        let threshold = config.edge_pick_threshold();
        self.edge_segments()
            .position(|(a, b)| distance_point_to_segment(p, a, b) < threshold)
    }

    pub(crate) fn visual_positions_mut(&mut self) -> impl Iterator<Item = &mut Vec2> {
        self.vertices.iter_mut().map(|v| &mut v.visual_position)
    }

    /// Re-derives every visual position from its logical one.
    pub(crate) fn project_visuals(&mut self, f: impl Fn(Vec2) -> Vec2) {
        for vertex in &mut self.vertices {
            vertex.visual_position = f(vertex.position);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
