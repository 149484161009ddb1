//! The `.gph` text format.
//!
//! ```text
//! <vertex count>
//! <x> <y> <label>      one line per vertex, logical position
//! <edge count>
//! <a> <b>              one line per edge
//! ```
//!
//! Labels may not contain whitespace. An empty label is written as just
//! `<x> <y>`.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::{FromStr, Lines};

use ggez::glam::Vec2;
use log::info;

use crate::error::{FormatIssue, GraphFileError};
use crate::graph::GraphModel;

pub fn encode(graph: &GraphModel) -> String {
    let mut out = format!("{}\n", graph.vertices().len());
    for vertex in graph.vertices() {
        let pos = vertex.position();
        let line = if vertex.label().is_empty() {
            format!("{} {}\n", pos.x, pos.y)
        } else {
            format!("{} {} {}\n", pos.x, pos.y, vertex.label())
        };
        out.push_str(&line);
    }
    out.push_str(&format!("{}\n", graph.edges().len()));
    for edge in graph.edges() {
        out.push_str(&format!("{} {}\n", edge.a, edge.b));
    }
    out
}

/// Parses a whole file. Nothing is returned unless every record parsed.
pub fn decode(text: &str) -> Result<GraphModel, GraphFileError> {
    let mut reader = LineReader::new(text);
    let mut graph = GraphModel::new();

    let vertex_count = reader.count("vertex count")?;
    for _ in 0..vertex_count {
        let (line, fields) = reader.fields("vertex line")?;
        if !(2..=3).contains(&fields.len()) {
            return Err(GraphFileError::format(
                line,
                FormatIssue::FieldCount {
                    expected: "2 or 3",
                    found: fields.len(),
                },
            ));
        }
        let x = parse_coordinate(line, fields[0])?;
        let y = parse_coordinate(line, fields[1])?;
        let idx = graph.add_vertex(Vec2::new(x, y));
        if let Some(label) = fields.get(2) {
            graph.label_mut(idx).push_str(label);
        }
    }

    let edge_count = reader.count("edge count")?;
    for _ in 0..edge_count {
        let (line, fields) = reader.fields("edge line")?;
        if fields.len() != 2 {
            return Err(GraphFileError::format(
                line,
                FormatIssue::FieldCount {
                    expected: "2",
                    found: fields.len(),
                },
            ));
        }
        let a: usize = parse_field(line, fields[0])?;
        let b: usize = parse_field(line, fields[1])?;
        for index in [a, b] {
            if index >= vertex_count {
                return Err(GraphFileError::format(
                    line,
                    FormatIssue::EndpointOutOfRange {
                        index,
                        vertex_count,
                    },
                ));
            }
        }
        graph.add_edge(a, b);
    }

    Ok(graph)
}

pub fn save(graph: &GraphModel, path: &Path) -> Result<(), GraphFileError> {
    fs::write(path, encode(graph))?;
    info!(
        "saved {} vertices and {} edges to {}",
        graph.vertices().len(),
        graph.edges().len(),
        path.display()
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<GraphModel, GraphFileError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    let graph = decode(&text)?;
    info!(
        "loaded {} vertices and {} edges from {}",
        graph.vertices().len(),
        graph.edges().len(),
        path.display()
    );
    Ok(graph)
}

/// `ext` includes the leading dot, e.g. `".gph"`.
pub fn has_graph_extension(path: &Path, ext: &str) -> bool {
    path.to_string_lossy().ends_with(ext)
}

/// Appends `ext` unless the path already ends with it.
pub fn with_graph_extension(path: &Path, ext: &str) -> PathBuf {
    if has_graph_extension(path, ext) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(ext);
        PathBuf::from(name)
    }
}

fn parse_field<T: FromStr>(line: usize, field: &str) -> Result<T, GraphFileError> {
    field
        .parse()
        .map_err(|_| GraphFileError::format(line, FormatIssue::BadNumber(field.to_string())))
}

/// Rejects `NaN`, `inf` and values that overflow `f32`.
fn parse_coordinate(line: usize, field: &str) -> Result<f32, GraphFileError> {
    let value: f32 = parse_field(line, field)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GraphFileError::format(
            line,
            FormatIssue::BadNumber(field.to_string()),
        ))
    }
}

struct LineReader<'a> {
    lines: Lines<'a>,
    line: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self, what: &'static str) -> Result<(usize, &'a str), GraphFileError> {
        self.line += 1;
        match self.lines.next() {
            Some(text) => Ok((self.line, text)),
            None => Err(GraphFileError::format(self.line, FormatIssue::MissingLine(what))),
        }
    }

    fn count(&mut self, what: &'static str) -> Result<usize, GraphFileError> {
        let (line, text) = self.next_line(what)?;
        text.trim()
            .parse()
            .map_err(|_| GraphFileError::format(line, FormatIssue::BadCount(text.to_string())))
    }

    fn fields(&mut self, what: &'static str) -> Result<(usize, Vec<&'a str>), GraphFileError> {
        let (line, text) = self.next_line(what)?;
        Ok((line, text.split_whitespace().collect()))
    }
}
