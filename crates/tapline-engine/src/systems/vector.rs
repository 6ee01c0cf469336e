//! Lyon-based tessellation of lines and shapes.
//!
//! Produces a flat triangle-list vertex buffer (`x, y, r, g, b, a` per vertex)
//! that the host uploads as-is. Cleared each frame and refilled from the
//! game's render pass.
//!
//! ```ignore
//! // In your Game::render():
//! ctx.vectors.fill_circle(dot.pos, dot.radius, VectorColor::WHITE);
//! ctx.vectors.stroke_polygon(&zone.outline(32), 0.05, VectorColor::YELLOW);
//! ctx.vectors.draw_polylines(ctx.polylines);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use super::color::VectorColor;
use super::polyline::{Polyline, PolylineStore};

/// Per-vertex data. 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(x: f32, y: f32, c: VectorColor) -> Self {
        Self { x, y, r: c.r, g: c.g, b: c.b, a: c.a }
    }
}

struct FillVertexCtor {
    color: VectorColor,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(p.x, p.y, self.color)
    }
}

/// Stroke vertices blend from `start` to `end` by distance along the path.
struct GradientStrokeCtor {
    start: VectorColor,
    end: VectorColor,
    length: f32,
}

impl StrokeVertexConstructor<VectorVertex> for GradientStrokeCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        let t = if self.length > 0.0 {
            vertex.advancement() / self.length
        } else {
            0.0
        };
        VectorVertex::at(p.x, p.y, self.start.lerp(self.end, t))
    }
}

fn open_path(points: &[Vec2]) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(false);
    builder.build()
}

fn closed_path(points: &[Vec2]) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.close();
    builder.build()
}

pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    max_vertices: usize,
}

impl VectorState {
    pub fn new(max_vertices: usize) -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(max_vertices * VectorVertex::FLOATS),
            max_vertices,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Raw pointer to the flat float buffer (for the host copy).
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }

    /// Flush indexed geometry to the flat buffer as a triangle list.
    /// Shapes that would overflow `max_vertices` are dropped whole.
    fn flush_geometry(&mut self) {
        let incoming = self.geometry.indices.len();
        if self.vertex_count() + incoming > self.max_vertices {
            log::warn!(
                "Vector buffer full ({} vertices); dropping shape of {}",
                self.vertex_count(),
                incoming
            );
        } else {
            for idx in &self.geometry.indices {
                let v = &self.geometry.vertices[*idx as usize];
                self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
            }
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    pub fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() < 3 {
            return;
        }
        let path = closed_path(points);
        self.fill_path(&path, color);
    }

    /// Fill an axis-aligned rectangle spanning `min`..`max`.
    pub fn fill_rect(&mut self, min: Vec2, max: Vec2, color: VectorColor) {
        let points = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.fill_polygon(&points, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();
        self.fill_path(&path, color);
    }

    pub fn fill_path(&mut self, path: &Path, color: VectorColor) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(0.01),
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("Fill tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Stroke an open polyline in a single color.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        self.stroke_polyline_gradient(points, width, color, color);
    }

    /// Stroke an open polyline whose color blends from `start` to `end`.
    pub fn stroke_polyline_gradient(
        &mut self,
        points: &[Vec2],
        width: f32,
        start: VectorColor,
        end: VectorColor,
    ) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }
        let length: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        let path = open_path(points);
        self.stroke_path(&path, width, GradientStrokeCtor { start, end, length });
    }

    pub fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 3 || width <= 0.0 {
            return;
        }
        let path = closed_path(points);
        self.stroke_path(&path, width, GradientStrokeCtor { start: color, end: color, length: 0.0 });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor) {
        if radius <= 0.0 || width <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();
        self.stroke_path(&path, width, GradientStrokeCtor { start: color, end: color, length: 0.0 });
    }

    fn stroke_path(&mut self, path: &Path, width: f32, ctor: GradientStrokeCtor) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(0.01).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, ctor),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("Stroke tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    pub fn draw_polyline(&mut self, line: &Polyline) {
        self.stroke_polyline_gradient(&line.points, line.width, line.color_start, line.color_end);
    }

    /// Stroke every visible polyline in draw order.
    pub fn draw_polylines(&mut self, store: &PolylineStore) {
        for (_, line) in store.iter_sorted() {
            self.draw_polyline(line);
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new(16384)
    }
}
