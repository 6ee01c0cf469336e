//! Retained polylines drawn by games (connection lines, free strokes).
//!
//! Games own the point data and push it here whenever it changes; the
//! renderer walks the store in `sort_order` and strokes each line.

use std::collections::BTreeMap;

use glam::Vec2;

use super::color::VectorColor;

/// Handle to a polyline in a [`PolylineStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolylineId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    /// Color at the first point; blended toward `color_end` along the line.
    pub color_start: VectorColor,
    pub color_end: VectorColor,
    pub width: f32,
    /// Lower values draw first.
    pub sort_order: i32,
    pub visible: bool,
}

impl Polyline {
    pub fn new(color_start: VectorColor, color_end: VectorColor, width: f32, sort_order: i32) -> Self {
        Self {
            points: Vec::new(),
            color_start,
            color_end,
            width,
            sort_order,
            visible: true,
        }
    }

    /// Total length along the points.
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

#[derive(Debug, Default)]
pub struct PolylineStore {
    lines: BTreeMap<PolylineId, Polyline>,
    next_id: u32,
}

impl PolylineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        color_start: VectorColor,
        color_end: VectorColor,
        width: f32,
        sort_order: i32,
    ) -> PolylineId {
        let id = PolylineId(self.next_id);
        self.next_id += 1;
        self.lines
            .insert(id, Polyline::new(color_start, color_end, width, sort_order));
        id
    }

    /// Replace the points of a line. Returns false for unknown ids.
    pub fn set_points(&mut self, id: PolylineId, points: &[Vec2]) -> bool {
        match self.lines.get_mut(&id) {
            Some(line) => {
                line.points.clear();
                line.points.extend_from_slice(points);
                true
            }
            None => {
                log::warn!("set_points on unknown polyline {:?}", id);
                false
            }
        }
    }

    pub fn push_point(&mut self, id: PolylineId, point: Vec2) -> bool {
        match self.lines.get_mut(&id) {
            Some(line) => {
                line.points.push(point);
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, id: PolylineId, visible: bool) {
        if let Some(line) = self.lines.get_mut(&id) {
            line.visible = visible;
        }
    }

    pub fn destroy(&mut self, id: PolylineId) -> Option<Polyline> {
        self.lines.remove(&id)
    }

    pub fn get(&self, id: PolylineId) -> Option<&Polyline> {
        self.lines.get(&id)
    }

    /// Visible lines in draw order: by `sort_order`, then creation order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (PolylineId, &Polyline)> {
        let mut sorted: Vec<(PolylineId, &Polyline)> = self
            .lines
            .iter()
            .filter(|(_, line)| line.visible)
            .map(|(id, line)| (*id, line))
            .collect();
        sorted.sort_by_key(|(id, line)| (line.sort_order, *id));
        sorted.into_iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
