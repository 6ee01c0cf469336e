use glam::Vec2;
use tapline_engine::{PolylineId, PolylineStore, VectorColor};

/// The line being drawn for the current connection attempt, plus the
/// polylines of every connection already made.
#[derive(Debug)]
pub struct LineAccumulator {
    points: Vec<Vec2>,
    current: Option<PolylineId>,
    permanent: Vec<PolylineId>,
    min_distance: f32,
    width: f32,
    sort_order: i32,
}

impl LineAccumulator {
    pub fn new(min_distance: f32, width: f32, sort_order: i32) -> Self {
        Self {
            points: Vec::with_capacity(128),
            current: None,
            permanent: Vec::new(),
            min_distance: min_distance.max(0.0),
            width,
            sort_order,
        }
    }

    /// Begin a new line at `origin`. An unfinished line is discarded first.
    pub fn start_line(&mut self, store: &mut PolylineStore, origin: Vec2, color: VectorColor) {
        self.cancel(store);
        let id = store.create(color, color, self.width, self.sort_order);
        self.points.push(origin);
        store.set_points(id, &self.points);
        self.current = Some(id);
    }

    /// Append `p` if it is farther than `min_distance` from the last point.
    pub fn append_point(&mut self, store: &mut PolylineStore, p: Vec2) -> bool {
        let Some(id) = self.current else {
            return false;
        };
        if let Some(last) = self.points.last() {
            if last.distance(p) <= self.min_distance {
                return false;
            }
        }
        self.points.push(p);
        store.push_point(id, p);
        true
    }

    /// Close the line exactly on `end` and keep it.
    pub fn finalize(&mut self, store: &mut PolylineStore, end: Vec2) -> Option<PolylineId> {
        let id = self.current.take()?;
        self.points.push(end);
        store.set_points(id, &self.points);
        self.points.clear();
        self.permanent.push(id);
        Some(id)
    }

    /// Drop the unfinished line. Returns false if there was none.
    pub fn cancel(&mut self, store: &mut PolylineStore) -> bool {
        self.points.clear();
        match self.current.take() {
            Some(id) => {
                store.destroy(id);
                true
            }
            None => false,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn last_point(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    pub fn permanent(&self) -> &[PolylineId] {
        &self.permanent
    }

    pub fn permanent_count(&self) -> usize {
        self.permanent.len()
    }
}
