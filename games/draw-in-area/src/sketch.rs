use glam::Vec2;
use serde::{Deserialize, Serialize};
use tapline_engine::{EngineContext, EntityId, LayerMask, PolylineId, Region, VectorColor};

pub const AREA_LAYER: LayerMask = LayerMask::layer(0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    /// Where strokes may be drawn.
    pub area: Region,
    pub min_distance: f32,
    pub line_width: f32,
    pub color: VectorColor,
    pub sort_order: i32,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            area: Region::rect(Vec2::new(-5.0, -3.0), Vec2::new(5.0, 3.0)),
            min_distance: 0.1,
            line_width: 0.1,
            color: VectorColor::WHITE,
            sort_order: 0,
        }
    }
}

impl AreaConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchStep {
    None,
    Started,
    Extended,
    Stopped,
}

/// A single free-hand stroke that may only be drawn inside an area.
///
/// Leaving the area or lifting the pointer ends the stroke but keeps it on
/// screen; the next press inside the area replaces it.
#[derive(Debug)]
pub struct AreaSketch {
    area: EntityId,
    line: Option<PolylineId>,
    points: Vec<Vec2>,
    drawing: bool,
    config: AreaConfig,
}

impl AreaSketch {
    pub fn new(area: EntityId, config: AreaConfig) -> Self {
        Self {
            area,
            line: None,
            points: Vec::with_capacity(256),
            drawing: false,
            config,
        }
    }

    pub fn update(&mut self, ctx: &mut EngineContext) -> SketchStep {
        let pointer = ctx.pointer();
        let inside = ctx.spatial.contains(self.area, pointer.pos);
        let mut step = SketchStep::None;

        if let Some(press) = pointer.press_pos.filter(|_| pointer.pressed) {
            if ctx.spatial.contains(self.area, press) {
                self.start(ctx, press);
                step = SketchStep::Started;
            }
        }

        if self.drawing {
            if pointer.held && inside {
                if self.extend(ctx, pointer.pos) {
                    step = SketchStep::Extended;
                }
            } else {
                self.drawing = false;
                step = SketchStep::Stopped;
            }
        }
        step
    }

    fn start(&mut self, ctx: &mut EngineContext, pos: Vec2) {
        if let Some(old) = self.line.take() {
            ctx.polylines.destroy(old);
        }
        let id = ctx.polylines.create(
            self.config.color,
            self.config.color,
            self.config.line_width,
            self.config.sort_order,
        );
        self.points.clear();
        self.points.push(pos);
        ctx.polylines.set_points(id, &self.points);
        self.line = Some(id);
        self.drawing = true;
    }

    fn extend(&mut self, ctx: &mut EngineContext, pos: Vec2) -> bool {
        let Some(id) = self.line else {
            return false;
        };
        let far_enough = self
            .points
            .last()
            .map_or(true, |last| last.distance(pos) > self.config.min_distance);
        if far_enough {
            self.points.push(pos);
            ctx.polylines.push_point(id, pos);
        }
        far_enough
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn config(&self) -> &AreaConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapline_engine::{Entity, InputEvent, InputQueue};

    fn setup() -> (EngineContext, AreaSketch) {
        let mut ctx = EngineContext::new();
        let config = AreaConfig::default();
        let id = ctx.next_id();
        ctx.spawn_with_region(Entity::new(id), config.area.clone(), AREA_LAYER);
        (ctx, AreaSketch::new(id, config))
    }

    fn tick(ctx: &mut EngineContext, sketch: &mut AreaSketch, events: Vec<InputEvent>) -> SketchStep {
        let input = InputQueue::from_events(events);
        ctx.begin_tick(&input, 1.0 / 60.0);
        sketch.update(ctx)
    }

    #[test]
    fn press_outside_does_nothing() {
        let (mut ctx, mut sketch) = setup();
        let step = tick(&mut ctx, &mut sketch, vec![InputEvent::PointerDown { x: 9.0, y: 0.0 }]);
        assert_eq!(step, SketchStep::None);
        assert!(!sketch.is_drawing());
        assert!(ctx.polylines.is_empty());
    }

    #[test]
    fn hold_inside_appends_with_spacing() {
        let (mut ctx, mut sketch) = setup();
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerDown { x: 0.0, y: 0.0 }]);
        assert!(sketch.is_drawing());
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerMove { x: 0.05, y: 0.0 }]);
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerMove { x: 0.5, y: 0.0 }]);
        assert_eq!(sketch.points(), &[Vec2::ZERO, Vec2::new(0.5, 0.0)]);
    }

    #[test]
    fn press_and_move_in_one_tick_keeps_both_points() {
        let (mut ctx, mut sketch) = setup();
        let step = tick(
            &mut ctx,
            &mut sketch,
            vec![
                InputEvent::PointerDown { x: 0.0, y: 0.0 },
                InputEvent::PointerMove { x: 0.5, y: 0.0 },
            ],
        );
        assert_eq!(step, SketchStep::Extended);
        assert_eq!(sketch.points(), &[Vec2::ZERO, Vec2::new(0.5, 0.0)]);
    }

    #[test]
    fn press_inside_then_drag_out_in_one_tick_keeps_the_start() {
        let (mut ctx, mut sketch) = setup();
        let step = tick(
            &mut ctx,
            &mut sketch,
            vec![
                InputEvent::PointerDown { x: 4.5, y: 0.0 },
                InputEvent::PointerMove { x: 7.0, y: 0.0 },
            ],
        );
        assert_eq!(step, SketchStep::Stopped);
        assert_eq!(sketch.points(), &[Vec2::new(4.5, 0.0)]);
        assert_eq!(ctx.polylines.len(), 1);
    }

    #[test]
    fn leaving_area_stops_but_keeps_stroke() {
        let (mut ctx, mut sketch) = setup();
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerDown { x: 4.0, y: 0.0 }]);
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerMove { x: 4.8, y: 0.0 }]);
        let step = tick(&mut ctx, &mut sketch, vec![InputEvent::PointerMove { x: 6.0, y: 0.0 }]);
        assert_eq!(step, SketchStep::Stopped);
        assert!(!sketch.is_drawing());
        assert_eq!(ctx.polylines.len(), 1);

        // Coming back while still held does not resume
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerMove { x: 4.0, y: 1.0 }]);
        assert_eq!(sketch.points().len(), 2);
    }

    #[test]
    fn release_stops_drawing() {
        let (mut ctx, mut sketch) = setup();
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerDown { x: 0.0, y: 0.0 }]);
        let step = tick(&mut ctx, &mut sketch, vec![InputEvent::PointerUp { x: 0.0, y: 0.0 }]);
        assert_eq!(step, SketchStep::Stopped);
        assert_eq!(ctx.polylines.len(), 1);
    }

    #[test]
    fn new_press_replaces_previous_stroke() {
        let (mut ctx, mut sketch) = setup();
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerDown { x: 0.0, y: 0.0 }]);
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerMove { x: 1.0, y: 0.0 }]);
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerUp { x: 1.0, y: 0.0 }]);
        tick(&mut ctx, &mut sketch, vec![InputEvent::PointerDown { x: -2.0, y: 1.0 }]);

        assert_eq!(ctx.polylines.len(), 1);
        assert_eq!(sketch.points(), &[Vec2::new(-2.0, 1.0)]);
    }

    #[test]
    fn config_from_json() {
        let config = AreaConfig::from_json(
            r#"{ "area": { "shape": "circle", "center": [0, 0], "radius": 2 }, "min_distance": 0.2 }"#,
        )
        .unwrap();
        assert_eq!(config.min_distance, 0.2);
        assert_eq!(config.line_width, 0.1);
        assert!(config.area.contains(Vec2::new(1.5, 0.0)));
    }
}
