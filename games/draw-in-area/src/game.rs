use std::error::Error;

use tapline_engine::*;

use crate::sketch::{AreaConfig, AreaSketch, SketchStep, AREA_LAYER};

const WORLD_W: f32 = 16.0;
const WORLD_H: f32 = 9.0;

pub struct DrawInArea {
    config: AreaConfig,
    sketch: Option<AreaSketch>,
}

impl DrawInArea {
    pub fn new() -> Self {
        Self {
            config: AreaConfig::default(),
            sketch: None,
        }
    }

    fn build(&mut self, ctx: &mut EngineContext) {
        ctx.clear_world();
        let id = ctx.next_id();
        ctx.spawn_with_region(
            Entity::new(id).with_tag("area").with_pos(self.config.area.center()),
            self.config.area.clone(),
            AREA_LAYER,
        );
        self.sketch = Some(AreaSketch::new(id, self.config.clone()));
    }

    pub fn sketch(&self) -> Option<&AreaSketch> {
        self.sketch.as_ref()
    }
}

impl Default for DrawInArea {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for DrawInArea {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.build(ctx);
        log::info!("Draw area ready");
    }

    fn update(&mut self, ctx: &mut EngineContext, _input: &InputQueue) {
        if let Some(sketch) = self.sketch.as_mut() {
            if sketch.update(ctx) == SketchStep::Stopped {
                log::debug!("Stroke ended with {} points", sketch.points().len());
            }
        }
    }

    #[cfg(feature = "vectors")]
    fn render(&self, ctx: &mut RenderContext) {
        let outline = self.config.area.outline(64);
        ctx.vectors.fill_polygon(&outline, VectorColor::GRAY.with_alpha(0.15));
        ctx.vectors.stroke_polygon(&outline, 0.04, VectorColor::GRAY);
        ctx.vectors.draw_polylines(ctx.polylines);
    }

    fn load_level(&mut self, ctx: &mut EngineContext, json: &str) -> Result<(), Box<dyn Error>> {
        let config = AreaConfig::from_json(json)?;
        if config.area.is_degenerate() {
            return Err("drawing area encloses nothing".into());
        }
        self.config = config;
        self.build(ctx);
        Ok(())
    }
}
