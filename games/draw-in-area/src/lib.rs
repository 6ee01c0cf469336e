use wasm_bindgen::prelude::*;
use tapline_engine::*;

pub mod game;
pub mod sketch;
use game::DrawInArea;

tapline_web::export_game!(DrawInArea, "draw-in-area", vectors);
