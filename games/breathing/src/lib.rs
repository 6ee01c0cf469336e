use wasm_bindgen::prelude::*;
use tapline_engine::*;

pub mod breath;
pub mod game;
use game::Breathing;

tapline_web::export_game!(Breathing, "breathing", vectors);
