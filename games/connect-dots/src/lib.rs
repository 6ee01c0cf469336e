use wasm_bindgen::prelude::*;
use tapline_engine::*;

pub mod config;
pub mod connect;
pub mod dots;
pub mod game;
pub mod level;
pub mod line;
pub mod zones;
use game::ConnectDots;

tapline_web::export_game!(ConnectDots, "connect-dots", vectors);
