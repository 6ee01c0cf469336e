pub mod runner;

pub use runner::{GameRunner, PointerKind};

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates the `thread_local!` GameRunner, a `with_runner()` helper and
/// the exports the host calls: lifecycle, pointer input in screen pixels,
/// level loading, and frame output accessors.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use tapline_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// tapline_web::export_game!(MyGame, "my-game", vectors);
/// ```
///
/// The game type needs a `new()` constructor.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::error!("{}: game_init() has not been called", $game_name);
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_resize(width: f32, height: f32) {
            with_runner(|r| r.resize(width, height));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_pointer($crate::PointerKind::Down, x, y));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_pointer($crate::PointerKind::Up, x, y));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_pointer($crate::PointerKind::Move, x, y));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        /// Returns false if the level was rejected (details go to the console).
        #[wasm_bindgen]
        pub fn game_load_level(json: &str) -> bool {
            with_runner(|r| r.load_level(json)).unwrap_or(false)
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u8 {
            with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_label(slot: u32) -> Option<String> {
            with_runner(|r| r.label(slot)).flatten()
        }

        #[wasm_bindgen]
        pub fn take_scene_request() -> Option<String> {
            with_runner(|r| r.take_scene_request()).flatten()
        }

        #[wasm_bindgen]
        pub fn get_polylines() -> js_sys::Float32Array {
            let data = with_runner(|r| r.polyline_data()).unwrap_or_default();
            js_sys::Float32Array::from(data.as_slice())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or(0.0)
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }
    };

    // Variant with vectors feature
    ($game_type:ty, $game_name:literal, vectors) => {
        $crate::export_game!($game_type, $game_name);

        // ---- Vector accessors (only when vectors feature is enabled) ----

        #[wasm_bindgen]
        pub fn get_vector_vertices_ptr() -> *const f32 {
            with_runner(|r| r.vector_vertices_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_vector_vertex_count() -> u32 {
            with_runner(|r| r.vector_vertex_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_vector_vertices() -> u32 {
            with_runner(|r| r.max_vector_vertices()).unwrap_or(0)
        }
    };
}
