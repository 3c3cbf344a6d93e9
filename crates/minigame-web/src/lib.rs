pub mod runner;
pub mod storage;

pub use minigame_engine;
pub use runner::SuiteRunner;
pub use storage::{DateClock, WebSessionStorage};

/// Generate all `#[wasm_bindgen]` exports for a minigame suite.
///
/// Generates:
/// - `thread_local!` storage for the SuiteRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod suite;
///
/// minigame_web::export_suite!(suite::manifest, "my-suite");
/// ```
///
/// # Arguments
///
/// - `$manifest`: A `fn() -> SuiteManifest` providing the built-in catalog
/// - `$suite_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_suite {
    ($manifest:path, $suite_name:literal) => {
        use std::cell::RefCell;
        use $crate::minigame_engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SuiteRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::SuiteRunner) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Suite not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let runner = $crate::SuiteRunner::for_browser($manifest());

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $suite_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32, button: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_drag_move(piece: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::DragMove { piece: $crate::minigame_engine::PieceId(piece), x, y }));
        }

        #[wasm_bindgen]
        pub fn game_drag_end(piece: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::DragEnd { piece: $crate::minigame_engine::PieceId(piece), x, y }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_briefing_text() -> String {
            with_runner(|r| r.briefing_text())
        }

        // ---- Session accessors ----

        #[wasm_bindgen]
        pub fn get_session_id() -> String {
            with_runner(|r| r.session_id())
        }

        #[wasm_bindgen]
        pub fn get_total_score() -> u32 {
            with_runner(|r| r.total_score())
        }

        #[wasm_bindgen]
        pub fn get_summary_json() -> String {
            with_runner(|r| r.summary_json())
        }

        /// Pending scene code, or -1.
        #[wasm_bindgen]
        pub fn take_navigation() -> i32 {
            with_runner(|r| r.take_navigation())
        }
    };
}
