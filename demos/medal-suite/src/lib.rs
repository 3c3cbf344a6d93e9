use wasm_bindgen::prelude::*;

mod suite;

minigame_web::export_suite!(suite::manifest, "medal-suite");
