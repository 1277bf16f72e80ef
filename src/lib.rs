// Reusable library API — visible to both CLI and WASM builds
pub mod ac3;
pub mod domains;
pub mod errors;
pub mod grid;
pub mod overlaps;
pub mod report;
pub mod slots;
pub mod solver;
pub mod word_list;

// Compile the wasm glue only when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;
