use wasm_bindgen::prelude::*;

use crate::errors::SolveError;
use crate::grid::Grid;
use crate::solver::{solve_grid, SolveConfig};
use crate::word_list::WordList;

/// Implement `SolveError` for `JsValue`s
impl From<SolveError> for JsValue {
    fn from(e: SolveError) -> JsValue {
        JsValue::from_str(format!("[solve error] {e}").as_str())
    }
}

/// One-time module setup: route panics and `log` output to the browser
/// console. `init_with_level` fails only if a logger is already installed,
/// which is fine to ignore here.
#[wasm_bindgen(start)]
fn init_module() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[derive(serde::Serialize)]
struct WasmSolveResult {
    status: String,
    assignment: std::collections::BTreeMap<String, String>,
    across: Vec<(u32, String)>,
    down: Vec<(u32, String)>,
    filled: Vec<String>,
    recursive_calls: u64,
}

impl WasmSolveResult {
    fn empty(status: &str) -> Self {
        WasmSolveResult {
            status: status.to_string(),
            assignment: Default::default(),
            across: vec![],
            down: vec![],
            filled: vec![],
            recursive_calls: 0,
        }
    }
}

/// JS entry: (`grid`: string[][] of cell tokens, `word_list`: string[],
/// `max_solutions`: number, `seed`: bigint | undefined).
///
/// Returns `{status, assignment, across, down, filled, recursive_calls}`.
/// `NoSolution`/`NoSlots`/`Cancelled` come back as statuses; malformed
/// inputs reject the promise.
///
/// # Errors
/// Returns a `JsValue` error for malformed grids or dictionaries.
#[wasm_bindgen]
pub fn solve_grid_wasm(
    grid: JsValue,
    word_list: JsValue,
    max_solutions: usize,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let tokens: Vec<Vec<String>> = serde_wasm_bindgen::from_value(grid)
        .map_err(|e| JsValue::from_str(&format!("grid must be string[][]: {e}")))?;
    let words: Vec<String> = serde_wasm_bindgen::from_value(word_list)
        .map_err(|e| JsValue::from_str(&format!("word_list must be string[]: {e}")))?;

    let grid = Grid::from_tokens(&tokens)?;
    let dictionary = WordList::new(words)?;

    let config = SolveConfig { max_solutions, rng_seed: seed, ..Default::default() };
    let result = match solve_grid(&grid, &dictionary, config) {
        Ok(solution) => WasmSolveResult {
            status: "solved".to_string(),
            assignment: solution.assignment,
            across: solution.across,
            down: solution.down,
            filled: solution.filled,
            recursive_calls: solution.stats.recursive_calls,
        },
        Err(SolveError::NoSolution) => WasmSolveResult::empty("no_solution"),
        Err(SolveError::NoSlots) => WasmSolveResult::empty("no_slots"),
        Err(SolveError::Cancelled) => WasmSolveResult::empty("cancelled"),
        Err(e) => return Err(e.into()),
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("serialization failed: {e}")))
}

/// Parse a newline-separated dictionary (`word;score` or bare words) into
/// the surviving entries, as a JS array of uppercase strings.
///
/// # Errors
/// Returns a `JsValue` error if serialization fails.
#[wasm_bindgen]
pub fn parse_word_list(text: &str, min_score: i32) -> Result<JsValue, JsValue> {
    let words = WordList::parse_from_str(text, min_score);
    serde_wasm_bindgen::to_value(words.words())
        .map_err(|e| JsValue::from_str(&format!("serialization failed: {e}")))
}
