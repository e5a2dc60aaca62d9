//! WASM bindings for the browser arena

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::{Action, ArenaConfig, MatchController};

/// A running match, driven by the page's animation loop.
///
/// Pages that render from `snapshot()` alone may ignore `drainSnapshots()`;
/// the queue behind it keeps only the newest `OUTBOX_CAPACITY` frames.
#[wasm_bindgen]
pub struct ArenaHandle {
    controller: MatchController,
}

#[wasm_bindgen]
impl ArenaHandle {
    /// Start a match.
    ///
    /// # Arguments
    /// * `config_json` - JSON serialized ArenaConfig; missing fields use defaults,
    ///   an empty string means all defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<ArenaHandle, JsError> {
        let config = if config_json.trim().is_empty() {
            ArenaConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?
        };

        let controller = MatchController::new(config)
            .map_err(|e| JsError::new(&e.to_string()))?;

        Ok(ArenaHandle { controller })
    }

    /// Submit the player's action by tag (`"attack"`, `"defend"`, `"dodge"`, `"charge"`).
    ///
    /// Returns `false` if the arena is not accepting input right now;
    /// throws on an unknown tag.
    pub fn submit_action(&mut self, tag: &str) -> Result<bool, JsError> {
        self.controller
            .submit_tag(tag)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Advance the match clock.
    pub fn tick(&mut self, ticks: u32) {
        self.controller.advance(ticks as u64);
    }

    /// Current state as a plain JS object.
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.controller.snapshot())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Snapshots emitted since the last call, oldest first. Older frames
    /// are dropped if more piled up than the queue holds.
    pub fn drain_snapshots(&mut self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.controller.drain_snapshots())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Per-action bandit statistics.
    pub fn arms(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.controller.arms())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// `[player, bot]` health, for the health bars.
    pub fn health(&self) -> js_sys::Float64Array {
        let snapshot = self.controller.snapshot();
        js_sys::Float64Array::from(&[snapshot.player_health, snapshot.bot_health][..])
    }

    pub fn accepting_input(&self) -> bool {
        self.controller.gate_open()
    }
}

#[derive(serde::Serialize)]
struct ActionInfo {
    id: &'static str,
    label: &'static str,
}

/// All actions in button order
#[wasm_bindgen]
pub fn get_actions() -> Result<JsValue, JsError> {
    let actions: Vec<ActionInfo> = Action::ALL
        .iter()
        .map(|a| ActionInfo { id: a.name(), label: a.label() })
        .collect();

    serde_wasm_bindgen::to_value(&actions)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Default configuration as a JSON string, for the settings panel
#[wasm_bindgen]
pub fn default_config() -> Result<String, JsError> {
    serde_json::to_string(&ArenaConfig::default())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
