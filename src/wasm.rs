//! WebAssembly bindings for the Gray-Scott engine.
//!
//! Thin browser-facing shell around [`Session`]. The shell starts
//! empty and creates the session once the host knows a grid size or
//! loads a stored record; field and frame requests before that point
//! report the `NotInitialized` error instead of silently no-opping.
//!
//! Tick scheduling stays on the JS side (requestAnimationFrame); the
//! shell keeps the current [`TickToken`] so a queued callback that
//! arrives after pause sees `tick()` return `false` and stops
//! rescheduling.

use wasm_bindgen::prelude::*;

use crate::schema::{
    ChannelMix, ConfigError, ParamPreset, Parameters, SessionRecord, SimulationConfig,
};
use crate::session::{Session, SessionError, TickToken};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// Browser-facing simulation shell.
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmSession {
    session: Option<Session>,
    token: Option<TickToken>,
    palette: ChannelMix,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create an empty shell; call `init` or `loadRecord` next.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSession {
        WasmSession::default()
    }

    /// Create the session from a JSON configuration.
    ///
    /// Random seed layouts draw browser entropy, so two page loads
    /// get different arrangements.
    #[wasm_bindgen]
    pub fn init(&mut self, config_json: &str) -> Result<(), JsValue> {
        let config: SimulationConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;
        let session = Session::with_rng_seed(&config, entropy_from_js()).map_err(to_js)?;
        self.session = Some(session);
        self.token = None;
        Ok(())
    }

    /// True once a session exists.
    #[wasm_bindgen(js_name = isInitialized)]
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Start the loop and remember the tick token.
    #[wasm_bindgen]
    pub fn play(&mut self) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        let token = session.play();
        self.token = Some(token);
        Ok(())
    }

    /// Stop the loop; queued frame callbacks become no-ops.
    #[wasm_bindgen]
    pub fn pause(&mut self) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.pause();
        self.token = None;
        Ok(())
    }

    /// One frame callback. Returns true when a batch ran and the host
    /// should schedule the next frame, false when the tick was stale.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<bool, JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        let next = match self.token {
            Some(token) => session.tick(token),
            None => None,
        };
        self.token = next;
        Ok(next.is_some())
    }

    /// Advance one batch without changing play/pause.
    #[wasm_bindgen(js_name = stepOnce)]
    pub fn step_once(&mut self) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.step_once();
        Ok(())
    }

    /// Re-seed with the selected pattern.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.reset();
        Ok(())
    }

    /// Re-seed with a one-shot random arrangement.
    #[wasm_bindgen(js_name = randomSeed)]
    pub fn random_seed(&mut self) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.reseed_random();
        Ok(())
    }

    /// Forward document visibility; hiding auto-pauses.
    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, visible: bool) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.set_visible(visible);
        if !visible {
            self.token = None;
        }
        Ok(())
    }

    /// Tear down and re-create the field at new dimensions.
    ///
    /// Dimensions arrive as JS numbers; non-positive or fractional
    /// values are rejected before they reach the engine.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        let (width, height) = checked_dimensions(width, height)?;
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.resize(width, height).map_err(to_js)?;
        self.token = None;
        Ok(())
    }

    /// Replace all four coefficients at once.
    #[wasm_bindgen(js_name = setParams)]
    pub fn set_params(&mut self, du: f32, dv: f32, feed: f32, kill: f32) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.set_params(Parameters { du, dv, feed, kill });
        Ok(())
    }

    /// Apply a named parameter preset ("spots", "coral", "maze", ...).
    #[wasm_bindgen(js_name = setPreset)]
    pub fn set_preset(&mut self, name: &str) -> Result<(), JsValue> {
        let preset: ParamPreset = name
            .parse()
            .map_err(|e| JsValue::from_str(&format!("Invalid preset: {e}")))?;
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.set_params(preset.parameters());
        Ok(())
    }

    /// Set the batch size (clamped to the supported range).
    #[wasm_bindgen(js_name = setStepsPerTick)]
    pub fn set_steps_per_tick(&mut self, steps: u32) -> Result<(), JsValue> {
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.set_steps_per_tick(steps);
        Ok(())
    }

    /// Select the pattern for the next reset ("center", "random",
    /// "multiple").
    #[wasm_bindgen(js_name = setSeedPattern)]
    pub fn set_seed_pattern(&mut self, name: &str) -> Result<(), JsValue> {
        let pattern = name
            .parse()
            .map_err(|e| JsValue::from_str(&format!("Invalid seed pattern: {e}")))?;
        let session = self.session.as_mut().ok_or_else(not_initialized)?;
        session.set_seed_pattern(pattern);
        Ok(())
    }

    /// Select the display channel mix ("u", "v", "uv", "difference").
    #[wasm_bindgen(js_name = setPalette)]
    pub fn set_palette(&mut self, name: &str) -> Result<(), JsValue> {
        self.palette = name
            .parse()
            .map_err(|e| JsValue::from_str(&format!("Invalid palette: {e}")))?;
        Ok(())
    }

    /// Current display channel mix name.
    #[wasm_bindgen(js_name = getPalette)]
    pub fn get_palette(&self) -> String {
        self.palette.to_string()
    }

    /// Get the current frame (dimensions, step count and both grids).
    #[wasm_bindgen(js_name = getFrame)]
    pub fn get_frame(&self) -> Result<JsValue, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        serde_wasm_bindgen::to_value(&session.frame())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// The u grid as a Float32Array copy.
    #[wasm_bindgen(js_name = uValues)]
    pub fn u_values(&self) -> Result<Vec<f32>, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        Ok(session.field().u().to_vec())
    }

    /// The v grid as a Float32Array copy.
    #[wasm_bindgen(js_name = vValues)]
    pub fn v_values(&self) -> Result<Vec<f32>, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        Ok(session.field().v().to_vec())
    }

    /// Both grids collapsed through the selected channel mix, one
    /// scalar in [0, 1] per cell, ready for palette lookup in JS.
    #[wasm_bindgen(js_name = mixedValues)]
    pub fn mixed_values(&self) -> Result<Vec<f32>, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        Ok(session.frame().mixed(self.palette))
    }

    /// Get field statistics as an object.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        serde_wasm_bindgen::to_value(&session.stats())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get the current settings as an object.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        serde_wasm_bindgen::to_value(&session.config())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Encode the restorable settings as a JSON record for storage.
    #[wasm_bindgen(js_name = saveRecord)]
    pub fn save_record(&self) -> Result<String, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        SessionRecord::from_config(&session.config(), self.palette)
            .encode()
            .map_err(|e| JsValue::from_str(&format!("Record error: {e}")))
    }

    /// Rebuild the session from a stored record.
    ///
    /// Rejects records from other format versions; the host falls
    /// back to defaults when that happens.
    #[wasm_bindgen(js_name = loadRecord)]
    pub fn load_record(&mut self, json: &str) -> Result<(), JsValue> {
        let record = SessionRecord::decode(json)
            .map_err(|e| JsValue::from_str(&format!("Invalid record: {e}")))?;
        let session =
            Session::with_rng_seed(&record.to_config(), entropy_from_js()).map_err(to_js)?;
        self.session = Some(session);
        self.token = None;
        self.palette = record.palette;
        Ok(())
    }

    /// Get grid width.
    #[wasm_bindgen(js_name = getWidth)]
    pub fn get_width(&self) -> Result<usize, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        Ok(session.field().width())
    }

    /// Get grid height.
    #[wasm_bindgen(js_name = getHeight)]
    pub fn get_height(&self) -> Result<usize, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        Ok(session.field().height())
    }

    /// Get engine steps since the last (re-)seed.
    #[wasm_bindgen(js_name = getStep)]
    pub fn get_step(&self) -> Result<u64, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        Ok(session.steps_total())
    }

    /// True while ticks advance the field.
    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> Result<bool, JsValue> {
        let session = self.session.as_ref().ok_or_else(not_initialized)?;
        Ok(session.is_running())
    }
}

fn not_initialized() -> JsValue {
    JsValue::from_str(&SessionError::NotInitialized.to_string())
}

fn to_js(err: SessionError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Validate JS-number dimensions before casting.
fn checked_dimensions(width: f64, height: f64) -> Result<(usize, usize), JsValue> {
    for d in [width, height] {
        if !d.is_finite() || d <= 0.0 || d.fract() != 0.0 {
            return Err(JsValue::from_str(&ConfigError::InvalidDimensions.to_string()));
        }
    }
    Ok((width as usize, height as usize))
}

/// Pack two `Math.random()` draws into one 64-bit seed.
fn entropy_from_js() -> u64 {
    let r1 = js_sys::Math::random();
    let r2 = js_sys::Math::random();
    ((r1 * u32::MAX as f64) as u64) << 32 | (r2 * u32::MAX as f64) as u64
}
