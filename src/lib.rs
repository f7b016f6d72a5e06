mod clock;
#[cfg(test)]
mod fixtures;
pub mod matching;
mod pairer;
pub mod policy;
pub mod precomp;
mod report;
pub mod standings;
pub mod types;
pub mod verify;

pub use pairer::cop_pair;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Pair one round from a JSON `PairRequest`, returning the JSON `PairResponse`
#[wasm_bindgen]
pub fn pair(request_json: &str) -> Result<String, JsValue> {
    let req: PairRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Request parse error: {}", e)))?;
    let resp = cop_pair(&req);
    if resp.error_code != PairErrorCode::Success {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{}: {}",
            resp.error_code, resp.error_message
        )));
    }
    serde_json::to_string(&resp).map_err(|e| JsValue::from_str(&format!("Response encode error: {}", e)))
}

/// Get default request as JSON
#[wasm_bindgen]
pub fn default_request() -> String {
    serde_json::to_string(&PairRequest::default()).unwrap_or_default()
}
