//! CropZoom WASM - WebAssembly bindings for the CropZoom engine
//!
//! This crate exposes the cropzoom-core state machine to JavaScript/TypeScript
//! applications that render the image and recognize gestures themselves.
//!
//! # Module Structure
//!
//! - `cropzoom` - The engine handle, gesture entry points and render outputs
//! - `listener` - Adapter from a JS callbacks object to engine callbacks
//! - `types` - WASM-compatible wrapper types for crop results
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropZoom } from '@cropzoom/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const zoom = new JsCropZoom(
//!   { cropSize: { width: 300, height: 300 }, resolution: { width: 4000, height: 3000 } },
//!   { onUpdate: (state) => overlay.update(state) },
//! );
//! const crop = zoom.crop(1080);
//! console.log(`Crop ${crop.width}x${crop.height} at ${crop.origin_x},${crop.origin_y}`);
//! ```

use wasm_bindgen::prelude::*;

mod cropzoom;
mod listener;
mod types;

// Re-export public types
pub use cropzoom::JsCropZoom;
pub use types::JsCropDescriptor;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
