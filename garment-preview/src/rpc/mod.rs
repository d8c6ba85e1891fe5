//! JSON-RPC 2.0 bridge between the preview iframe and the host page.
//!
//! Messages travel over `postMessage`. Requests carry an id and get a
//! response with the same id; notifications carry none and get no answer.
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                          │
//!        ├─ Request (with ID) ────────────────────> │
//!        │ <─────────────────── Response (with ID) ─┤
//!        │ <──────────── Notification (no ID) ──────┤
//! ```
//!
//! ## Methods
//!
//! ### Artwork
//! - `set_side_image {side, source}`: `source` is a data URL, file path or `file://` URL
//! - `clear_side_image {side}`
//! - `set_template_override {data_url | null}`: pre-composited texture, bypasses zones
//! - `set_reference_overlay {enabled}`
//!
//! ### Colour and form
//! - `set_base_color {hex}`
//! - `select_color {color_id}`: catalog colour, also sets the form colour
//! - `set_form {…fields}`: partial update of the order form
//!
//! ### Preview
//! - `set_logo {data_url | null}`: artwork for decal mode
//! - `set_render_mode {mode}`: `full_texture` or `single_decal`
//!
//! ### Designs
//! - `save_design {}`: errors with code `-32000` carry `data.retryable`
//! - `load_design {design_id}`
//!
//! ### Diagnostics
//! - `get_fps`
//!
//! ## Notifications
//!
//! `composite_updated`, `compositor_unavailable`, `asset_warning`,
//! `design_saved`, `loading_state`, `fps_update` and `debug_message`.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000`: Save or load failed, see `data.retryable`

/// JSON-RPC 2.0 bidirectional communication system for host page integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
