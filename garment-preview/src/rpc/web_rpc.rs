use crate::engine::compositing::preview_sync::{PreviewBindings, bind_logo};
use crate::engine::compositing::texture_binding::unbind_image;
use crate::engine::garment::preview_state::RenderMode;
use crate::session::catalog::StaticCatalog;
use crate::session::controller::DesignSession;
use crate::session::design_store::DesignStore;
use crate::session::error::{DesignFetchError, SessionError, UploadSubmissionFailure};
use crate::session::form::DesignFormPatch;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use texture_compositor::source::decode_data_url;
use texture_compositor::{ColorValue, DefaultSourceLoader, ImageSource, SideKey, TemplateOverride};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// Application-defined error code for failures the host may retry.
const SERVER_ERROR: i32 = -32000;

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    #[cfg(test)]
    pub fn notification_methods(&self) -> impl Iterator<Item = &str> + '_ {
        self.outgoing_notifications.iter().map(|n| n.method.as_str())
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Resources the RPC methods read and write.
#[derive(SystemParam)]
struct RpcTargets<'w> {
    session: ResMut<'w, DesignSession>,
    bindings: ResMut<'w, PreviewBindings>,
    images: ResMut<'w, Assets<Image>>,
    catalog: Res<'w, StaticCatalog>,
    store: Option<ResMut<'w, DesignStore>>,
    diagnostics: Res<'w, DiagnosticsStore>,
}

/// Borrowed view of the app state handed to each RPC method.
pub struct RpcContext<'a> {
    pub session: &'a mut DesignSession,
    pub bindings: &'a mut PreviewBindings,
    pub images: &'a mut Assets<Image>,
    pub catalog: &'a StaticCatalog,
    pub store: Option<&'a mut DesignStore>,
    pub rpc: &'a mut WebRpcInterface,
    pub fps: f32,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut targets: RpcTargets,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                rpc_interface.send_notification(
                    "debug_message",
                    json!({ "message": format!("Processing method: {}", request.method) }),
                );

                let fps = targets
                    .diagnostics
                    .get(&FrameTimeDiagnosticsPlugin::FPS)
                    .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
                    .unwrap_or(0.0) as f32;
                let mut context = RpcContext {
                    session: &mut targets.session,
                    bindings: &mut targets.bindings,
                    images: &mut targets.images,
                    catalog: &targets.catalog,
                    store: targets.store.as_deref_mut(),
                    rpc: &mut rpc_interface,
                    fps,
                };

                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    json!({ "message": format!("Parse error: {}", parse_error) }),
                );
            }
        }
    }
}

/// Run one request. Notifications (no id) are executed but get no response.
pub fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let params = &request.params;
    let result = match request.method.as_str() {
        "set_side_image" => handle_set_side_image(params, context),
        "clear_side_image" => handle_clear_side_image(params, context),
        "set_base_color" => handle_set_base_color(params, context),
        "select_color" => handle_select_color(params, context),
        "set_reference_overlay" => handle_set_reference_overlay(params, context),
        "set_template_override" => handle_set_template_override(params, context),
        "set_form" => handle_set_form(params, context),
        "set_logo" => handle_set_logo(params, context),
        "set_render_mode" => handle_set_render_mode(params, context),
        "save_design" => handle_save_design(context),
        "load_design" => handle_load_design(params, context),
        "get_fps" => Ok(json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(json!({ "method": request.method })),
            ));
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn parse_params<T: for<'de> Deserialize<'de>>(params: &Value, expected: &str) -> Result<T, RpcError> {
    serde_json::from_value(params.clone()).map_err(|_| RpcError::invalid_params(expected))
}

fn parse_side(side: &str) -> Result<SideKey, RpcError> {
    side.parse()
        .map_err(|_| RpcError::invalid_params(&format!("Unknown side: {side}")))
}

#[derive(Deserialize)]
struct SideParams {
    side: String,
}

fn handle_set_side_image(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct SetSideImageParams {
        side: String,
        source: String,
    }

    let parsed: SetSideImageParams =
        parse_params(params, "Expected 'side' and 'source' parameters")?;
    let side = parse_side(&parsed.side)?;
    let source = ImageSource::from_url(&parsed.source);
    if source.is_empty() {
        return Err(RpcError::invalid_params("'source' must not be empty"));
    }

    info!("{} artwork: {}", side, source.describe());
    context.session.set_side_image(side, source);
    Ok(json!({ "success": true, "side": side.as_str() }))
}

fn handle_clear_side_image(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    let parsed: SideParams = parse_params(params, "Expected 'side' parameter")?;
    let side = parse_side(&parsed.side)?;
    context.session.clear_side_image(side);
    Ok(json!({ "success": true, "side": side.as_str() }))
}

fn handle_set_base_color(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct BaseColorParams {
        hex: String,
    }

    let parsed: BaseColorParams = parse_params(params, "Expected 'hex' parameter")?;
    let color = ColorValue::new(parsed.hex);
    // Unparseable colours still apply; the compositor draws them as black.
    let valid = color.parse().is_some();
    if !valid {
        warn!("Base colour '{}' is not a colour, drawing black", color.as_str());
    }
    context.session.set_base_color(color);
    Ok(json!({ "success": true, "valid": valid }))
}

fn handle_select_color(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct SelectColorParams {
        color_id: String,
    }

    let parsed: SelectColorParams = parse_params(params, "Expected 'color_id' parameter")?;
    context
        .session
        .select_color(&parsed.color_id, context.catalog)
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;
    Ok(json!({
        "success": true,
        "hex_code": context.session.base_color().as_str(),
    }))
}

fn handle_set_reference_overlay(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct OverlayParams {
        enabled: bool,
    }

    let parsed: OverlayParams = parse_params(params, "Expected 'enabled' parameter")?;
    context.session.set_reference_overlay(parsed.enabled);
    Ok(json!({ "success": true, "enabled": parsed.enabled }))
}

#[derive(Deserialize)]
struct DataUrlParams {
    data_url: Option<String>,
}

fn handle_set_template_override(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    let parsed: DataUrlParams = parse_params(params, "Expected 'data_url' parameter")?;
    let template_override = match parsed.data_url.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(url) => {
            let bytes =
                decode_data_url(url).map_err(|e| RpcError::invalid_params(&e.to_string()))?;
            Some(TemplateOverride::new(bytes))
        }
    };

    let active = template_override.is_some();
    context.session.set_template_override(template_override);
    Ok(json!({ "success": true, "active": active }))
}

fn handle_set_form(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    let patch: DesignFormPatch = parse_params(params, "Expected design form fields")?;
    patch.apply(context.session.form_mut());
    serde_json::to_value(context.session.form())
        .map_err(|e| RpcError::internal_error(&e.to_string()))
}

fn handle_set_logo(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    let parsed: DataUrlParams = parse_params(params, "Expected 'data_url' parameter")?;
    let logo = parsed
        .data_url
        .map(|url| ImageSource::from_url(&url))
        .filter(|source| !source.is_empty());

    // Bind first so an unreadable logo leaves the current one in place.
    bind_logo(
        context.images,
        context.bindings,
        logo.as_ref(),
        &DefaultSourceLoader,
    )
    .map_err(|e| RpcError::invalid_params(&e.to_string()))?;

    let active = logo.is_some();
    context.session.set_logo(logo);
    Ok(json!({ "success": true, "active": active }))
}

fn handle_set_render_mode(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct RenderModeParams {
        mode: String,
    }

    let parsed: RenderModeParams = parse_params(params, "Expected 'mode' parameter")?;
    let mode: RenderMode = parsed
        .mode
        .parse()
        .map_err(|e: String| RpcError::invalid_params(&e))?;
    context.bindings.mode = mode;
    Ok(json!({ "success": true, "mode": mode }))
}

fn handle_save_design(context: &mut RpcContext) -> Result<Value, RpcError> {
    let submission = context.session.build_submission().map_err(|e| match e {
        SessionError::InvalidForm(_) => RpcError::invalid_params(&e.to_string()),
        SessionError::CompositeNotReady => RpcError::retryable(&e.to_string()),
        _ => RpcError::internal_error(&e.to_string()),
    })?;

    let store = context
        .store
        .as_deref_mut()
        .ok_or_else(|| RpcError::retryable("Design store is not ready yet"))?;
    let record = store.0.submit(&submission).map_err(RpcError::from)?;

    context.session.apply_saved(&record);
    info!("Design {} saved", record.id);
    context.rpc.send_notification(
        "design_saved",
        json!({ "design_id": record.id, "image_url": record.image_url }),
    );
    serde_json::to_value(&record).map_err(|e| RpcError::internal_error(&e.to_string()))
}

fn handle_load_design(params: &Value, context: &mut RpcContext) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct LoadDesignParams {
        design_id: String,
    }

    let parsed: LoadDesignParams = parse_params(params, "Expected 'design_id' parameter")?;
    let store = context
        .store
        .as_deref()
        .ok_or_else(|| RpcError::retryable("Design store is not ready yet"))?;
    let record = store.0.fetch(&parsed.design_id).map_err(RpcError::from)?;

    let result =
        serde_json::to_value(&record).map_err(|e| RpcError::internal_error(&e.to_string()))?;
    context.session.rehydrate(record, context.catalog);
    // The previous design's composite and logo must not outlive it on the garment.
    unbind_image(context.images, &mut context.bindings.composite);
    unbind_image(context.images, &mut context.bindings.logo);
    Ok(result)
}

/// Create standardized error response with optional data payload.
fn create_error_response(id: Value, code: i32, message: &str, data: Option<Value>) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    if rpc_interface.outgoing_notifications.is_empty() && rpc_interface.outgoing_responses.is_empty() {
        return;
    }

    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Responses after notifications to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn retryable(message: &str) -> Self {
        Self {
            code: SERVER_ERROR,
            message: message.to_string(),
            data: Some(json!({ "retryable": true })),
        }
    }
}

impl From<UploadSubmissionFailure> for RpcError {
    fn from(failure: UploadSubmissionFailure) -> Self {
        Self {
            code: SERVER_ERROR,
            message: failure.message,
            data: Some(json!({ "retryable": failure.retryable })),
        }
    }
}

impl From<DesignFetchError> for RpcError {
    fn from(error: DesignFetchError) -> Self {
        let retryable = matches!(error, DesignFetchError::Unreachable(_));
        Self {
            code: SERVER_ERROR,
            message: error.to_string(),
            data: Some(json!({ "retryable": retryable })),
        }
    }
}
