//! Per-connection JSON-RPC session.
//!
//! Decodes one inbound frame, routes it to the server and encodes the
//! answer. Nothing here touches I/O, so the same session logic serves every
//! transport and can be tested frame by frame.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::codec::Frame;
use crate::core::McpServer;
use crate::core::dispatch::DispatchError;
use crate::core::protocol::{
    CallToolParams, InitializeParams, JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse,
    ReadResourceParams, methods,
};

/// JSON-RPC session over one connection.
#[derive(Debug, Clone)]
pub struct McpSession {
    server: McpServer,
}

impl McpSession {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &McpServer {
        &self.server
    }

    /// Handle one line from the codec.
    ///
    /// A rejected line is answered with a decode error under a null id.
    pub async fn handle(&self, frame: Frame) -> Option<JsonRpcResponse> {
        match frame {
            Frame::Message(line) => self.handle_frame(line.as_bytes()).await,
            Frame::Rejected(reason) => Some(error_response(Value::Null, DispatchError::parse(reason))),
        }
    }

    /// Handle one raw frame.
    ///
    /// Returns the response to write back, or `None` for notifications and
    /// inbound responses, which are never answered.
    pub async fn handle_frame(&self, frame: &[u8]) -> Option<JsonRpcResponse> {
        match serde_json::from_slice::<Value>(frame) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!("Dropping unparseable frame: {}", e);
                Some(error_response(Value::Null, DispatchError::parse(e.to_string())))
            }
        }
    }

    /// Handle one decoded message.
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        let Value::Object(object) = message else {
            return Some(error_response(
                Value::Null,
                DispatchError::invalid_request("message must be a JSON object"),
            ));
        };

        // The id is read before full decoding so that a malformed request
        // can still be answered under its own id.
        let id = object.get("id").cloned();
        if id.as_ref().is_some_and(|id| !is_valid_id(id)) {
            return Some(error_response(
                Value::Null,
                DispatchError::invalid_request("id must be a string, a number or null"),
            ));
        }

        if !object.contains_key("method") {
            if object.contains_key("result") || object.contains_key("error") {
                debug!("Ignoring inbound response for id {:?}", id);
                return None;
            }
            return Some(error_response(
                id.unwrap_or(Value::Null),
                DispatchError::invalid_request("missing method"),
            ));
        }

        let request: JsonRpcRequest = match serde_json::from_value(Value::Object(object)) {
            Ok(request) => request,
            Err(e) => {
                return Some(error_response(
                    id.unwrap_or(Value::Null),
                    DispatchError::invalid_request(e.to_string()),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let err = DispatchError::invalid_request(format!(
                "unsupported jsonrpc version {:?}",
                request.jsonrpc
            ));
            return match id {
                Some(id) => Some(error_response(id, err)),
                None => {
                    warn!("Ignoring notification: {}", err);
                    None
                }
            };
        }

        let Some(id) = id else {
            self.handle_notification(&request.method);
            return None;
        };

        let response = match self.handle_request(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => error_response(id, e),
        };
        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        if method.starts_with(methods::NOTIFICATION_PREFIX) {
            debug!("Notification received: {}", method);
        } else {
            warn!("Ignoring unknown notification: {}", method);
        }
    }

    #[instrument(skip(self, params))]
    async fn handle_request(&self, method: &str, params: Option<Value>) -> Result<Value, DispatchError> {
        match method {
            methods::INITIALIZE => {
                let params: InitializeParams = decode_params_or_default(params)?;
                encode(self.server.initialize(&params))
            }
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => encode(self.server.list_tools()),
            methods::TOOLS_CALL => {
                let params = decode_call_params(params)?;
                encode(self.server.call_tool(&params.name, params.arguments).await?)
            }
            methods::RESOURCES_LIST => encode(self.server.list_resources()),
            methods::RESOURCES_READ => {
                let params: ReadResourceParams = decode_params(params)?;
                encode(self.server.read_resource(&params.uri).await?)
            }
            methods::RESOURCES_TEMPLATES_LIST => Ok(json!({ "resourceTemplates": [] })),
            other => Err(DispatchError::MethodNotFound(other.to_string())),
        }
    }
}

fn error_response(id: Value, err: DispatchError) -> JsonRpcResponse {
    JsonRpcResponse::failure(id, err.to_rpc_error())
}

fn is_valid_id(id: &Value) -> bool {
    matches!(id, Value::String(_) | Value::Number(_) | Value::Null)
}

fn encode<T: Serialize>(result: T) -> Result<Value, DispatchError> {
    serde_json::to_value(result).map_err(|e| DispatchError::encode(e.to_string()))
}

fn decode_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, DispatchError> {
    let params = params.ok_or_else(|| DispatchError::invalid_params("missing params"))?;
    serde_json::from_value(params).map_err(|e| DispatchError::invalid_params(e.to_string()))
}

fn decode_params_or_default<T: DeserializeOwned + Default>(
    params: Option<Value>,
) -> Result<T, DispatchError> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(params) => {
            serde_json::from_value(params).map_err(|e| DispatchError::invalid_params(e.to_string()))
        }
    }
}

/// Decode `tools/call` params. Non-object arguments are an argument error
/// for the named tool rather than a malformed request.
fn decode_call_params(params: Option<Value>) -> Result<CallToolParams, DispatchError> {
    let params = params.ok_or_else(|| DispatchError::invalid_params("missing params"))?;

    let bad_arguments = params
        .get("arguments")
        .is_some_and(|a| !matches!(a, Value::Object(_) | Value::Null));
    if bad_arguments {
        let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
        return Err(DispatchError::invalid_arguments(name, "arguments must be an object"));
    }

    serde_json::from_value(params).map_err(|e| DispatchError::invalid_params(e.to_string()))
}
