//! Stdio MCP server
//!
//! Reads newline-delimited JSON-RPC messages and writes one response line per
//! request. Notifications get no response. Logging goes to stderr, so stdout
//! carries nothing but protocol traffic.

use super::protocol::{
    InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ResourceReadParams,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolCallResult, ToolDescriptor,
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION,
};
use super::resources::{list_resources, read_resource};
use super::tools::{Tool, ToolRegistry};
use crate::config::AppConfig;
use crate::deploy::Deployer;
use crate::error::Result;
use crate::llm::HttpKeyValidator;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub const SERVER_NAME: &str = "openclaw-easy-deploy";

type MethodResult = std::result::Result<Value, JsonRpcError>;

pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Server backed by the real provider APIs, SSH and Docker
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let validator = Arc::new(HttpKeyValidator::new(config.endpoints.clone())?);
        let backend = Arc::new(Deployer::from_config(config)?);
        Ok(Self::new(ToolRegistry::new(config.clone(), validator, backend)))
    }

    /// Handle one raw line; returns the serialized response, if any
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
            )),
            Ok(value) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(value) {
                    Ok(request) => self.handle_message(request).await,
                    Err(e) => Some(JsonRpcResponse::failure(
                        id,
                        JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                    )),
                }
            }
        };

        response.and_then(|r| match serde_json::to_string(&r) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                None
            }
        })
    }

    /// Handle one parsed message; notifications yield `None`
    pub async fn handle_message(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return request.id.map(|id| {
                JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(INVALID_REQUEST, "Only JSON-RPC 2.0 is supported"),
                )
            });
        }

        let Some(id) = request.id else {
            debug!("Notification: {}", request.method);
            return None;
        };

        debug!("Request {}: {}", id, request.method);
        let outcome = self.dispatch(&request.method, request.params).await;
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> MethodResult {
        match method {
            "initialize" => to_result(&InitializeResult {
                protocol_version: PROTOCOL_VERSION,
                capabilities: ServerCapabilities {
                    tools: json!({}),
                    resources: json!({}),
                },
                server_info: ServerInfo {
                    name: SERVER_NAME,
                    version: env!("CARGO_PKG_VERSION"),
                },
            }),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(params).await,
            "resources/list" => Ok(json!({ "resources": list_resources() })),
            "resources/read" => {
                let params: ResourceReadParams = parse_params(params)?;
                match read_resource(&params.uri) {
                    Ok(Some(contents)) => Ok(json!({ "contents": [contents] })),
                    Ok(None) => Err(JsonRpcError::new(
                        INVALID_PARAMS,
                        format!("Unknown resource: {}", params.uri),
                    )),
                    Err(e) => Err(JsonRpcError::new(INTERNAL_ERROR, e.to_string())),
                }
            }
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn list_tools(&self) -> MethodResult {
        let tools = Tool::ALL
            .iter()
            .map(|tool| {
                Ok(ToolDescriptor {
                    name: tool.name(),
                    description: tool.description(),
                    input_schema: tool.input_schema()?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))?;
        Ok(json!({ "tools": tools }))
    }

    async fn call_tool(&self, params: Value) -> MethodResult {
        let params: ToolCallParams = parse_params(params)?;
        let tool = Tool::from_name(&params.name).ok_or_else(|| {
            JsonRpcError::new(INVALID_PARAMS, format!("Unknown tool: {}", params.name))
        })?;

        let result = match self.registry.call(tool, params.arguments).await {
            Ok(output) => match serde_json::to_string_pretty(&output) {
                Ok(text) => ToolCallResult::text(text, false),
                Err(e) => return Err(JsonRpcError::new(INTERNAL_ERROR, e.to_string())),
            },
            Err(e) => {
                info!("Tool {} rejected: {}", tool.name(), e);
                ToolCallResult::text(e.to_string(), true)
            }
        };
        to_result(&result)
    }

    /// Serve newline-delimited JSON-RPC until `reader` reaches end of input
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(line).await {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        debug!("Input closed, stopping MCP server");
        Ok(())
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> std::result::Result<T, JsonRpcError> {
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
}

fn to_result<T: serde::Serialize>(value: &T) -> MethodResult {
    serde_json::to_value(value).map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))
}

/// Run the MCP server over this process's stdin and stdout
pub async fn serve_stdio(config: &AppConfig) -> Result<()> {
    let server = McpServer::from_config(config)?;
    info!("MCP server {} listening on stdio", SERVER_NAME);
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
