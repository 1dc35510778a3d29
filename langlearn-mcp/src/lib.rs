//! MCP server exposing the synthesis operations as tools over stdio.
//!
//! Failures never surface as protocol errors: every tool call returns a
//! result, and failed calls carry `{"error": <kind>, "message": <text>}`
//! with `is_error` set.

use std::sync::Arc;

use langlearn_core::params::{
    BatchParams, PairBatchParams, PairParams, SynthesizeParams, VoicesParams,
};
use langlearn_core::{BatchReport, TtsError, TtsService};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

pub const TOOL_SYNTHESIZE: &str = "synthesize";
pub const TOOL_SYNTHESIZE_PAIR: &str = "synthesize_pair";
pub const TOOL_SYNTHESIZE_BATCH: &str = "synthesize_batch";
pub const TOOL_SYNTHESIZE_PAIR_BATCH: &str = "synthesize_pair_batch";
pub const TOOL_LIST_VOICES: &str = "list_voices";

const INSTRUCTIONS: &str = "Creates MP3 audio for language learning with AWS Polly. \
Use synthesize_pair for a native phrase followed by its translation, and the batch \
tools for vocabulary lists. Every tool returns the written file paths.";

/// A failed tool call, reported to the client as a normal tool result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolError {
    pub kind: &'static str,
    pub message: String,
}

impl ToolError {
    pub fn payload(&self) -> Value {
        json!({ "error": self.kind, "message": self.message })
    }
}

impl From<TtsError> for ToolError {
    fn from(e: TtsError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct LanglearnServer {
    service: Arc<TtsService>,
}

impl LanglearnServer {
    pub fn new(service: TtsService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<SynthesizeParams>(
                TOOL_SYNTHESIZE,
                "Synthesize one text to an MP3 file and return its path",
            ),
            tool::<PairParams>(
                TOOL_SYNTHESIZE_PAIR,
                "Synthesize two texts, usually a phrase and its translation, into one MP3 \
                 with a pause between them",
            ),
            tool::<BatchParams>(
                TOOL_SYNTHESIZE_BATCH,
                "Synthesize a list of texts, one file each or merged into a single file",
            ),
            tool::<PairBatchParams>(
                TOOL_SYNTHESIZE_PAIR_BATCH,
                "Synthesize a list of [first, second] pairs, one file each or merged",
            ),
            tool::<VoicesParams>(
                TOOL_LIST_VOICES,
                "List available voices, optionally filtered by language code",
            ),
        ]
    }

    /// Run one tool. The `Ok` value is the JSON returned to the client.
    pub async fn dispatch(&self, name: &str, arguments: JsonObject) -> Result<Value, ToolError> {
        let service = &self.service;
        match name {
            TOOL_SYNTHESIZE => to_json(&service.synthesize(parse(arguments)?).await?),
            TOOL_SYNTHESIZE_PAIR => to_json(&service.synthesize_pair(parse(arguments)?).await?),
            TOOL_SYNTHESIZE_BATCH => {
                batch_outcome(service.synthesize_batch(parse(arguments)?).await?)
            }
            TOOL_SYNTHESIZE_PAIR_BATCH => {
                batch_outcome(service.synthesize_pair_batch(parse(arguments)?).await?)
            }
            TOOL_LIST_VOICES => to_json(&service.voices(parse(arguments)?).await?),
            other => Err(ToolError {
                kind: "unknown_tool",
                message: format!("Unknown tool '{other}'"),
            }),
        }
    }
}

impl ServerHandler for LanglearnServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "langlearn-tts".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::Error> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: Self::tools(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::Error> {
        info!(tool = %request.name, "Tool call");
        let arguments = request.arguments.unwrap_or_default();

        Ok(match self.dispatch(&request.name, arguments).await {
            Ok(value) => CallToolResult::success(vec![Content::text(value.to_string())]),
            Err(e) => {
                warn!(tool = %request.name, kind = e.kind, "Tool failed: {}", e.message);
                CallToolResult::error(vec![Content::text(e.payload().to_string())])
            }
        })
    }
}

fn tool<T: JsonSchema>(name: &'static str, description: &'static str) -> Tool {
    let schema = serde_json::to_value(schemars::schema_for!(T))
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    Tool::new(name, description, Arc::new(schema))
}

fn parse<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments)).map_err(|e| ToolError {
        kind: "invalid_arguments",
        message: format!("Invalid arguments: {e}"),
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError {
        kind: "internal",
        message: e.to_string(),
    })
}

/// Partial batch failures are still a successful call; the report lists
/// them. A batch where nothing succeeded is an error.
fn batch_outcome(report: BatchReport) -> Result<Value, ToolError> {
    if report.is_total_failure() {
        let details = report
            .failures
            .iter()
            .map(|f| format!("item {}: {}", f.index + 1, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ToolError {
            kind: "batch_failed",
            message: format!("Every batch item failed: {details}"),
        });
    }
    to_json(&report)
}
