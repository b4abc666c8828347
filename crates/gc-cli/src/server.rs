use std::sync::Arc;

use gc_core::{Cell, Direction, LatLng, Session, TransferReport, WorldError};
use gc_store::Store;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct GeocoinServer {
    session: Arc<Mutex<Session<Store>>>,
    tool_router: ToolRouter<Self>,
}

impl GeocoinServer {
    pub fn new(session: Session<Store>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result(value: &serde_json::Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

/// Caller mistakes become `invalid_params`; only a failing store is internal.
fn tool_error(err: WorldError) -> McpError {
    match err {
        WorldError::Storage(msg) => McpError::internal_error(msg, None),
        other => McpError::invalid_params(other.to_string(), None),
    }
}

fn transfer_json(outcome: gc_core::Result<TransferReport>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(report) => Ok(json_result(&serde_json::json!({
            "moved": true,
            "coin": report.coin.to_string(),
            "status": report.status,
        }))),
        Err(err @ WorldError::EmptyStack(_)) => Ok(json_result(&serde_json::json!({
            "moved": false,
            "reason": err.to_string(),
        }))),
        Err(err) => Err(tool_error(err)),
    }
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct MoveRequest {
    /// One of north, south, east, west (or n, s, e, w)
    direction: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LocateRequest {
    /// Latitude in degrees
    lat: f64,
    /// Longitude in degrees
    lng: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CellRequest {
    /// Row index of the cache's cell
    i: i32,
    /// Column index of the cache's cell
    j: i32,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SensorRequest {
    /// "toggle" to flip tracking on or off, "stop" to make sure it is off
    action: String,
}

#[tool_router]
impl GeocoinServer {
    #[tool(
        description = "Describe the player's surroundings: position, cell, sensor mode, wallet, and every cache in view with its coin count."
    )]
    async fn gc_look(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let caches = session.visible_caches().map_err(tool_error)?;
        let caches: Vec<serde_json::Value> = caches
            .iter()
            .map(|cache| {
                serde_json::json!({
                    "cell": cache.cell(),
                    "coins": cache.len(),
                    "top": cache.top().map(ToString::to_string),
                })
            })
            .collect();
        Ok(json_result(&serde_json::json!({
            "status": session.status(),
            "caches": caches,
        })))
    }

    #[tool(description = "Move one tile north, south, east or west. Refused while the sensor is tracking.")]
    async fn gc_move(
        &self,
        Parameters(req): Parameters<MoveRequest>,
    ) -> Result<CallToolResult, McpError> {
        let direction: Direction = req
            .direction
            .parse()
            .map_err(|e: String| McpError::invalid_params(e, None))?;
        let mut session = self.session.lock().await;
        let status = session.step(direction).map_err(tool_error)?;
        Ok(json_result(&serde_json::json!({ "status": status })))
    }

    #[tool(description = "Apply a position fix, as a location sensor would. The coordinate is kept verbatim.")]
    async fn gc_locate(
        &self,
        Parameters(req): Parameters<LocateRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let status = session
            .locate(LatLng::new(req.lat, req.lng))
            .map_err(tool_error)?;
        Ok(json_result(&serde_json::json!({ "status": status })))
    }

    #[tool(
        description = "Take the top coin of the cache in cell (i, j) into the wallet. The cell must be in view. An empty cache moves nothing and reports moved=false."
    )]
    async fn gc_collect(
        &self,
        Parameters(req): Parameters<CellRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        transfer_json(session.collect(Cell::new(req.i, req.j)))
    }

    #[tool(
        description = "Put the wallet's top coin onto the cache in cell (i, j). The cell must be in view. An empty wallet moves nothing and reports moved=false."
    )]
    async fn gc_deposit(
        &self,
        Parameters(req): Parameters<CellRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        transfer_json(session.deposit(Cell::new(req.i, req.j)))
    }

    #[tool(description = "Toggle or stop sensor tracking. Manual moves are only allowed while it is idle.")]
    async fn gc_sensor(
        &self,
        Parameters(req): Parameters<SensorRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        match req.action.to_lowercase().as_str() {
            "toggle" => {
                session.toggle_sensor();
            }
            "stop" => {
                session.stop_sensor();
            }
            other => {
                return Err(McpError::invalid_params(
                    format!("action must be 'toggle' or 'stop', got '{other}'"),
                    None,
                ));
            }
        }
        Ok(json_result(&serde_json::json!({
            "sensor": session.tracker().sensor_mode(),
        })))
    }

    #[tool(description = "Forget all progress: back to the start, empty wallet, every cache regenerated.")]
    async fn gc_reset(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let status = session.reset().map_err(tool_error)?;
        Ok(json_result(&serde_json::json!({ "status": status })))
    }
}

#[tool_handler]
impl ServerHandler for GeocoinServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "A tile-based world of coin caches around the player.\n\n\
                 Call gc_look first to see the player's cell and the caches in view. \
                 Cells are addressed by integer (i, j): i grows northward, j eastward. \
                 Use gc_move or gc_locate to travel, gc_collect and gc_deposit to move \
                 coins between a cache and the wallet one at a time (last in, first out). \
                 Every change is saved immediately; gc_reset discards all progress."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
