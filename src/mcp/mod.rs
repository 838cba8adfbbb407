//! MCP tool server
//!
//! Exposes probes, key validation, config generation and the deployment
//! backends as JSON-RPC tools over stdio, bypassing the wizard.

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use server::{serve_stdio, McpServer, SERVER_NAME};
pub use tools::{Tool, ToolRegistry};
