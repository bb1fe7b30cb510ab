//! MCP gateway for git
//!
//! This crate exposes a fixed set of git operations as Model Context
//! Protocol tools. Clients talk JSON-RPC 2.0, one message per line, over the
//! process's stdin and stdout; every tool call becomes a single `git`
//! invocation (two for a commit that stages first) in the requested
//! repository.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC lines on stdio)
//!        v
//! [ transport ] -> [ server ] -> [ handlers ] -> [ gitgate-exec ]
//!                                                      |
//!                                                      v
//!                                               [ git process ]
//! ```
//!
//! # Tools
//!
//! `git_status`, `git_branch`, `git_commit`, `git_push`, `git_pull`,
//! `git_log` and `git_add`. See [`tools::get_tool_definitions`] for the
//! advertised schemas.

pub mod args;
pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use config::{GatewayConfig, GitConfig};
pub use error::{Error, Result};
pub use server::GatewayServer;
pub use tools::{ToolDefinition, ToolName, ToolRegistry, ToolResult};
pub use transport::{ServeStats, StdioTransport, serve};
