//! MCP Tool registry
//!
//! The fixed catalog of git tools, in the order they are listed to clients.
//!
//! | Tool | Purpose |
//! |------|---------|
//! | `git_status` | Working tree status |
//! | `git_branch` | List, create, delete or check out branches |
//! | `git_commit` | Commit, optionally staging everything first |
//! | `git_push` | Push to `origin` |
//! | `git_pull` | Pull from `origin` or the tracked upstream |
//! | `git_log` | Compact commit history |
//! | `git_add` | Stage files |
//!
//! Schemas are descriptive metadata only. Validation happens in
//! [`crate::args`], whose required-field lists the schemas mirror.

use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

/// Closed set of tools the gateway can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Status,
    Branch,
    Commit,
    Push,
    Pull,
    Log,
    Add,
}

impl ToolName {
    /// Every tool, in listing order.
    pub const ALL: [ToolName; 7] = [
        ToolName::Status,
        ToolName::Branch,
        ToolName::Commit,
        ToolName::Push,
        ToolName::Pull,
        ToolName::Log,
        ToolName::Add,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::Status => "git_status",
            ToolName::Branch => "git_branch",
            ToolName::Commit => "git_commit",
            ToolName::Push => "git_push",
            ToolName::Pull => "git_pull",
            ToolName::Log => "git_log",
            ToolName::Add => "git_add",
        }
    }

    /// Resolve a wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Names listed under the schema's `required` key.
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Result from a tool invocation
///
/// Always success-shaped: a failed git operation is described in the text.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
        }
    }
}

/// Immutable catalog built once at startup.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: get_tool_definitions(),
        }
    }

    /// All definitions in listing order.
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Resolve a listed tool by wire name.
    pub fn resolve(&self, name: &str) -> Option<ToolName> {
        let tool = ToolName::from_name(name)?;
        self.tools.iter().any(|def| def.name == name).then_some(tool)
    }
}

fn repo_path_property() -> Value {
    json!({
        "type": "string",
        "description": "The absolute path to the git repository"
    })
}

/// Definition of a single tool.
pub fn definition(tool: ToolName) -> ToolDefinition {
    let (description, input_schema) = match tool {
        ToolName::Status => (
            "Get the current git status of a repository",
            json!({
                "type": "object",
                "properties": {
                    "repo_path": repo_path_property()
                },
                "required": ["repo_path"]
            }),
        ),
        ToolName::Branch => (
            "List, create, or delete git branches",
            json!({
                "type": "object",
                "properties": {
                    "repo_path": repo_path_property(),
                    "action": {
                        "type": "string",
                        "enum": ["list", "create", "delete", "checkout"],
                        "description": "The branch operation to perform"
                    },
                    "branch_name": {
                        "type": "string",
                        "description": "The name of the branch (required for create, delete, checkout)"
                    }
                },
                "required": ["repo_path", "action"]
            }),
        ),
        ToolName::Commit => (
            "Create a git commit with the specified message",
            json!({
                "type": "object",
                "properties": {
                    "repo_path": repo_path_property(),
                    "message": {
                        "type": "string",
                        "description": "The commit message"
                    },
                    "add_all": {
                        "type": "boolean",
                        "description": "Whether to add all changed files before committing (git add -A)",
                        "default": false
                    }
                },
                "required": ["repo_path", "message"]
            }),
        ),
        ToolName::Push => (
            "Push commits to the remote repository",
            json!({
                "type": "object",
                "properties": {
                    "repo_path": repo_path_property(),
                    "branch": {
                        "type": "string",
                        "description": "The branch to push (optional, defaults to current branch)"
                    },
                    "force": {
                        "type": "boolean",
                        "description": "Whether to force push",
                        "default": false
                    }
                },
                "required": ["repo_path"]
            }),
        ),
        ToolName::Pull => (
            "Pull changes from the remote repository",
            json!({
                "type": "object",
                "properties": {
                    "repo_path": repo_path_property(),
                    "branch": {
                        "type": "string",
                        "description": "The branch to pull (optional, defaults to current branch)"
                    }
                },
                "required": ["repo_path"]
            }),
        ),
        ToolName::Log => (
            "Show git commit history",
            json!({
                "type": "object",
                "properties": {
                    "repo_path": repo_path_property(),
                    "limit": {
                        "type": "integer",
                        "description": "Number of commits to show",
                        "default": 10
                    }
                },
                "required": ["repo_path"]
            }),
        ),
        ToolName::Add => (
            "Stage files for commit",
            json!({
                "type": "object",
                "properties": {
                    "repo_path": repo_path_property(),
                    "files": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of files to add (use ['.'] to add all)"
                    }
                },
                "required": ["repo_path", "files"]
            }),
        ),
    };

    ToolDefinition {
        name: tool.as_str().to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.into_iter().map(definition).collect()
}
