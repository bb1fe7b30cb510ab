//! Typed tool arguments
//!
//! Raw `arguments` objects are validated once here. A handler only ever sees
//! a complete record; anything missing or malformed becomes an
//! [`ArgumentError`] whose text is shown to the client after `Error: `.
//!
//! Empty strings and empty lists count as missing.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::tools::ToolName;

/// Default number of entries returned by `git_log`.
pub const DEFAULT_LOG_LIMIT: u32 = 10;

/// Why a tool's arguments were rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("{}", describe_missing(.fields))]
    MissingRequired { fields: &'static [&'static str] },

    #[error("branch_name is required for {action} action")]
    MissingBranchName { action: &'static str },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid arguments: {0}")]
    Invalid(String),
}

fn describe_missing(fields: &[&str]) -> String {
    match fields {
        [single] => format!("{single} is required"),
        [init @ .., last] => format!("{} and {last} are required", init.join(", ")),
        [] => "arguments are required".to_string(),
    }
}

/// A validated argument record for one tool.
pub trait ToolArgs: Sized {
    /// Fields that must be present and non-empty.
    const REQUIRED: &'static [&'static str];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError>;

    fn missing() -> ArgumentError {
        ArgumentError::MissingRequired {
            fields: Self::REQUIRED,
        }
    }
}

/// Required fields for `tool`, as enforced before any command runs.
pub fn required_fields(tool: ToolName) -> &'static [&'static str] {
    match tool {
        ToolName::Status => StatusArgs::REQUIRED,
        ToolName::Branch => BranchArgs::REQUIRED,
        ToolName::Commit => CommitArgs::REQUIRED,
        ToolName::Push => PushArgs::REQUIRED,
        ToolName::Pull => PullArgs::REQUIRED,
        ToolName::Log => LogArgs::REQUIRED,
        ToolName::Add => AddArgs::REQUIRED,
    }
}

/// Deserialize the loose argument object. Absent arguments behave like `{}`.
fn raw<T: DeserializeOwned + Default>(arguments: Value) -> Result<T, ArgumentError> {
    match arguments {
        Value::Null => Ok(T::default()),
        value => serde_json::from_value(value).map_err(|e| ArgumentError::Invalid(e.to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusArgs {
    pub repo_path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRepoOnly {
    repo_path: Option<String>,
}

impl ToolArgs for StatusArgs {
    const REQUIRED: &'static [&'static str] = &["repo_path"];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError> {
        let raw: RawRepoOnly = raw(arguments)?;
        let repo_path = non_empty(raw.repo_path).ok_or_else(Self::missing)?;
        Ok(Self { repo_path })
    }
}

/// Branch operation with its branch name where one is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchAction {
    List,
    Create(String),
    Delete(String),
    Checkout(String),
}

impl BranchAction {
    pub fn name(&self) -> &'static str {
        match self {
            BranchAction::List => "list",
            BranchAction::Create(_) => "create",
            BranchAction::Delete(_) => "delete",
            BranchAction::Checkout(_) => "checkout",
        }
    }

    fn parse(action: &str, branch_name: Option<String>) -> Result<Self, ArgumentError> {
        let (action, build): (&'static str, fn(String) -> BranchAction) = match action {
            "list" => return Ok(BranchAction::List),
            "create" => ("create", BranchAction::Create),
            "delete" => ("delete", BranchAction::Delete),
            "checkout" => ("checkout", BranchAction::Checkout),
            other => return Err(ArgumentError::UnknownAction(other.to_string())),
        };
        let branch_name = branch_name.ok_or(ArgumentError::MissingBranchName { action })?;
        Ok(build(branch_name))
    }
}

impl fmt::Display for BranchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchArgs {
    pub repo_path: String,
    pub action: BranchAction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBranch {
    repo_path: Option<String>,
    action: Option<String>,
    branch_name: Option<String>,
}

impl ToolArgs for BranchArgs {
    const REQUIRED: &'static [&'static str] = &["repo_path", "action"];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError> {
        let raw: RawBranch = raw(arguments)?;
        let (Some(repo_path), Some(action)) = (non_empty(raw.repo_path), non_empty(raw.action))
        else {
            return Err(Self::missing());
        };
        let action = BranchAction::parse(&action, non_empty(raw.branch_name))?;
        Ok(Self { repo_path, action })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitArgs {
    pub repo_path: String,
    pub message: String,
    pub add_all: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCommit {
    repo_path: Option<String>,
    message: Option<String>,
    add_all: Option<bool>,
}

impl ToolArgs for CommitArgs {
    const REQUIRED: &'static [&'static str] = &["repo_path", "message"];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError> {
        let raw: RawCommit = raw(arguments)?;
        let (Some(repo_path), Some(message)) = (non_empty(raw.repo_path), non_empty(raw.message))
        else {
            return Err(Self::missing());
        };
        Ok(Self {
            repo_path,
            message,
            add_all: raw.add_all.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushArgs {
    pub repo_path: String,
    pub branch: Option<String>,
    pub force: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPush {
    repo_path: Option<String>,
    branch: Option<String>,
    force: Option<bool>,
}

impl ToolArgs for PushArgs {
    const REQUIRED: &'static [&'static str] = &["repo_path"];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError> {
        let raw: RawPush = raw(arguments)?;
        let repo_path = non_empty(raw.repo_path).ok_or_else(Self::missing)?;
        Ok(Self {
            repo_path,
            branch: non_empty(raw.branch),
            force: raw.force.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullArgs {
    pub repo_path: String,
    pub branch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPull {
    repo_path: Option<String>,
    branch: Option<String>,
}

impl ToolArgs for PullArgs {
    const REQUIRED: &'static [&'static str] = &["repo_path"];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError> {
        let raw: RawPull = raw(arguments)?;
        let repo_path = non_empty(raw.repo_path).ok_or_else(Self::missing)?;
        Ok(Self {
            repo_path,
            branch: non_empty(raw.branch),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogArgs {
    pub repo_path: String,
    pub limit: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLog {
    repo_path: Option<String>,
    limit: Option<u32>,
}

impl ToolArgs for LogArgs {
    const REQUIRED: &'static [&'static str] = &["repo_path"];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError> {
        let raw: RawLog = raw(arguments)?;
        let repo_path = non_empty(raw.repo_path).ok_or_else(Self::missing)?;
        Ok(Self {
            repo_path,
            limit: raw.limit.unwrap_or(DEFAULT_LOG_LIMIT),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    pub repo_path: String,
    /// Paths to stage; `["."]` stages everything.
    pub files: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAdd {
    repo_path: Option<String>,
    files: Option<Vec<String>>,
}

impl ToolArgs for AddArgs {
    const REQUIRED: &'static [&'static str] = &["repo_path", "files"];

    fn from_arguments(arguments: Value) -> Result<Self, ArgumentError> {
        let raw: RawAdd = raw(arguments)?;
        let files = raw.files.filter(|files| !files.is_empty());
        let (Some(repo_path), Some(files)) = (non_empty(raw.repo_path), files) else {
            return Err(Self::missing());
        };
        Ok(Self { repo_path, files })
    }
}
