//! MCP Tool Handlers
//!
//! Each handler receives a validated argument record, builds the git command
//! line, runs it through the [`Invoker`] and renders a human-readable
//! summary. Failures are rendered as `Error: ...` text; from the protocol's
//! point of view the call still succeeded.

use std::path::Path;

use gitgate_exec::{Invocation, Invoker};
use serde_json::Value;

use crate::args::{
    AddArgs, ArgumentError, BranchAction, BranchArgs, CommitArgs, LogArgs, PullArgs, PushArgs,
    StatusArgs, ToolArgs,
};
use crate::tools::ToolName;

/// What a handler needs to run git.
pub struct ToolContext<'a> {
    invoker: &'a dyn Invoker,
    git_program: &'a str,
}

impl<'a> ToolContext<'a> {
    pub fn new(invoker: &'a dyn Invoker, git_program: &'a str) -> Self {
        Self {
            invoker,
            git_program,
        }
    }

    /// Full command line: the git program followed by `args`.
    fn git<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(self.git_program.to_string())
            .chain(args.into_iter().map(Into::into))
            .collect()
    }

    async fn run(&self, command: Vec<String>, repo_path: &str) -> Invocation {
        let result = self.invoker.invoke(&command, Path::new(repo_path)).await;
        if !result.success {
            tracing::warn!(
                ?command,
                repo = %repo_path,
                reason = %result.failure_reason(),
                "git command failed"
            );
        }
        result
    }
}

/// Run `tool` with raw `arguments` and return the summary text.
///
/// Argument validation happens before anything is executed; a rejected call
/// never reaches the invoker.
pub async fn handle_tool_call(ctx: &ToolContext<'_>, tool: ToolName, arguments: Value) -> String {
    tracing::info!(tool = %tool, "Handling tool call");

    match dispatch(ctx, tool, arguments).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::info!(tool = %tool, error = %e, "Rejected tool arguments");
            format!("Error: {e}")
        }
    }
}

async fn dispatch(
    ctx: &ToolContext<'_>,
    tool: ToolName,
    arguments: Value,
) -> Result<String, ArgumentError> {
    Ok(match tool {
        ToolName::Status => git_status(ctx, StatusArgs::from_arguments(arguments)?).await,
        ToolName::Branch => git_branch(ctx, BranchArgs::from_arguments(arguments)?).await,
        ToolName::Commit => git_commit(ctx, CommitArgs::from_arguments(arguments)?).await,
        ToolName::Push => git_push(ctx, PushArgs::from_arguments(arguments)?).await,
        ToolName::Pull => git_pull(ctx, PullArgs::from_arguments(arguments)?).await,
        ToolName::Log => git_log(ctx, LogArgs::from_arguments(arguments)?).await,
        ToolName::Add => git_add(ctx, AddArgs::from_arguments(arguments)?).await,
    })
}

fn failure(result: &Invocation) -> String {
    format!("Error: {}", result.failure_reason())
}

/// First non-empty candidate, else `fallback`.
fn first_non_empty(candidates: &[&str], fallback: &str) -> String {
    candidates
        .iter()
        .find(|s| !s.is_empty())
        .copied()
        .unwrap_or(fallback)
        .to_string()
}

async fn git_status(ctx: &ToolContext<'_>, args: StatusArgs) -> String {
    let result = ctx.run(ctx.git(["status"]), &args.repo_path).await;
    if !result.success {
        return failure(&result);
    }
    format!("Git status for {}:\n{}", args.repo_path, result.stdout())
}

async fn git_branch(ctx: &ToolContext<'_>, args: BranchArgs) -> String {
    let command = match &args.action {
        BranchAction::List => ctx.git(["branch", "-a"]),
        BranchAction::Create(name) => ctx.git(["branch", name.as_str()]),
        BranchAction::Delete(name) => ctx.git(["branch", "-d", name.as_str()]),
        BranchAction::Checkout(name) => ctx.git(["checkout", name.as_str()]),
    };

    let result = ctx.run(command, &args.repo_path).await;
    if !result.success {
        return failure(&result);
    }

    // git reports a successful checkout on stderr
    if matches!(args.action, BranchAction::Checkout(_)) && !result.stderr().is_empty() {
        return result.stderr().to_string();
    }
    first_non_empty(
        &[result.stdout()],
        &format!("Successfully performed {} operation", args.action),
    )
}

async fn git_commit(ctx: &ToolContext<'_>, args: CommitArgs) -> String {
    if args.add_all {
        let staged = ctx.run(ctx.git(["add", "-A"]), &args.repo_path).await;
        if !staged.success {
            return format!("Error adding files: {}", staged.failure_reason());
        }
    }

    let result = ctx
        .run(ctx.git(["commit", "-m", args.message.as_str()]), &args.repo_path)
        .await;
    if !result.success {
        return failure(&result);
    }
    format!("Commit created successfully:\n{}", result.stdout())
}

async fn git_push(ctx: &ToolContext<'_>, args: PushArgs) -> String {
    let mut command = vec!["push"];
    if args.force {
        command.push("--force");
    }
    if let Some(branch) = &args.branch {
        command.extend(["origin", branch.as_str()]);
    }

    let result = ctx.run(ctx.git(command), &args.repo_path).await;
    if !result.success {
        return failure(&result);
    }
    first_non_empty(
        &[result.stdout(), result.stderr()],
        "Push completed successfully",
    )
}

async fn git_pull(ctx: &ToolContext<'_>, args: PullArgs) -> String {
    let mut command = vec!["pull"];
    if let Some(branch) = &args.branch {
        command.extend(["origin", branch.as_str()]);
    }

    let result = ctx.run(ctx.git(command), &args.repo_path).await;
    if !result.success {
        return failure(&result);
    }
    format!("Pull completed successfully:\n{}", result.stdout())
}

async fn git_log(ctx: &ToolContext<'_>, args: LogArgs) -> String {
    let limit = format!("-{}", args.limit);
    let command = ctx.git(["log", limit.as_str(), "--oneline", "--decorate", "--graph"]);

    let result = ctx.run(command, &args.repo_path).await;
    if !result.success {
        return failure(&result);
    }
    format!("Git log (last {} commits):\n{}", args.limit, result.stdout())
}

async fn git_add(ctx: &ToolContext<'_>, args: AddArgs) -> String {
    let command = ctx.git(
        std::iter::once("add").chain(args.files.iter().map(String::as_str)),
    );

    let result = ctx.run(command, &args.repo_path).await;
    if !result.success {
        return failure(&result);
    }
    format!("Files staged successfully: {}", args.files.join(", "))
}
