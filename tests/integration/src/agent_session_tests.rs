//! End-to-end integration tests for a complete agent session
//!
//! These tests drive the full stack: line transport -> server -> handlers ->
//! process invoker -> real git, the way an MCP client would during a
//! working session.

use std::io::Cursor;

use gitgate_mcp::{GatewayConfig, GatewayServer, ServeStats, StdioTransport, serve};
use gitgate_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn tool_call(id: u64, tool: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string()
}

/// Run one session over in-memory streams and return the parsed responses.
async fn run_session(server: &GatewayServer, lines: &[String]) -> (ServeStats, Vec<Value>) {
    let input = lines.join("\n") + "\n";
    let mut transport = StdioTransport::new(Cursor::new(input.into_bytes()), Vec::new());
    let stats = serve(server, &mut transport).await.unwrap();

    let (_, out) = transport.into_inner();
    let responses = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (stats, responses)
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_feature_branch_workflow() {
    let mut repo = TestRepo::with_commit();
    repo.add_bare_remote();
    repo.write_file("src/main.rs", "fn main() {}\n");
    let path = repo.root_str();

    let server = GatewayServer::new(&GatewayConfig::default());
    let lines = vec![
        json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        tool_call(
            1,
            "git_branch",
            json!({"repo_path": path, "action": "create", "branch_name": "feature/cli"}),
        ),
        tool_call(
            2,
            "git_branch",
            json!({"repo_path": path, "action": "checkout", "branch_name": "feature/cli"}),
        ),
        tool_call(3, "git_add", json!({"repo_path": path, "files": ["src/main.rs"]})),
        tool_call(4, "git_commit", json!({"repo_path": path, "message": "Add entry point"})),
        tool_call(5, "git_log", json!({"repo_path": path, "limit": 5})),
        tool_call(6, "git_push", json!({"repo_path": path, "branch": "feature/cli"})),
        tool_call(7, "git_status", json!({"repo_path": path})),
    ];

    let (stats, responses) = run_session(&server, &lines).await;
    assert_eq!(stats.lines, 9);
    assert_eq!(stats.responses, 8);
    assert_eq!(stats.faults, 0);

    let ids: Vec<u64> = responses.iter().map(|r| r["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6, 7]);

    assert_eq!(text(&responses[1]), "Successfully performed create operation");
    assert_eq!(text(&responses[3]), "Files staged successfully: src/main.rs");
    assert!(text(&responses[4]).starts_with("Commit created successfully:\n"));
    assert!(text(&responses[5]).contains("Add entry point"));
    assert!(!text(&responses[6]).starts_with("Error"), "{}", text(&responses[6]));
    assert!(text(&responses[7]).contains("feature/cli"));

    assert_eq!(repo.current_branch(), "feature/cli");
    assert_eq!(repo.commit_count(), 2);
    assert_eq!(repo.head_message(), "Add entry point");
}

#[tokio::test]
async fn test_commit_all_then_pull_round_trip() {
    let mut repo = TestRepo::with_commit();
    repo.add_bare_remote();
    repo.git(&["push", "-u", "origin", "main"]);
    repo.write_file("docs/guide.md", "# Guide\n");
    repo.write_file("notes.txt", "todo\n");
    let path = repo.root_str();

    let server = GatewayServer::new(&GatewayConfig::default());
    let lines = vec![
        tool_call(
            1,
            "git_commit",
            json!({"repo_path": path, "message": "Add docs", "add_all": true}),
        ),
        tool_call(2, "git_push", json!({"repo_path": path})),
        tool_call(3, "git_pull", json!({"repo_path": path})),
    ];

    let (_, responses) = run_session(&server, &lines).await;
    assert!(text(&responses[0]).starts_with("Commit created successfully:\n"));
    assert!(!text(&responses[1]).starts_with("Error"), "{}", text(&responses[1]));
    assert!(text(&responses[2]).starts_with("Pull completed successfully:\n"));
    assert!(repo.git(&["status", "--porcelain"]).is_empty());
}

#[tokio::test]
async fn test_failures_do_not_end_the_session() {
    let repo = TestRepo::with_commit();
    let path = repo.root_str();

    let server = GatewayServer::new(&GatewayConfig::default());
    let lines = vec![
        tool_call(1, "git_status", json!({"repo_path": "/nonexistent/gitgate"})),
        "{broken".to_string(),
        tool_call(2, "git_rebase", json!({"repo_path": path})),
        tool_call(3, "git_branch", json!({"repo_path": path, "action": "create"})),
        tool_call(4, "git_status", json!({"repo_path": path})),
    ];

    let (stats, responses) = run_session(&server, &lines).await;
    assert_eq!(stats.responses, 5);

    assert_eq!(
        text(&responses[0]),
        "Error: Directory does not exist: /nonexistent/gitgate"
    );
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[2]["error"]["code"], -32601);
    assert_eq!(
        text(&responses[3]),
        "Error: branch_name is required for create action"
    );
    assert!(text(&responses[4]).starts_with(&format!("Git status for {path}:")));
}

#[cfg(unix)]
#[tokio::test]
async fn test_hanging_git_is_killed_after_timeout() {
    use std::os::unix::fs::PermissionsExt;

    let repo = TestRepo::with_commit();
    let bin = tempfile::TempDir::new().unwrap();
    let slow_git = bin.path().join("slow-git");
    std::fs::write(&slow_git, "#!/bin/sh\nsleep 30\n").unwrap();
    std::fs::set_permissions(&slow_git, std::fs::Permissions::from_mode(0o755)).unwrap();
    let program = slow_git.to_string_lossy().into_owned();

    let config = GatewayConfig::default().with_overrides(Some(program.clone()), Some(1));
    let server = GatewayServer::new(&config);
    let lines = vec![tool_call(1, "git_status", json!({"repo_path": repo.root_str()}))];

    let started = std::time::Instant::now();
    let (_, responses) = run_session(&server, &lines).await;

    assert!(started.elapsed() < std::time::Duration::from_secs(20));
    assert_eq!(
        text(&responses[0]),
        format!("Error: Command timed out after 1s: {program} status")
    );
}

#[test]
fn test_server_accepts_a_directly_built_invoker() {
    let invoker = std::sync::Arc::new(gitgate_exec::ProcessInvoker::new());
    let server = GatewayServer::with_invoker(invoker, "git");
    assert_eq!(server.registry().list().len(), 7);
}
