//! MCP Protocol Compliance Integration Tests
//!
//! Tests that the gateway correctly implements JSON-RPC 2.0 and MCP
//! protocol requirements: ID preservation, error codes, silence on
//! notifications and the advertised tool catalog. Git is never run here;
//! the server talks to a [`RecordingInvoker`].

use std::collections::HashSet;
use std::sync::Arc;

use gitgate_mcp::args::required_fields;
use gitgate_mcp::{GatewayServer, ToolName};
use gitgate_test_utils::invoker::RecordingInvoker;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};

fn setup_server() -> (GatewayServer, Arc<RecordingInvoker>) {
    let invoker = Arc::new(RecordingInvoker::new());
    let server = GatewayServer::with_invoker(invoker.clone(), "git");
    (server, invoker)
}

async fn respond(server: &GatewayServer, request: &str) -> Value {
    let response = server
        .handle_message(request)
        .await
        .unwrap()
        .expect("request with an id must be answered");
    serde_json::from_str(&response).unwrap()
}

async fn silent(server: &GatewayServer, request: &str) -> bool {
    server.handle_message(request).await.unwrap().is_none()
}

// ==========================================================================
// JSON-RPC 2.0 ID Preservation
// ==========================================================================

#[rstest]
#[case(json!(42))]
#[case(json!("req-abc-123"))]
#[case(json!(0))]
#[case(json!(-7))]
#[tokio::test]
async fn test_id_preserved_in_response(#[case] id: Value) {
    let (server, _) = setup_server();
    let request = json!({"jsonrpc": "2.0", "id": id, "method": "tools/list"}).to_string();

    let response = respond(&server, &request).await;
    assert_eq!(response["id"], id, "ID must be echoed back exactly");
    assert_eq!(response["jsonrpc"], "2.0");
}

#[tokio::test]
async fn test_id_preserved_on_error_response() {
    let (server, _) = setup_server();
    let response = respond(
        &server,
        r#"{"jsonrpc":"2.0","id":"err-1","method":"resources/list"}"#,
    )
    .await;

    assert_eq!(response["id"], "err-1");
    assert!(response.get("result").is_none());
}

// ==========================================================================
// Error codes
// ==========================================================================

#[tokio::test]
async fn test_unparsable_line_gets_parse_error_without_id() {
    let (server, _) = setup_server();
    for garbage in ["not json", "{", r#"{"id":1,"method":"#, "[1,2", "[1,2]", "", "   "] {
        let response = respond(&server, garbage).await;
        assert_eq!(response["error"]["code"], -32700, "input: {garbage}");
        assert!(response.get("id").is_none(), "input: {garbage}");
        assert!(response.get("result").is_none());
    }
}

#[tokio::test]
async fn test_unknown_method_is_method_not_found() {
    let (server, _) = setup_server();
    let response = respond(&server, r#"{"method":"prompts/list","id":4}"#).await;

    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Method not found: prompts/list");
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let (server, invoker) = setup_server();
    let response = respond(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"rm_rf","arguments":{}}}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Unknown tool: rm_rf");
    assert_eq!(invoker.call_count(), 0);
}

#[rstest]
#[case(r#"{"jsonrpc":"2.0","method":42,"id":5}"#, json!(5))]
#[case(r#"{"jsonrpc":"2.0","method":{"name":"tools/list"},"id":"x"}"#, json!("x"))]
#[case(r#"{"jsonrpc":"2.0","id":11}"#, json!(11))]
#[tokio::test]
async fn test_missing_or_mistyped_method_keeps_id(#[case] request: &str, #[case] id: Value) {
    let (server, _) = setup_server();
    let response = respond(&server, request).await;

    assert_eq!(response["id"], id);
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_jsonrpc_version_is_not_checked() {
    let (server, _) = setup_server();
    let response = respond(&server, r#"{"jsonrpc":2.0,"method":"tools/list","id":6}"#).await;

    assert_eq!(response["id"], 6);
    assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 7);
}

#[rstest]
#[case(r#"{"method":"tools/call","params":{"arguments":{}},"id":7}"#, json!(7))]
#[case(r#"{"method":"tools/call","id":8}"#, json!(8))]
#[case(r#"{"method":"tools/call","params":{"name":null},"id":9}"#, json!(9))]
#[tokio::test]
async fn test_tool_call_without_name_is_unknown_tool(#[case] request: &str, #[case] id: Value) {
    let (server, invoker) = setup_server();
    let response = respond(&server, request).await;

    assert_eq!(response["id"], id);
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Unknown tool: ");
    assert_eq!(invoker.call_count(), 0);
}

#[tokio::test]
async fn test_operation_failure_is_not_a_protocol_error() {
    let (server, invoker) = setup_server();
    invoker.push_response(gitgate_exec::Invocation::completed(
        128,
        "",
        "fatal: not a git repository",
    ));

    let response = respond(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"git_status","arguments":{"repo_path":"/tmp"}}}"#,
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(
        response["result"]["content"][0]["text"],
        "Error: fatal: not a git repository"
    );
}

// ==========================================================================
// Notifications
// ==========================================================================

#[rstest]
#[case(r#"{"jsonrpc":"2.0","method":"initialized"}"#)]
#[case(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)]
#[case(r#"{"jsonrpc":"2.0","method":"initialize","params":{}}"#)]
#[case(r#"{"jsonrpc":"2.0","method":"tools/list","id":null}"#)]
#[case(r#"{"jsonrpc":"2.0","method":"no/such/method"}"#)]
#[tokio::test]
async fn test_notifications_are_never_answered(#[case] request: &str) {
    let (server, _) = setup_server();
    assert!(silent(&server, request).await);
}

proptest! {
    #[test]
    fn prop_notifications_never_answered(method in "[a-zA-Z/_]{0,24}") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (server, _) = setup_server();
        let request = json!({"jsonrpc": "2.0", "method": method}).to_string();
        let response = runtime.block_on(server.handle_message(&request)).unwrap();
        prop_assert!(response.is_none());
    }
}

// ==========================================================================
// Tool catalog
// ==========================================================================

#[tokio::test]
async fn test_tools_list_advertises_seven_unique_tools() {
    let (server, _) = setup_server();
    let response = respond(&server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "git_status",
            "git_branch",
            "git_commit",
            "git_push",
            "git_pull",
            "git_log",
            "git_add"
        ]
    );
    assert_eq!(names.iter().collect::<HashSet<_>>().len(), 7);

    for tool in tools {
        assert!(tool["description"].as_str().is_some_and(|d| !d.is_empty()));
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_advertised_required_fields_match_validation() {
    let (server, _) = setup_server();
    let response = respond(&server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;

    for tool in response["result"]["tools"].as_array().unwrap() {
        let name = tool["name"].as_str().unwrap();
        let advertised: Vec<&str> = tool["inputSchema"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let tool_name = ToolName::from_name(name).unwrap();
        assert_eq!(advertised, required_fields(tool_name), "{name}");
    }
}

#[tokio::test]
async fn test_tools_list_is_stable_across_calls() {
    let (server, _) = setup_server();
    let request = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let first = respond(&server, request).await;
    let second = respond(&server, request).await;
    assert_eq!(first, second);
}

// ==========================================================================
// Example exchanges
// ==========================================================================

#[tokio::test]
async fn test_initialize_exchange() {
    let (server, _) = setup_server();
    let response = respond(
        &server,
        r#"{"jsonrpc":"2.0","method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test-client","version":"1.0"}},"id":1}"#,
    )
    .await;

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "gitgate-mcp");
    assert_eq!(
        response["result"]["capabilities"],
        json!({"tools": {"listChanged": false}})
    );
}

#[tokio::test]
async fn test_log_call_exchange() {
    let invoker = Arc::new(RecordingInvoker::succeeding(
        "* c3 (HEAD -> main) third\n* c2 second\n* c1 first\n",
    ));
    let server = GatewayServer::with_invoker(invoker.clone(), "git");

    let response = respond(
        &server,
        r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"git_log","arguments":{"repo_path":"/tmp/repo","limit":3}},"id":2}"#,
    )
    .await;

    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Git log (last 3 commits):\n"));
    assert_eq!(
        invoker.commands()[0],
        ["git", "log", "-3", "--oneline", "--decorate", "--graph"]
    );
}

#[tokio::test]
async fn test_branch_create_without_name_exchange() {
    let (server, invoker) = setup_server();
    let response = respond(
        &server,
        r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"git_branch","arguments":{"repo_path":"/tmp/repo","action":"create"}},"id":3}"#,
    )
    .await;

    assert_eq!(
        response["result"]["content"][0]["text"],
        "Error: branch_name is required for create action"
    );
    assert_eq!(invoker.call_count(), 0);
}

#[tokio::test]
async fn test_parse_error_exchange() {
    let (server, _) = setup_server();
    let response = respond(&server, r#"{"jsonrpc":"2.0","method":"#).await;
    assert_eq!(response["error"]["code"], -32700);
    assert!(response.get("id").is_none());
}

#[tokio::test]
async fn test_unknown_method_exchange() {
    let (server, _) = setup_server();
    let response = respond(
        &server,
        r#"{"method":"unknown_method","id":9,"params":{}}"#,
    )
    .await;
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["id"], 9);
}

// ==========================================================================
// Argument validation through the protocol
// ==========================================================================

#[rstest]
#[case("git_status", json!({}), "Error: repo_path is required")]
#[case("git_commit", json!({"repo_path": "/r"}), "Error: repo_path and message are required")]
#[case("git_add", json!({"repo_path": "/r", "files": []}), "Error: repo_path and files are required")]
#[case("git_branch", json!({"repo_path": "/r", "action": "rename"}), "Error: Unknown action: rename")]
#[tokio::test]
async fn test_invalid_arguments_are_reported_as_text(
    #[case] tool: &str,
    #[case] arguments: Value,
    #[case] expected: &str,
) {
    let (server, invoker) = setup_server();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string();

    let response = respond(&server, &request).await;
    assert_eq!(response["result"]["content"][0]["text"], expected);
    assert_eq!(invoker.call_count(), 0);
}
