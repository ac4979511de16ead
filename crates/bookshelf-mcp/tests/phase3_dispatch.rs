//! Phase 3: Dispatch: method table, tool calls, resources, and error replies.

use serde_json::json;

use bookshelf_mcp::protocol::{lookup_method, METHODS};
use bookshelf_mcp::tools::{ToolRegistry, TOOLS};

mod common;
use common::fixtures::{dispatch, dispatch_raw, test_handler, tool_payload, TEST_SESSION};

const EXPECTED_TOOLS: [&str; 5] = [
    "search_book",
    "get_book_info",
    "list_books",
    "select_book",
    "server_status",
];

#[test]
fn test_method_table_is_exhaustive() {
    let required = [
        "initialize",
        "notifications/initialized",
        "ping",
        "tools/list",
        "tools/call",
        "resources/list",
        "resources/templates/list",
        "resources/read",
        "prompts/list",
    ];
    for method in required {
        assert!(lookup_method(method).is_some(), "missing handler for {method}");
    }
    assert_eq!(METHODS.len(), required.len());
    assert!(lookup_method("tools/unknown").is_none());
}

#[test]
fn test_tool_table_matches_listing() {
    let names: Vec<_> = TOOLS.iter().map(|t| t.name).collect();
    assert_eq!(names, EXPECTED_TOOLS);

    let listed: Vec<_> = ToolRegistry::list_tools()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(listed, EXPECTED_TOOLS);
}

#[test]
fn test_initialize_is_idempotent() {
    let handler = test_handler();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "1.0"}
        }
    });

    let first = dispatch(&handler, request.clone());
    let second = dispatch(&handler, request);
    assert_eq!(first, second);
    assert_eq!(first["id"], 1);
    assert_eq!(first["result"]["serverInfo"]["name"], "bookshelf-mcp");
    assert!(first["result"]["capabilities"]["tools"].is_object());
}

#[test]
fn test_initialize_without_params_succeeds() {
    let handler = test_handler();
    let reply = dispatch(&handler, json!({"jsonrpc": "2.0", "id": "init", "method": "initialize"}));
    assert_eq!(reply["id"], "init");
    assert!(reply.get("error").is_none());
    assert!(reply["result"]["protocolVersion"].is_string());
}

#[test]
fn test_initialized_notification_is_never_answered() {
    let handler = test_handler();
    let without_id = dispatch(
        &handler,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    );
    assert!(without_id.is_null());

    let with_id = dispatch(
        &handler,
        json!({"jsonrpc": "2.0", "id": 4, "method": "notifications/initialized"}),
    );
    assert!(with_id.is_null());
}

#[test]
fn test_unknown_notification_is_silent() {
    let handler = test_handler();
    let reply = dispatch(&handler, json!({"jsonrpc": "2.0", "method": "notifications/cancelled"}));
    assert!(reply.is_null());
}

#[test]
fn test_ping_returns_empty_result() {
    let handler = test_handler();
    let reply = dispatch(
        &handler,
        json!({"jsonrpc": "2.0", "id": 1, "method": "ping", "params": {}}),
    );
    assert_eq!(reply, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
}

#[test]
fn test_any_json_number_id_is_echoed() {
    let handler = test_handler();
    for raw_id in ["1.5", "18446744073709551615", "-7", "0"] {
        let body = format!(r#"{{"jsonrpc":"2.0","id":{raw_id},"method":"ping"}}"#);
        let reply = dispatch_raw(&handler, body.as_bytes());
        assert!(reply.get("error").is_none(), "id {raw_id}: {reply}");
        assert_eq!(reply["id"].to_string(), raw_id);
        assert_eq!(reply["result"], json!({}));
    }
}

#[test]
fn test_string_id_is_echoed_on_error() {
    let handler = test_handler();
    let reply = dispatch(
        &handler,
        json!({"jsonrpc": "2.0", "id": "req-1", "method": "no/such/method"}),
    );
    assert_eq!(reply["id"], "req-1");
    assert_eq!(reply["error"]["code"], -32601);
}

#[test]
fn test_tools_list_is_stable() {
    let handler = test_handler();
    for id in 0..3 {
        let reply = dispatch(&handler, json!({"jsonrpc": "2.0", "id": id, "method": "tools/list"}));
        let tools = reply["result"]["tools"].as_array().unwrap();
        let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, EXPECTED_TOOLS);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }
}

#[test]
fn test_unknown_tool_is_server_error() {
    let handler = test_handler();
    let reply = dispatch(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "id": "call-7",
            "method": "tools/call",
            "params": {"name": "unknown_tool", "arguments": {}}
        }),
    );
    assert_eq!(reply["id"], "call-7");
    assert_eq!(reply["error"]["code"], -32000);
    assert!(reply["error"]["message"]
        .as_str()
        .unwrap()
        .contains("unknown_tool"));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let handler = test_handler();
    let reply = dispatch_raw(&handler, b"{not json");
    assert_eq!(reply["error"]["code"], -32700);
    assert!(reply["id"].is_null());
}

#[test]
fn test_request_without_method_is_invalid() {
    let handler = test_handler();
    let reply = dispatch(&handler, json!({"jsonrpc": "2.0", "id": 7}));
    assert_eq!(reply["error"]["code"], -32600);
    assert_eq!(reply["id"], 7);
}

#[test]
fn test_missing_or_wrong_jsonrpc_version_is_invalid() {
    let handler = test_handler();

    let reply = dispatch(&handler, json!({"id": 1, "method": "ping"}));
    assert_eq!(reply["error"]["code"], -32600);
    assert_eq!(reply["id"], 1);

    let reply = dispatch(&handler, json!({"jsonrpc": "1.0", "id": "v1", "method": "ping"}));
    assert_eq!(reply["error"]["code"], -32600);
    assert_eq!(reply["id"], "v1");
    assert!(reply["error"]["message"].as_str().unwrap().contains("1.0"));
}

#[test]
fn test_batch_is_invalid_request() {
    let handler = test_handler();
    let reply = dispatch(&handler, json!([{"jsonrpc": "2.0", "id": 1, "method": "ping"}]));
    assert_eq!(reply["error"]["code"], -32600);
    assert!(reply["id"].is_null());
}

#[test]
fn test_unknown_method_echoes_id() {
    let handler = test_handler();
    let reply = dispatch(
        &handler,
        json!({"jsonrpc": "2.0", "id": 12, "method": "sampling/createMessage"}),
    );
    assert_eq!(reply["error"]["code"], -32601);
    assert_eq!(reply["id"], 12);
}

#[test]
fn test_static_lists() {
    let handler = test_handler();

    let resources = dispatch(&handler, json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}));
    let listed = resources["result"]["resources"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["uri"], "book://library/list");

    let templates = dispatch(
        &handler,
        json!({"jsonrpc": "2.0", "id": 2, "method": "resources/templates/list"}),
    );
    assert_eq!(templates["result"]["resourceTemplates"], json!([]));

    let prompts = dispatch(&handler, json!({"jsonrpc": "2.0", "id": 3, "method": "prompts/list"}));
    assert_eq!(prompts["result"]["prompts"], json!([]));
}

#[test]
fn test_read_library_resource() {
    let handler = test_handler();
    let reply = dispatch(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "resources/read",
            "params": {"uri": "book://library/list"}
        }),
    );
    let content = &reply["result"]["contents"][0];
    assert_eq!(content["uri"], "book://library/list");
    assert_eq!(content["mimeType"], "application/json");

    let books: serde_json::Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert_eq!(books.as_array().unwrap().len(), handler.catalog().len());
}

#[test]
fn test_read_unknown_resource_is_server_error() {
    let handler = test_handler();
    let reply = dispatch(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "resources/read",
            "params": {"uri": "book://library/shelf-9"}
        }),
    );
    assert_eq!(reply["id"], 6);
    assert_eq!(reply["error"]["code"], -32000);
    assert!(reply["error"]["message"]
        .as_str()
        .unwrap()
        .contains("book://library/shelf-9"));
}

fn call_tool(name: &str, arguments: serde_json::Value) -> serde_json::Value {
    dispatch(
        &test_handler(),
        json!({
            "jsonrpc": "2.0",
            "id": 100,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }),
    )
}

#[test]
fn test_search_book_by_author() {
    let reply = call_tool("search_book", json!({"query": "austen", "field": "author"}));
    let payload = tool_payload(&reply);
    assert_eq!(payload["count"], 2);
    let ids: Vec<_> = payload["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["pride-and-prejudice", "emma"]);
}

#[test]
fn test_search_book_requires_query() {
    let reply = call_tool("search_book", json!({}));
    assert_eq!(reply["error"]["code"], -32000);
    assert_eq!(reply["id"], 100);
}

#[test]
fn test_search_book_rejects_unknown_field() {
    let reply = call_tool("search_book", json!({"query": "x", "field": "isbn"}));
    assert_eq!(reply["error"]["code"], -32000);
}

#[test]
fn test_get_book_info() {
    let reply = call_tool("get_book_info", json!({"book_id": "dracula"}));
    let book = tool_payload(&reply);
    assert_eq!(book["title"], "Dracula");
    assert_eq!(book["author"], "Bram Stoker");
    assert_eq!(book["year"], 1897);
}

#[test]
fn test_get_book_info_unknown_book() {
    let reply = call_tool("get_book_info", json!({"book_id": "war-and-peace"}));
    assert_eq!(reply["error"]["code"], -32000);
    assert!(reply["error"]["message"]
        .as_str()
        .unwrap()
        .contains("war-and-peace"));
}

#[test]
fn test_list_books_with_and_without_filter() {
    let all = tool_payload(&call_tool("list_books", json!({})));
    assert_eq!(all["count"], 6);

    let horror = tool_payload(&call_tool("list_books", json!({"genre": "horror"})));
    assert_eq!(horror["count"], 1);
    assert_eq!(horror["books"][0]["id"], "dracula");
}

#[test]
fn test_list_books_without_arguments() {
    let reply = dispatch(
        &test_handler(),
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "list_books"}
        }),
    );
    assert_eq!(tool_payload(&reply)["count"], 6);
}

#[test]
fn test_select_book_echoes_session() {
    let payload = tool_payload(&call_tool("select_book", json!({"book_id": "emma"})));
    assert_eq!(payload["selected"], true);
    assert_eq!(payload["session_id"], TEST_SESSION);
    assert_eq!(payload["book"]["id"], "emma");
}

#[test]
fn test_server_status() {
    let payload = tool_payload(&call_tool("server_status", json!({})));
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["transport"], "sse");
    assert_eq!(payload["connections"], 1);
    assert_eq!(payload["catalog_size"], 6);
    assert!(payload["uptime_secs"].as_i64().unwrap() >= 0);
}

#[test]
fn test_tools_call_without_params_is_server_error() {
    let reply = dispatch(
        &test_handler(),
        json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call"}),
    );
    assert_eq!(reply["id"], 8);
    assert_eq!(reply["error"]["code"], -32000);
}
