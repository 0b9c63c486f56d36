//! Common test utilities for integration tests.
//!
//! `LspClient` drives the server binary over stdio and plays the editor:
//! server-to-client requests are answered automatically and recorded so
//! tests can assert on what the server asked for.

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, Command, Stdio};

/// A server-to-client message (request or notification).
#[derive(Debug, Clone)]
pub(crate) struct ServerMessage {
    pub method: String,
    pub params: Value,
}

/// Canned answers for server-to-client requests.
#[derive(Debug, Clone)]
pub(crate) struct EditorBehavior {
    /// Language chosen in `window/showMessageRequest`; `None` dismisses it.
    pub picked_language: Option<String>,
    pub show_document_success: bool,
    pub apply_edit_applied: bool,
    /// Error message returned for `snippet/resolve`, if set.
    pub resolve_error: Option<String>,
}

impl Default for EditorBehavior {
    fn default() -> Self {
        Self {
            picked_language: Some("python".into()),
            show_document_success: true,
            apply_edit_applied: true,
            resolve_error: None,
        }
    }
}

/// Answer text served for a resolve request.
#[allow(dead_code)] // Not used in all tests
pub(crate) fn answer_text(params: &Value) -> String {
    format!(
        "{}|{}|{}|{}",
        params["language"].as_str().unwrap_or_default(),
        params["query"].as_str().unwrap_or_default(),
        params["answer"],
        params["verbose"]
    )
}

/// LSP test client for communicating with the server binary.
pub(crate) struct LspClient {
    process: Child,
    reader: BufReader<std::process::ChildStdout>,
    pub behavior: EditorBehavior,
    /// Requests the server sent, in order received.
    requests: Vec<ServerMessage>,
    /// Notifications the server sent, in order received.
    notifications: Vec<ServerMessage>,
}

impl LspClient {
    /// Spawn the snippet-lsp binary.
    pub(crate) fn spawn() -> Self {
        let mut process = Command::new(env!("CARGO_BIN_EXE_snippet-lsp"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn snippet-lsp binary");

        let stdout = process.stdout.take().expect("Failed to capture stdout");

        Self {
            process,
            reader: BufReader::new(stdout),
            behavior: EditorBehavior::default(),
            requests: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub(crate) fn requests(&self, method: &str) -> Vec<ServerMessage> {
        self.requests
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    pub(crate) fn notifications(&self, method: &str) -> Vec<ServerMessage> {
        self.notifications
            .iter()
            .filter(|n| n.method == method)
            .cloned()
            .collect()
    }

    #[allow(dead_code)] // Not used in all tests
    pub(crate) fn clear_messages(&mut self) {
        self.requests.clear();
        self.notifications.clear();
    }

    /// Send a JSON-RPC message to the server.
    pub(crate) fn send(&mut self, message: &Value) {
        let body = serde_json::to_string(message).unwrap();
        let header = format!("Content-Length: {}\r\n\r\n", body.len());

        let stdin = self.process.stdin.as_mut().expect("stdin not captured");
        stdin.write_all(header.as_bytes()).unwrap();
        stdin.write_all(body.as_bytes()).unwrap();
        stdin.flush().unwrap();
    }

    fn read_message(&mut self) -> Value {
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            let bytes_read = self
                .reader
                .read_line(&mut line)
                .expect("Failed to read header");

            assert!(bytes_read != 0, "Server closed connection unexpectedly");

            if line == "\r\n" || line == "\n" {
                if content_length > 0 {
                    break;
                }
                continue;
            }

            if line.to_lowercase().starts_with("content-length:") {
                content_length = line
                    .split(':')
                    .nth(1)
                    .unwrap()
                    .trim()
                    .parse()
                    .expect("Invalid content length");
            }
        }

        let mut body = vec![0u8; content_length];
        self.reader
            .read_exact(&mut body)
            .expect("Failed to read body");

        serde_json::from_slice(&body).unwrap_or_else(|e| {
            panic!("Invalid JSON: {e} in: {:?}", String::from_utf8_lossy(&body))
        })
    }

    fn answer_server_request(&mut self, id: Value, method: &str, params: &Value) {
        let reply = match method {
            "snippet/resolve" => match &self.behavior.resolve_error {
                Some(message) => json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": -32603, "message": message}
                }),
                None => json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {"text": answer_text(params)}
                }),
            },
            "window/showDocument" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {"success": self.behavior.show_document_success}
            }),
            "workspace/applyEdit" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {"applied": self.behavior.apply_edit_applied}
            }),
            "window/showMessageRequest" => {
                let choice = self
                    .behavior
                    .picked_language
                    .as_ref()
                    .map(|title| json!({"title": title}));
                json!({"jsonrpc": "2.0", "id": id, "result": choice})
            }
            _ => json!({"jsonrpc": "2.0", "id": id, "result": null}),
        };
        self.send(&reply);
    }

    /// Reads until the response to `expected_id` arrives.
    ///
    /// Server requests met on the way are answered from `behavior`;
    /// notifications are captured.
    pub(crate) fn read_response(&mut self, expected_id: i64) -> Value {
        loop {
            let message = self.read_message();
            let method = message
                .get("method")
                .and_then(Value::as_str)
                .map(str::to_string);
            let params = message.get("params").cloned().unwrap_or(Value::Null);

            match (method, message.get("id").cloned()) {
                (Some(method), Some(id)) => {
                    self.answer_server_request(id, &method, &params);
                    self.requests.push(ServerMessage { method, params });
                }
                (Some(method), None) => {
                    self.notifications.push(ServerMessage { method, params });
                }
                (None, Some(id)) if id == json!(expected_id) => return message,
                _ => {}
            }
        }
    }

    /// Initialize the LSP session.
    pub(crate) fn initialize(&mut self, options: Value) -> Value {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "processId": null,
                "capabilities": {
                    "window": {
                        "workDoneProgress": true,
                        "showDocument": {"support": true}
                    },
                    "workspace": {"applyEdit": true}
                },
                "initializationOptions": options,
                "rootUri": "file:///tmp",
                "workspaceFolders": null
            }
        }));

        let response = self.read_response(1);

        self.send(&json!({
            "jsonrpc": "2.0",
            "method": "initialized",
            "params": {}
        }));

        response
    }

    /// Open a text document.
    #[allow(dead_code)] // Not used in all tests
    pub(crate) fn did_open(&mut self, uri: &str, language_id: &str, text: &str) {
        self.send(&json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": {
                "textDocument": {
                    "uri": uri,
                    "languageId": language_id,
                    "version": 1,
                    "text": text
                }
            }
        }));
    }

    #[allow(dead_code)] // Not used in all tests
    pub(crate) fn did_change_configuration(&mut self, settings: Value) {
        self.send(&json!({
            "jsonrpc": "2.0",
            "method": "workspace/didChangeConfiguration",
            "params": {"settings": settings}
        }));
    }

    /// Run a `snippet.*` command and return the raw response.
    pub(crate) fn execute_command(&mut self, id: i64, command: &str, args: Value) -> Value {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "workspace/executeCommand",
            "params": {
                "command": command,
                "arguments": [args]
            }
        }));
        self.read_response(id)
    }

    /// Completes one more request round trip.
    ///
    /// Notifications travel separately from responses and may trail the
    /// response of the command that produced them. Anything the server sent
    /// before answering this request has been captured on return.
    pub(crate) fn flush_notifications(&mut self, id: i64) {
        let _ = self.execute_command(id, "snippet.doesNotExist", json!({}));
    }

    /// Shutdown the server.
    #[allow(dead_code)] // Not used in all tests
    pub(crate) fn shutdown(&mut self) -> Value {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": 999,
            "method": "shutdown"
        }));
        self.read_response(999)
    }
}

impl Drop for LspClient {
    fn drop(&mut self) {
        let _ = self.process.kill();
    }
}
