//! HTTP transport for the workflow service.
use super::types::{
    Agent, CreateAgentRequest, CreateExecutionRequest, Execution, FileRecord, Task,
    UploadFileRequest,
};
use crate::config::{Settings, REQUEST_TIMEOUT};
use crate::util::truncate_string;
use anyhow::{anyhow, Context, Result};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use ureq::http::Response;
use ureq::Body;

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY_BYTES: usize = 512;

/// Authenticated client bound to one base URL.
pub struct JulepClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl JulepClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        JulepClient {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {api_key}"),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.base_url, &settings.api_key, REQUEST_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn create_agent(&self, name: &str, model: &str, about: &str) -> Result<Agent> {
        let body = CreateAgentRequest { name, model, about };
        self.post_json("/agents", &body, "create agent")
    }

    pub fn create_task(&self, agent_id: &str, definition: &Value) -> Result<Task> {
        let path = format!("/agents/{agent_id}/tasks");
        self.post_json(&path, definition, "create task")
    }

    pub fn create_execution(&self, task_id: &str, input: &Value) -> Result<Execution> {
        let path = format!("/tasks/{task_id}/executions");
        self.post_json(&path, &CreateExecutionRequest { input }, "create execution")
    }

    pub fn get_execution(&self, execution_id: &str) -> Result<Execution> {
        let path = format!("/executions/{execution_id}");
        self.get_json(&path, "get execution")
    }

    /// Upload a file to the service's file store; content travels as base64.
    pub fn upload_file(&self, name: &str, bytes: &[u8], mime_type: &str) -> Result<FileRecord> {
        let body = UploadFileRequest {
            name,
            description: "Foodie tour itinerary",
            mime_type,
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
        };
        self.post_json("/files", &body, "upload file")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_json<B, T>(&self, path: &str, body: &B, what: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let start = Instant::now();
        let response = self
            .agent
            .post(url.as_str())
            .header("Authorization", self.authorization.as_str())
            .send_json(body)
            .with_context(|| format!("{what}: POST {url}"))?;
        tracing::debug!(
            %url,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "{what}"
        );
        read_response(response, what)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.url(path);
        let start = Instant::now();
        let response = self
            .agent
            .get(url.as_str())
            .header("Authorization", self.authorization.as_str())
            .call()
            .with_context(|| format!("{what}: GET {url}"))?;
        tracing::debug!(
            %url,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "{what}"
        );
        read_response(response, what)
    }
}

fn read_response<T: DeserializeOwned>(mut response: Response<Body>, what: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.body_mut().read_to_string().unwrap_or_default();
        let detail = truncate_string(body.trim(), MAX_ERROR_BODY_BYTES);
        return Err(anyhow!("{what} failed: HTTP {status}: {detail}"));
    }
    response
        .body_mut()
        .read_json::<T>()
        .with_context(|| format!("decode {what} response"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julep::ExecutionStatus;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{Shutdown, TcpListener};
    use std::thread::JoinHandle;

    /// Answer a single request on a loopback port with `status` and `body`.
    /// The join handle yields the request line and headers as received.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).expect("read request") == 0 || line == "\r\n" {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
                head.push_str(&line);
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).expect("read body");
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).expect("write response");
            // Drain until the client hangs up so the close stays orderly.
            let _ = stream.shutdown(Shutdown::Write);
            let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
            let _ = stream.read_to_end(&mut Vec::new());
            head
        });
        (base_url, handle)
    }

    fn client(base_url: &str) -> JulepClient {
        JulepClient::new(base_url, "secret", Duration::from_secs(5))
    }

    #[test]
    fn get_decodes_execution_and_sends_bearer_token() {
        let (base_url, server) = serve_once("200 OK", r#"{"id":"e1","status":"succeeded"}"#);
        let execution = client(&base_url).get_execution("e1").expect("get execution");
        assert_eq!(execution.id, "e1");
        assert_eq!(execution.status, ExecutionStatus::Succeeded);

        let head = server.join().expect("server");
        assert!(head.starts_with("GET /executions/e1 "), "{head}");
        assert!(head.to_ascii_lowercase().contains("authorization: bearer secret"));
    }

    #[test]
    fn post_sends_json_body() {
        let (base_url, server) = serve_once("201 Created", r#"{"id":"a1"}"#);
        let agent = client(&base_url)
            .create_agent("Foodie Tour Planner", "claude-3.5-sonnet", "plans tours")
            .expect("create agent");
        assert_eq!(agent.id, "a1");
        let head = server.join().expect("server");
        assert!(head.starts_with("POST /agents "), "{head}");
    }

    #[test]
    fn error_status_reports_truncated_body() {
        let body = "x".repeat(2000);
        let (base_url, server) = serve_once("500 Internal Server Error", &body);
        let err = client(&base_url).get_execution("e1").unwrap_err();
        server.join().expect("server");

        let message = err.to_string();
        assert!(message.starts_with("get execution failed: HTTP 500"), "{message}");
        assert!(message.contains(&"x".repeat(MAX_ERROR_BODY_BYTES)));
        assert!(!message.contains(&"x".repeat(MAX_ERROR_BODY_BYTES + 1)));
    }

    #[test]
    fn error_status_on_post_names_the_operation() {
        let (base_url, server) = serve_once("401 Unauthorized", r#"{"error":"bad key"}"#);
        let err = client(&base_url)
            .create_execution("t1", &serde_json::json!({"locations": ["Paris"]}))
            .unwrap_err();
        server.join().expect("server");
        let message = err.to_string();
        assert!(message.starts_with("create execution failed: HTTP 401"), "{message}");
        assert!(message.contains("bad key"));
    }

    #[test]
    fn undecodable_success_body_is_an_error() {
        let (base_url, server) = serve_once("200 OK", "not json");
        let err = client(&base_url).get_execution("e1").unwrap_err();
        server.join().expect("server");
        assert!(format!("{err:#}").contains("decode get execution response"));
    }

    #[test]
    fn base_url_is_normalized() {
        let client = JulepClient::new("https://api.julep.ai/api/", "key", Duration::from_secs(1));
        assert_eq!(client.base_url(), "https://api.julep.ai/api");
        assert_eq!(
            client.url("/executions/abc"),
            "https://api.julep.ai/api/executions/abc"
        );
        assert_eq!(client.authorization, "Bearer key");
    }

    #[test]
    fn upload_body_is_base64() {
        let body = UploadFileRequest {
            name: "foodie_tour.pdf",
            description: "Foodie tour itinerary",
            mime_type: "application/pdf",
            content: base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.5"),
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["content"], "JVBERi0xLjU=");
        assert_eq!(value["name"], "foodie_tour.pdf");
    }
}
