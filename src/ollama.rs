//! Client for a local Ollama server: availability probes, model listing and
//! switching, and the prompt templates behind help, chat, and error diagnosis.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::HelpCache;
use crate::config::ConfigStore;
use crate::context::DirContext;
use crate::util;

// Cheaper requests get shorter deadlines so a wedged server never stalls the
// prompt for long.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const TAGS_TIMEOUT: Duration = Duration::from_secs(10);
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
pub const ERROR_HELP_TIMEOUT: Duration = Duration::from_secs(20);

/// Error output beyond this many characters is cut before prompting.
const MAX_ERROR_OUTPUT_CHARS: usize = 2000;

/// What went wrong talking to Ollama. Callers match on this to pick the
/// right message instead of parsing error strings.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("request timed out")]
    Timeout,
    #[error("could not connect to Ollama at {url}")]
    Connection { url: String },
    #[error("{0}")]
    Other(String),
}

impl AiError {
    fn from_reqwest(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_timeout() {
            AiError::Timeout
        } else if err.is_connect() {
            AiError::Connection {
                url: base_url.to_string(),
            }
        } else {
            AiError::Other(err.to_string())
        }
    }
}

/// One installed model as reported by `/api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

impl ModelEntry {
    pub fn size_gb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    UnknownModel { available: Vec<String> },
}

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    help_cache: HelpCache,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url,
            model,
            help_cache: HelpCache::default(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Quick health probe against `/api/tags`. Never errors: any failure,
    /// including a timeout, just reads as "not available".
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn list_models(&self) -> Result<Vec<ModelEntry>, AiError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|e| AiError::from_reqwest(e, &self.base_url))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AiError::Other(format!("API error ({status}): {text}")));
        }
        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| AiError::from_reqwest(e, &self.base_url))?;
        Ok(tags.models)
    }

    /// Switch the active model. The name must match an installed model
    /// exactly; the choice is persisted to the config before the in-memory
    /// model changes, so a failed save leaves both sides untouched.
    pub async fn switch_model(
        &mut self,
        name: &str,
        config: &mut ConfigStore,
    ) -> Result<SwitchOutcome, AiError> {
        let available: Vec<String> = self
            .list_models()
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect();
        if !available.iter().any(|m| m == name) {
            return Ok(SwitchOutcome::UnknownModel { available });
        }
        config
            .set_model(name)
            .map_err(|e| AiError::Other(format!("could not save model choice: {e}")))?;
        self.model = name.to_string();
        Ok(SwitchOutcome::Switched)
    }

    pub fn is_help_cached(&self, command: &str, cwd: &Path) -> bool {
        self.help_cache
            .contains(command.trim(), &cwd.to_string_lossy())
    }

    /// Explain a command. Answers are cached per (command, directory) so
    /// repeating a query costs nothing; a fresh answer takes exactly one
    /// generate call.
    pub async fn get_help(&mut self, command: &str, cwd: &Path) -> Result<String, AiError> {
        let command = command.trim();
        if command.is_empty() {
            return Ok("Please specify a command to get help for.".to_string());
        }
        let cwd_key = cwd.to_string_lossy().into_owned();
        if let Some(cached) = self.help_cache.get(command, &cwd_key) {
            return Ok(cached.clone());
        }
        let prompt = build_help_prompt(command, cwd);
        let reply = self
            .generate(&prompt, 0.2, 300, GENERATE_TIMEOUT)
            .await?;
        let reply = if reply.is_empty() {
            "No response received".to_string()
        } else {
            reply
        };
        self.help_cache.insert(command, &cwd_key, reply.clone());
        Ok(reply)
    }

    pub async fn chat(&self, message: &str) -> Result<String, AiError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok("Please provide a message to chat about.".to_string());
        }
        let prompt = build_chat_prompt(message);
        let reply = self
            .generate(&prompt, 0.7, 500, GENERATE_TIMEOUT)
            .await?;
        Ok(if reply.is_empty() {
            "No response received".to_string()
        } else {
            reply
        })
    }

    /// Ask for fix suggestions after a command failed. Long error output is
    /// truncated before it is embedded in the prompt.
    pub async fn error_help(&self, command: &str, error_output: &str) -> Result<String, AiError> {
        let error_output = util::truncate(error_output, MAX_ERROR_OUTPUT_CHARS);
        let prompt = build_error_prompt(command, &error_output);
        let reply = self
            .generate(&prompt, 0.7, 200, ERROR_HELP_TIMEOUT)
            .await?;
        Ok(if reply.is_empty() {
            "No suggestions available".to_string()
        } else {
            reply
        })
    }

    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        num_predict: u32,
        timeout: Duration,
    ) -> Result<String, AiError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": temperature,
                "num_predict": num_predict,
            }
        });
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AiError::from_reqwest(e, &self.base_url))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AiError::Other(format!("API error ({status}): {text}")));
        }
        let out: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| AiError::from_reqwest(e, &self.base_url))?;
        Ok(out.response.trim().to_string())
    }
}

fn build_help_prompt(command: &str, cwd: &Path) -> String {
    let context = DirContext::detect(cwd)
        .label_for_command(command)
        .map(|label| format!("\n\nNote: The user is currently working in {label}."))
        .unwrap_or_default();
    format!(
        "You are a helpful terminal assistant. Explain this command concisely:\n\n\
         Command: {command}{context}\n\n\
         Provide:\n\
         1. What the command does\n\
         2. Common usage examples\n\
         3. Important flags/options\n\
         4. Any safety warnings if needed\n\n\
         Keep it practical and brief."
    )
}

fn build_chat_prompt(message: &str) -> String {
    format!(
        "You are a helpful terminal assistant. The user is asking: {message}\n\n\
         Provide a helpful, practical response. If it's about terminal commands, include examples.\n\
         Be concise but thorough."
    )
}

fn build_error_prompt(command: &str, error_output: &str) -> String {
    format!(
        "You are a helpful terminal assistant. A command failed with an error:\n\n\
         Command: {command}\n\
         Error: {error_output}\n\n\
         Provide specific suggestions to fix this error. Include:\n\
         1. Most likely cause\n\
         2. Specific commands to try\n\
         3. Alternative approaches if needed\n\n\
         Be concise and practical."
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    pub(crate) type RequestLog = Arc<Mutex<Vec<(String, String)>>>;

    pub(crate) struct StubOllama {
        pub(crate) base_url: String,
        pub(crate) requests: RequestLog,
    }

    impl StubOllama {
        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub(crate) fn generate_calls(&self) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|(path, _)| path == "/api/generate")
                .count()
        }

        pub(crate) fn last_generate_body(&self) -> Option<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(path, _)| path == "/api/generate")
                .map(|(_, body)| body.clone())
        }
    }

    /// Minimal HTTP server with canned responses keyed by request path.
    /// Unknown paths get a 500. The accept loop dies with the test runtime.
    pub(crate) async fn serve(routes: &[(&str, u16, &str)]) -> StubOllama {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: HashMap<String, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();
        let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = handle(socket, &routes, &log).await;
                });
            }
        });
        StubOllama {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    async fn handle(
        mut socket: TcpStream,
        routes: &HashMap<String, (u16, String)>,
        log: &RequestLog,
    ) -> std::io::Result<()> {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut buf).await?;
            if n == 0 {
                return Ok(());
            }
            data.extend_from_slice(&buf[..n]);
            if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        while data.len() < header_end + content_length {
            let n = socket.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
        }
        let path = head
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or("")
            .to_string();
        let body = String::from_utf8_lossy(&data[header_end..]).into_owned();
        log.lock().unwrap().push((path.clone(), body));
        let (status, payload) = match routes.get(&path) {
            Some((status, payload)) => (*status, payload.clone()),
            None => (500, String::from("{}")),
        };
        let reason = match status {
            200 => "OK",
            404 => "Not Found",
            _ => "Internal Server Error",
        };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
            payload.len()
        );
        socket.write_all(response.as_bytes()).await?;
        socket.shutdown().await
    }
}
