//! Gemini analysis backend
//!
//! Sends each recording together with the analysis prompt to the Generative
//! Language `generateContent` endpoint and returns the text of the first
//! candidate. Small recordings travel inline as base64; larger ones are first
//! uploaded through the Files API and referenced by URI, since inline requests
//! are capped at 20 MB. Requests are blocking and have no timeout: a batch
//! processes one file at a time and a long recording can take minutes.

use super::prompt::EnglishPrompt;
use super::traits::{Analyzer, PromptProvider};
use crate::config::ConfigurationSource;
use crate::error::{ErrorContext, Result, VoxError};
use crate::types::AudioFileRecord;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::{Body, Client, Response};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Largest recording sent inline, leaving room for base64 growth under the
/// 20 MB request cap
pub const DEFAULT_INLINE_LIMIT_BYTES: u64 = 14 * 1024 * 1024;

/// How often and how long to wait for an uploaded file to become usable
const UPLOAD_POLL_INTERVAL: Duration = Duration::from_secs(2);
const UPLOAD_POLL_ATTEMPTS: u32 = 30;

/// Analyzer backed by a Gemini model
pub struct GeminiAnalyzer {
    client: Client,
    api_key: String,
    model_name: String,
    endpoint: String,
    inline_limit: u64,
    poll_interval: Duration,
    prompts: Box<dyn PromptProvider>,
}

impl std::fmt::Debug for GeminiAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAnalyzer")
            .field("model_name", &self.model_name)
            .field("endpoint", &self.endpoint)
            .field("inline_limit", &self.inline_limit)
            .finish_non_exhaustive()
    }
}

impl GeminiAnalyzer {
    /// Create an analyzer from a configuration source and prompt provider
    pub fn from_config(
        config: &dyn ConfigurationSource,
        prompts: Box<dyn PromptProvider>,
    ) -> Result<Self> {
        let api_key = config.api_key().unwrap_or_default();
        Self::build(api_key, config.model_name(), prompts)
    }

    /// Create an analyzer from a bare API key and model, using the English prompt
    pub fn with_api_key(api_key: &str, model_name: &str) -> Result<Self> {
        Self::build(api_key, model_name, Box::new(EnglishPrompt))
    }

    /// Point the analyzer at a different base URL (proxy or regional endpoint)
    ///
    /// Uploads go to the matching `upload/` path, e.g. `.../v1beta` uploads
    /// to `.../upload/v1beta/files`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Send recordings larger than `bytes` through the Files API
    pub fn with_inline_limit(mut self, bytes: u64) -> Self {
        self.inline_limit = bytes;
        self
    }

    fn build(api_key: &str, model_name: &str, prompts: Box<dyn PromptProvider>) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(VoxError::config_error("API key is missing"));
        }
        if model_name.trim().is_empty() {
            return Err(VoxError::config_error("Model name is missing"));
        }

        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| VoxError::config_error(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model_name: model_name.trim().to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            inline_limit: DEFAULT_INLINE_LIMIT_BYTES,
            poll_interval: UPLOAD_POLL_INTERVAL,
            prompts,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Send a tiny text-only request to check key and model
    pub fn test_connection(&self) -> bool {
        let request = build_request("Test connection", None);
        match self.generate(&request) {
            Ok(_) => true,
            Err(e) => {
                warn!("Gemini connection test failed: {}", e);
                false
            }
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model_name)
    }

    fn upload_url(&self) -> String {
        match self.endpoint.rsplit_once('/') {
            Some((root, version)) if version.starts_with('v') && !root.ends_with('/') => {
                format!("{}/upload/{}/files", root, version)
            }
            _ => format!("{}/upload/files", self.endpoint),
        }
    }

    /// Post a request and return the concatenated candidate text
    fn generate(&self, request: &GenerateContentRequest) -> std::result::Result<String, String> {
        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .map_err(|e| format!("request failed: {}", e))?;

        let body = success_body(response, "API")?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| format!("failed to parse response: {}", e))?;
        extract_text(&parsed)
    }

    /// Upload a recording with the resumable protocol and wait until it is usable
    fn upload(
        &self,
        record: &AudioFileRecord,
        file: File,
        size: u64,
        mime_type: &str,
    ) -> std::result::Result<UploadedFile, String> {
        let metadata = UploadRequest {
            file: UploadMetadata {
                display_name: &record.name,
            },
        };
        let response = self
            .client
            .post(self.upload_url())
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&metadata)
            .send()
            .map_err(|e| format!("upload start failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(format!("upload start returned {}: {}", status, body.trim()));
        }
        let session_url = response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or("upload start response has no upload URL")?;

        let response = self
            .client
            .post(&session_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(Body::sized(file, size))
            .send()
            .map_err(|e| format!("upload failed: {}", e))?;

        let body = success_body(response, "upload")?;
        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| format!("failed to parse upload response: {}", e))?;
        debug!("Uploaded {} as {}", record.name, uploaded.file.name);

        self.wait_until_active(uploaded.file)
    }

    /// Poll an uploaded file until the service has finished processing it
    fn wait_until_active(&self, mut file: UploadedFile) -> std::result::Result<UploadedFile, String> {
        for _ in 0..UPLOAD_POLL_ATTEMPTS {
            match file.state.as_deref() {
                None | Some("ACTIVE") => return Ok(file),
                Some("FAILED") => return Err(format!("processing failed for uploaded file {}", file.name)),
                Some(state) => debug!("Uploaded file {} is {}, waiting", file.name, state),
            }

            std::thread::sleep(self.poll_interval);
            let response = self
                .client
                .get(format!("{}/{}", self.endpoint, file.name))
                .header("x-goog-api-key", &self.api_key)
                .send()
                .map_err(|e| format!("file status request failed: {}", e))?;
            let body = success_body(response, "file status")?;
            file = serde_json::from_str(&body)
                .map_err(|e| format!("failed to parse file status: {}", e))?;
        }

        Err(format!(
            "uploaded file {} still not active after {} checks",
            file.name, UPLOAD_POLL_ATTEMPTS
        ))
    }
}

impl Analyzer for GeminiAnalyzer {
    fn analyze(&self, record: &AudioFileRecord) -> Result<String> {
        info!("Analyzing {} with {}", record.name, self.model_name);

        let mime_type = mime_type_for(&record.format).ok_or_else(|| VoxError::UnsupportedFormat {
            path: record.path.clone(),
            format: record.format.clone(),
        })?;

        let mut file = File::open(&record.path).map_err(|e| read_error(&record.path, e))?;
        // The file may have changed since discovery
        let size = match (file.metadata(), record.size_bytes) {
            (Ok(metadata), _) => metadata.len(),
            (Err(_), Some(size)) => size,
            (Err(e), None) => return Err(read_error(&record.path, e)),
        };

        let media = if size > self.inline_limit {
            debug!("Uploading {} bytes as {} through the Files API", size, mime_type);
            let uploaded = self
                .upload(record, file, size, mime_type)
                .with_file_context(&record.path)?;
            RequestPart::FileData {
                file_data: FileData {
                    mime_type: mime_type.to_string(),
                    file_uri: uploaded.uri,
                },
            }
        } else {
            let mut audio = Vec::new();
            file.read_to_end(&mut audio)
                .map_err(|e| read_error(&record.path, e))?;
            debug!("Sending {} bytes inline as {}", audio.len(), mime_type);
            inline_part(mime_type, &audio)
        };

        let request = build_request(&self.prompts.analysis_prompt(), Some(media));
        self.generate(&request).with_file_context(&record.path)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// MIME type Gemini expects for a format tag
pub fn mime_type_for(format: &str) -> Option<&'static str> {
    match format {
        "mp3" => Some("audio/mp3"),
        "wav" => Some("audio/wav"),
        "aiff" | "aif" => Some("audio/aiff"),
        "aac" => Some("audio/aac"),
        "ogg" | "oga" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        "m4a" => Some("audio/mp4"),
        "opus" => Some("audio/opus"),
        "webm" => Some("audio/webm"),
        _ => None,
    }
}

fn read_error(path: &Path, e: io::Error) -> VoxError {
    match e.kind() {
        io::ErrorKind::NotFound => VoxError::FileNotFound(path.to_path_buf()),
        _ => VoxError::analysis_error(path, format!("failed to read file: {}", e)),
    }
}

/// Read the body of a response, turning a non-2xx status into an error
fn success_body(response: Response, what: &str) -> std::result::Result<String, String> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| format!("failed to read {} response: {}", what, e))?;

    if !status.is_success() {
        return Err(format!("{} returned {}: {}", what, status, body.trim()));
    }
    Ok(body)
}

fn inline_part(mime_type: &str, audio: &[u8]) -> RequestPart {
    RequestPart::InlineData {
        inline_data: Blob {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(audio),
        },
    }
}

fn build_request(prompt: &str, media: Option<RequestPart>) -> GenerateContentRequest {
    let mut parts = vec![RequestPart::Text {
        text: prompt.to_string(),
    }];
    parts.extend(media);
    GenerateContentRequest {
        contents: vec![RequestContent { parts }],
    }
}

fn extract_text(response: &GenerateContentResponse) -> std::result::Result<String, String> {
    let candidate = match response.candidates.first() {
        Some(c) => c,
        None => {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(format!("empty response: {}", reason));
        }
    };

    let text: String = candidate
        .content
        .as_ref()
        .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .clone()
            .unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(format!("empty response (finish reason: {})", reason));
    }

    Ok(text)
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: UploadMetadata<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadMetadata<'a> {
    display_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

/// File resource returned by the Files API
#[derive(Debug, Deserialize)]
struct UploadedFile {
    name: String,
    uri: String,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
