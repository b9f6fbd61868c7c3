use crate::engine_trait::ReportEngine;
use async_trait::async_trait;
use mobivox_core::{EncodedSpeech, EngineError, MobilityProfile, ProfileSummary};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_VOICE: &str = "Fenrir";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// The TTS endpoint returns PCM16 mono at this rate.
const SPEECH_SAMPLE_RATE: u32 = 24_000;
const SPEECH_CHANNELS: u16 = 1;

/// Remote engine backed by the Gemini generateContent API: one text call for
/// the narrative report, one audio-modality call for its speech rendition.
pub struct GeminiEngine {
    client: Option<reqwest::Client>,
    api_key: String,
    model: String,
    tts_model: String,
    voice: String,
    base_url: String,
}

impl GeminiEngine {
    pub fn new() -> Self {
        Self {
            client: None,
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    fn client(&self) -> Result<&reqwest::Client, EngineError> {
        self.client
            .as_ref()
            .ok_or_else(|| EngineError::InitializationFailed("engine not initialized".to_string()))
    }

    async fn generate(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<GenerateContentResponse, EngineError> {
        let client = self.client()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::RemoteCall(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::RemoteCall(format!(
                "HTTP {} from {}",
                status, model
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| EngineError::RemoteCall(format!("malformed response: {}", e)))
    }
}

impl Default for GeminiEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportEngine for GeminiEngine {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), EngineError> {
        let api_key = config
            .get("api_key")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                EngineError::InitializationFailed(
                    "missing 'api_key' in gemini config".to_string(),
                )
            })?;
        self.api_key = api_key.to_string();

        if let Some(model) = config.get("model").and_then(|v| v.as_str()) {
            self.model = model.to_string();
        }
        if let Some(tts_model) = config.get("tts_model").and_then(|v| v.as_str()) {
            self.tts_model = tts_model.to_string();
        }
        if let Some(voice) = config.get("voice").and_then(|v| v.as_str()) {
            self.voice = voice.to_string();
        }
        if let Some(base_url) = config.get("base_url").and_then(|v| v.as_str()) {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }

        let timeout_secs = config
            .get("timeout_secs")
            .and_then(|v| v.as_integer())
            .map(|t| t as u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EngineError::InitializationFailed(e.to_string()))?;
        self.client = Some(client);

        tracing::info!(
            model = %self.model,
            tts_model = %self.tts_model,
            voice = %self.voice,
            "GeminiEngine initialized"
        );
        Ok(())
    }

    async fn analyze(
        &self,
        profile: &MobilityProfile,
        summary: &ProfileSummary,
    ) -> Result<String, EngineError> {
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": "You are a government-grade travel analyst." }]
            },
            "contents": [{
                "parts": [{ "text": analysis_prompt(profile, summary) }]
            }]
        });

        let response = self.generate(&self.model, body).await?;
        match first_text(&response) {
            Some(text) => Ok(text),
            None => Err(EngineError::EmptyResponse),
        }
    }

    async fn synthesize(&self, text: &str) -> Result<Option<EncodedSpeech>, EngineError> {
        let speech_prompt = format!(
            "Please read this report clearly and professionally: {}",
            strip_markdown(text),
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": speech_prompt }]
            }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.voice }
                    }
                }
            }
        });

        let response = self.generate(&self.tts_model, body).await?;
        Ok(first_audio(&response).map(|data| EncodedSpeech {
            data,
            sample_rate: SPEECH_SAMPLE_RATE,
            channels: SPEECH_CHANNELS,
        }))
    }
}

/// Remove Markdown emphasis and heading markers before speech synthesis.
pub fn strip_markdown(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '#')).collect()
}

fn analysis_prompt(profile: &MobilityProfile, summary: &ProfileSummary) -> String {
    let mut dossier = serde_json::to_value(profile).unwrap_or_default();
    if let Some(map) = dossier.as_object_mut() {
        map.insert(
            "stats".to_string(),
            serde_json::to_value(summary).unwrap_or_default(),
        );
    }
    let dossier = serde_json::to_string_pretty(&dossier).unwrap_or_default();

    format!(
        "You are an expert Senior Global Mobility Consultant and Former Immigration Officer.\n\
         Analyze this passport profile.\n\n\
         User Profile:\n{dossier}\n\n\
         Provide a structured Markdown report:\n\n\
         ## Global Mobility Score: [Score]/100\n\n\
         ### Visa Portfolio Strength\n\
         [Analyze the mix of approved/pending visas. Are they Tier 1 countries?]\n\n\
         ### Travel Freedom Analysis\n\
         [Comment on the travel history. Does it show positive travel behavior?]\n\n\
         ### Strategic Recommendation\n\
         [Recommend exactly ONE specific visa to apply for next that would drastically \
         improve their mobility score. Explain why.]\n\n\
         Tone: Professional, authoritative, yet encouraging. Keep it under 200 words.",
    )
}

// ── Response shapes ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,

    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

fn first_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.text.as_ref())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn first_audio(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.as_ref())
        .map(|d| d.data.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobivox_core::{summarize, VisaRecord};

    fn gemini_config(api_key: &str) -> toml::Value {
        let mut table = toml::map::Map::new();
        table.insert(
            "api_key".to_string(),
            toml::Value::String(api_key.to_string()),
        );
        toml::Value::Table(table)
    }

    #[test]
    fn test_gemini_engine_name() {
        assert_eq!(GeminiEngine::new().name(), "gemini");
    }

    #[tokio::test]
    async fn test_initialize_missing_api_key_fails() {
        let mut engine = GeminiEngine::new();
        let result = engine.initialize(toml::Value::Table(Default::default())).await;
        match result {
            Err(EngineError::InitializationFailed(msg)) => assert!(msg.contains("api_key")),
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[tokio::test]
    async fn test_initialize_empty_api_key_fails() {
        let mut engine = GeminiEngine::new();
        assert!(engine.initialize(gemini_config("")).await.is_err());
    }

    #[tokio::test]
    async fn test_initialize_with_api_key_succeeds() {
        let mut engine = GeminiEngine::new();
        assert!(engine.initialize(gemini_config("test-key")).await.is_ok());
    }

    #[tokio::test]
    async fn test_analyze_before_initialize_fails() {
        let engine = GeminiEngine::new();
        let profile = MobilityProfile {
            passport_number: "X".to_string(),
            country: "Portugal".to_string(),
            visa_records: vec![],
            travel_history: vec![],
        };
        let summary = summarize(&profile);
        match engine.analyze(&profile, &summary).await {
            Err(EngineError::InitializationFailed(_)) => {}
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[test]
    fn test_strip_markdown_removes_emphasis_and_headings() {
        assert_eq!(
            strip_markdown("## Score\n\n**Strong** profile with *caveats*"),
            " Score\n\nStrong profile with caveats"
        );
    }

    #[test]
    fn test_strip_markdown_leaves_plain_text_alone() {
        assert_eq!(strip_markdown("plain text, 1-2-3"), "plain text, 1-2-3");
    }

    #[test]
    fn test_analysis_prompt_embeds_profile_and_stats() {
        let profile = MobilityProfile {
            passport_number: "AB1234567".to_string(),
            country: "Portugal".to_string(),
            visa_records: vec![VisaRecord {
                country: "Japan".to_string(),
                visa_status: "approved".to_string(),
            }],
            travel_history: vec!["Spain".to_string()],
        };
        let summary = summarize(&profile);
        let prompt = analysis_prompt(&profile, &summary);
        assert!(prompt.contains("AB1234567"));
        assert!(prompt.contains("\"total_visas\": 1"));
        assert!(prompt.contains("Markdown report"));
    }

    #[test]
    fn test_response_parsing_text_part() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "  ## Report body  " }] }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_text(&response).as_deref(), Some("## Report body"));
        assert!(first_audio(&response).is_none());
    }

    #[test]
    fn test_response_parsing_inline_audio_part() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAAA" } }]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_audio(&response).as_deref(), Some("AAAA"));
        assert!(first_text(&response).is_none());
    }

    #[test]
    fn test_response_parsing_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(first_text(&response).is_none());
        assert!(first_audio(&response).is_none());
    }

    #[test]
    fn test_gemini_engine_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiEngine>();
    }
}
