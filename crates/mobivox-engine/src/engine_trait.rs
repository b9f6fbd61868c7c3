use async_trait::async_trait;
use mobivox_core::{EncodedSpeech, EngineError, MobilityProfile, ProfileSummary};

/// A report engine turns a profile and its derived summary into a narrative
/// Markdown report, and optionally renders that report as speech.
#[async_trait]
pub trait ReportEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn initialize(&mut self, config: toml::Value) -> Result<(), EngineError>;

    async fn analyze(
        &self,
        profile: &MobilityProfile,
        summary: &ProfileSummary,
    ) -> Result<String, EngineError>;

    /// Synthesize speech for a report. `Ok(None)` means the engine produced
    /// no audio; the caller degrades to a silent session.
    async fn synthesize(&self, text: &str) -> Result<Option<EncodedSpeech>, EngineError>;
}
