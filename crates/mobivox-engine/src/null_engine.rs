use crate::engine_trait::ReportEngine;
use async_trait::async_trait;
use mobivox_core::{EncodedSpeech, EngineError, MobilityProfile, ProfileSummary};
use std::fmt::Write as _;

/// Offline engine: renders a deterministic report straight from the derived
/// summary. No network, no speech. Used in tests and as a keyless fallback.
pub struct NullEngine;

impl NullEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), EngineError> {
        Ok(())
    }

    async fn analyze(
        &self,
        profile: &MobilityProfile,
        summary: &ProfileSummary,
    ) -> Result<String, EngineError> {
        let breakdown = summary.status_breakdown();
        let approved = breakdown.get("approved").copied().unwrap_or(0);
        let score = (approved * 20 + summary.visited_countries * 10).min(100);

        let mut report = format!("## Global Mobility Score: {}/100\n\n", score);

        report.push_str("### Visa Portfolio Strength\n");
        if summary.total_visas == 0 {
            report.push_str("No visa records on file.\n\n");
        } else {
            let statuses: Vec<String> = breakdown
                .iter()
                .map(|(status, count)| format!("{} {}", count, status))
                .collect();
            let _ = writeln!(
                report,
                "{} visa record(s) for passport holder from {}: {}.\n",
                summary.total_visas,
                profile.country,
                statuses.join(", "),
            );
        }

        report.push_str("### Travel Freedom Analysis\n");
        let _ = writeln!(
            report,
            "{} countries visited to date.\n",
            summary.visited_countries,
        );

        report.push_str("### Strategic Recommendation\n");
        report.push_str("Offline mode: connect a remote engine for tailored guidance.\n");

        Ok(report)
    }

    async fn synthesize(&self, _text: &str) -> Result<Option<EncodedSpeech>, EngineError> {
        Ok(None)
    }
}
