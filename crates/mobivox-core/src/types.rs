use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VisaRecord {
    pub country: String,
    pub visa_status: String,
}

/// A mobility profile as entered by the holder: passport identity plus
/// visa records and travel history.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MobilityProfile {
    pub passport_number: String,
    pub country: String,

    #[serde(default)]
    pub visa_records: Vec<VisaRecord>,

    #[serde(default)]
    pub travel_history: Vec<String>,
}

impl MobilityProfile {
    /// Load a profile from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        let profile: MobilityProfile = serde_json::from_str(&content)?;
        Ok(profile)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisaDetail {
    pub country: String,
    pub status: String,
}

/// Statistics derived from a profile. Serialized into the analysis prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub total_visas: usize,
    pub visited_countries: usize,
    pub visa_details: Vec<VisaDetail>,
    pub visited_details: Vec<String>,
}

/// Decoded PCM audio: one normalized f32 sequence per channel, all channels
/// the same length. Immutable once produced.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Panics if the channels are ragged: every channel must hold the same
    /// number of frames.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        if let Some(first) = channels.first() {
            assert!(
                channels.iter().all(|c| c.len() == first.len()),
                "all channels must have the same length"
            );
        }
        Self {
            channels,
            sample_rate,
        }
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f32 / self.sample_rate as f32
    }
}

/// An opaque speech payload returned by a report engine: base64-encoded
/// PCM16 little-endian samples at the declared rate and channel count.
#[derive(Debug, Clone)]
pub struct EncodedSpeech {
    pub data: String,
    pub sample_rate: u32,
    pub channels: u16,
}
