pub mod config;
pub mod error;
pub mod summary;
pub mod types;

pub use config::AppConfig;
pub use error::{AudioError, ConfigError, EngineError, ProfileError};
pub use summary::summarize;
pub use types::{
    EncodedSpeech, MobilityProfile, ProfileSummary, SampleBuffer, VisaDetail, VisaRecord,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_buffer_creation() {
        let buffer = SampleBuffer::new(vec![vec![0.0, 0.5, -0.5, 1.0]], 24000);
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.frame_count(), 4);
        assert_eq!(buffer.sample_rate(), 24000);
    }

    #[test]
    fn test_visa_record_fields() {
        let record = VisaRecord {
            country: "Japan".to_string(),
            visa_status: "approved".to_string(),
        };
        assert_eq!(record.country, "Japan");
        assert_eq!(record.visa_status, "approved");
    }

    #[test]
    fn test_encoded_speech_fields() {
        let speech = EncodedSpeech {
            data: "AAAA".to_string(),
            sample_rate: 24000,
            channels: 1,
        };
        assert_eq!(speech.data, "AAAA");
        assert_eq!(speech.sample_rate, 24000);
        assert_eq!(speech.channels, 1);
    }
}
