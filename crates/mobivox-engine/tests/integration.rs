use mobivox_core::{summarize, MobilityProfile, VisaRecord};
use mobivox_engine::{EngineRegistry, FALLBACK_REPORT};

fn sample_profile() -> MobilityProfile {
    MobilityProfile {
        passport_number: "AB1234567".to_string(),
        country: "Portugal".to_string(),
        visa_records: vec![
            VisaRecord {
                country: "Japan".to_string(),
                visa_status: "approved".to_string(),
            },
            VisaRecord {
                country: "USA".to_string(),
                visa_status: "approved".to_string(),
            },
            VisaRecord {
                country: "Brazil".to_string(),
                visa_status: "pending".to_string(),
            },
        ],
        travel_history: vec!["Spain".to_string(), "France".to_string()],
    }
}

#[tokio::test]
async fn test_registry_to_report_flow_with_null_engine() {
    let registry = EngineRegistry::new();
    let mut engine = registry.create("null").unwrap();
    engine
        .initialize(toml::Value::Table(Default::default()))
        .await
        .unwrap();

    let profile = sample_profile();
    let summary = summarize(&profile);
    assert_eq!(summary.total_visas, 3);
    assert_eq!(summary.visited_countries, 2);

    let report = engine.analyze(&profile, &summary).await.unwrap();
    assert!(report.starts_with("## Global Mobility Score"));

    let speech = engine.synthesize(&report).await.unwrap();
    assert!(speech.is_none());
}

#[tokio::test]
async fn test_gemini_engine_requires_api_key() {
    let registry = EngineRegistry::new();
    let mut engine = registry.create("gemini").unwrap();
    let result = engine
        .initialize(toml::Value::Table(Default::default()))
        .await;
    assert!(result.is_err());
}

#[test]
fn test_unknown_engine_is_rejected() {
    let registry = EngineRegistry::new();
    assert!(registry.create("does-not-exist").is_err());
}

#[test]
fn test_fallback_report_is_markdown() {
    assert!(FALLBACK_REPORT.starts_with("## "));
    assert!(FALLBACK_REPORT.contains("Unable to connect"));
}
