pub mod engine_trait;
pub mod gemini_engine;
pub mod null_engine;
pub mod registry;

pub use engine_trait::ReportEngine;
pub use gemini_engine::{strip_markdown, GeminiEngine};
pub use null_engine::NullEngine;
pub use registry::EngineRegistry;

/// Shown in place of a report when the remote analysis call fails.
pub const FALLBACK_REPORT: &str = "## System Error\n\nUnable to connect to the Global Mobility Database. Please verify your API configuration.";
