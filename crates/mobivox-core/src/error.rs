use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse profile JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("invalid base64 payload: {0}")]
    Decode(String),

    #[error("payload length {len} is not divisible by 2 x {channels} channel(s)")]
    Format { len: usize, channels: u16 },

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to enumerate devices: {0}")]
    DeviceEnumeration(String),

    #[error("failed to build stream: {0}")]
    StreamBuild(String),

    #[error("audio output access denied: {0}")]
    PermissionDenied(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    InitializationFailed(String),

    #[error("remote call failed: {0}")]
    RemoteCall(String),

    #[error("remote response contained no usable content")]
    EmptyResponse,

    #[error("report engine not found: {0}")]
    EngineNotFound(String),
}
