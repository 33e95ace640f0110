/// Endpoints the controller talks to, loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub store_base_url: String,
    pub api_base_url: String,
}

impl RemoteConfig {
    pub fn new(store_base_url: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            store_base_url: store_base_url.into(),
            api_base_url: api_base_url.into(),
        }
    }
}

/// Write-once holder for the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigState {
    /// Nothing loaded yet; submissions are refused.
    #[default]
    NotLoaded,
    Loaded(RemoteConfig),
    /// Loading failed with the given diagnostic; the controller stays inert.
    Failed(String),
}

impl ConfigState {
    pub fn loaded(&self) -> Option<&RemoteConfig> {
        match self {
            ConfigState::Loaded(config) => Some(config),
            ConfigState::NotLoaded | ConfigState::Failed(_) => None,
        }
    }
}
