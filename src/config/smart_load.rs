use figment::providers::{Format, Json, Toml};
use std::path::Path;

/// Pick a file provider from the file extension. Unknown extensions are
/// sniffed: documents starting with `{` are JSON, everything else TOML.
pub fn auto<P: AsRef<Path>>(path: P) -> impl figment::Provider {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => SmartProvider::Json(Json::file(path)),
        "toml" => SmartProvider::Toml(Toml::file(path)),
        _ => match std::fs::read_to_string(path) {
            Ok(content) if content.trim_start().starts_with('{') => {
                tracing::trace!("Detected JSON settings in {}", path.display());
                SmartProvider::Json(Json::file(path))
            }
            _ => SmartProvider::Toml(Toml::file(path)),
        },
    }
}

/// Wrapper enum to handle different provider types
enum SmartProvider {
    Toml(figment::providers::Data<Toml>),
    Json(figment::providers::Data<Json>),
}

impl figment::Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
        }
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
        }
    }
}
