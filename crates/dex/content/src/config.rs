//! Configuration ingestion.
//!
//! Remote and cached documents are ingested leniently. Imports are validated
//! first and rejected as a whole.

use dex_core::{ConfigDocument, VisibilityConfig};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("config is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("config must be a JSON object")]
    NotAnObject,

    #[error("config has no `registered` list")]
    MissingRegistered,

    #[error("config `registered` must be a list")]
    RegisteredNotAList,

    #[error("config `registered` must only hold names")]
    RegisteredNotNames,

    #[error("config document is malformed: {0}")]
    Document(#[source] serde_json::Error),
}

/// Completes a config document from any source.
pub fn ingest(value: Value) -> Result<VisibilityConfig, serde_json::Error> {
    let document: ConfigDocument = serde_json::from_value(value)?;
    Ok(VisibilityConfig::from_document(document))
}

/// Validates and ingests an imported document.
///
/// The document must be an object whose `registered` key is a list of names;
/// every other key may be missing and is defaulted.
pub fn import(text: &str) -> Result<VisibilityConfig, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Json)?;
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;
    match object.get("registered") {
        None | Some(Value::Null) => return Err(ImportError::MissingRegistered),
        Some(Value::Array(names)) if names.iter().all(Value::is_string) => {}
        Some(Value::Array(_)) => return Err(ImportError::RegisteredNotNames),
        Some(_) => return Err(ImportError::RegisteredNotAList),
    }
    ingest(value).map_err(ImportError::Document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::VisibilityField;
    use serde_json::json;

    #[test]
    fn test_import_requires_registered_list() {
        assert!(matches!(import("{}"), Err(ImportError::MissingRegistered)));
        assert!(matches!(
            import(r#"{"registered": "Emberfox"}"#),
            Err(ImportError::RegisteredNotAList)
        ));
        assert!(matches!(import("[1, 2]"), Err(ImportError::NotAnObject)));
        assert!(matches!(import("{not json"), Err(ImportError::Json(_))));
        assert!(matches!(
            import(r#"{"registered": ["Emberfox", 2]}"#),
            Err(ImportError::RegisteredNotNames)
        ));
    }

    #[test]
    fn test_import_defaults_missing_keys() {
        let config = import(r#"{"registered": ["Emberfox"]}"#).unwrap();
        assert_eq!(config.registered(), ["Emberfox"]);
        assert_eq!(config.splash_count(), dex_core::DEFAULT_SPLASH_COUNT);
        assert!(config.overrides().is_empty());
        assert!(config.defaults().get(VisibilityField::PrimaryType));
    }

    #[test]
    fn test_ingest_is_lenient_about_missing_registered() {
        let config = ingest(json!({ "splashCount": 4 })).unwrap();
        assert!(config.registered().is_empty());
        assert_eq!(config.splash_count(), 4);
    }

    #[test]
    fn test_ingest_keeps_registered_when_splash_count_is_bad() {
        let config = ingest(json!({
            "registered": ["Emberfox", "Pyrovix"],
            "splashCount": "lots"
        }))
        .unwrap();
        assert_eq!(config.registered(), ["Emberfox", "Pyrovix"]);
        assert_eq!(config.splash_count(), dex_core::DEFAULT_SPLASH_COUNT);
    }
}
