//! Token catalog: the static, pre-populated list of token records backing
//! metadata and asset resolution. Index 0 holds token ID 1.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// One token's catalog entry. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRecord {
    pub name: String,
    pub description: String,
    /// Attribute objects, order preserved and copied verbatim into metadata.
    #[serde(default)]
    pub attributes: Vec<Value>,
    /// Storage key of the token's image.
    pub image: String,
    /// Storage key of the token's video, when it has one.
    #[serde(default)]
    pub video: Option<String>,
}

/// Read-only catalog keyed by token index.
pub struct Catalog {
    records: Vec<TokenRecord>,
}

impl Catalog {
    /// Load the catalog from a JSON file: an array of token records.
    pub fn load(path: &str) -> Result<Self, crate::Error> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read catalog {path}: {e}")))?;
        let records: Vec<TokenRecord> = serde_json::from_str(&raw)
            .map_err(|e| crate::Error::Config(format!("Invalid catalog {path}: {e}")))?;

        info!(path, records = records.len(), "Catalog loaded");
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<TokenRecord>) -> Self {
        Self { records }
    }

    /// Record for a 1-based token ID.
    pub fn record(&self, token_id: u64) -> Option<&TokenRecord> {
        let index = usize::try_from(token_id.checked_sub(1)?).ok()?;
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> TokenRecord {
        TokenRecord {
            name: name.into(),
            description: "a token".into(),
            attributes: vec![],
            image: format!("{name}.png"),
            video: None,
        }
    }

    #[test]
    fn test_record_is_one_based() {
        let catalog = Catalog::from_records(vec![record("first"), record("second")]);
        assert_eq!(catalog.record(1).unwrap().name, "first");
        assert_eq!(catalog.record(2).unwrap().name, "second");
        assert!(catalog.record(3).is_none());
        assert!(catalog.record(0).is_none());
    }

    #[test]
    fn test_parse_optional_fields() {
        let json = r#"[{
            "name": "Piece #1",
            "description": "opening piece",
            "attributes": [{"trait_type": "Palette", "value": "Umber"}],
            "image": "piece-1.png",
            "video": "piece-1.mp4"
        }, {
            "name": "Piece #2",
            "description": "second piece",
            "image": "piece-2.png"
        }]"#;
        let records: Vec<TokenRecord> = serde_json::from_str(json).unwrap();
        let catalog = Catalog::from_records(records);

        let first = catalog.record(1).unwrap();
        assert_eq!(first.video.as_deref(), Some("piece-1.mp4"));
        assert_eq!(first.attributes.len(), 1);

        let second = catalog.record(2).unwrap();
        assert!(second.video.is_none());
        assert!(second.attributes.is_empty());
    }
}
