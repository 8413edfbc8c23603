use anyhow::{Context, Result};
use serde::Deserialize;

/// Crop-specific growing guide, keyed by a lowercase crop name.
#[derive(Debug, Clone, Deserialize)]
pub struct CropAdvice {
    pub crop: String,
    pub advice: String,
}

/// One symptom rule: any keyword substring-match selects the response.
#[derive(Debug, Clone, Deserialize)]
pub struct SymptomRule {
    pub keywords: Vec<String>,
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseEntry {
    pub name: String,
    pub causes: String,
    pub organic: String,
    pub chemical: String,
    pub info: String,
}

/// The advisor's static lookup tables.
///
/// All four tables are ordered: matching walks them front to back and the
/// first hit wins, so insertion order is part of the contract. Loaded once
/// at startup and never mutated.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub crops: Vec<CropAdvice>,
    pub symptoms: Vec<SymptomRule>,
    pub diseases: Vec<DiseaseEntry>,
    pub crop_names: Vec<String>,
}

macro_rules! knowledge_file {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/knowledge/", $file))
    };
}

impl KnowledgeBase {
    /// Parse the embedded knowledge tables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            crops: serde_json::from_str(knowledge_file!("crops.json"))
                .context("invalid crop advice table")?,
            symptoms: serde_json::from_str(knowledge_file!("symptoms.json"))
                .context("invalid symptom rule table")?,
            diseases: serde_json::from_str(knowledge_file!("diseases.json"))
                .context("invalid disease table")?,
            crop_names: serde_json::from_str(knowledge_file!("crop_names.json"))
                .context("invalid crop name list")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse() {
        let kb = KnowledgeBase::load().expect("embedded tables must parse");
        assert!(!kb.crops.is_empty());
        assert!(!kb.symptoms.is_empty());
        assert!(!kb.diseases.is_empty());
        assert!(!kb.crop_names.is_empty());
    }

    #[test]
    fn table_order_is_preserved() {
        let kb = KnowledgeBase::load().unwrap();
        // Matching is first-hit-wins, so the defined order is load-bearing.
        assert_eq!(kb.crops[0].crop, "lemon");
        assert_eq!(kb.diseases[0].name, "Early Blight");
        assert_eq!(kb.symptoms[0].keywords[0], "small");
    }

    #[test]
    fn crop_keys_are_lowercase() {
        let kb = KnowledgeBase::load().unwrap();
        for entry in &kb.crops {
            assert_eq!(entry.crop, entry.crop.to_lowercase());
        }
        for name in &kb.crop_names {
            assert_eq!(*name, name.to_lowercase());
        }
    }
}
