//! Structured output for the command line.
//!
//! JSON and YAML serialize the value as-is. CSV flattens it to one row per
//! token through [`Tabular`].

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use tokenforge::{Category, DesignTokens, SimpleDesignTokens};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Csv,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),
}

/// Values that can be written as CSV rows.
pub trait Tabular {
    fn headers(&self) -> &'static [&'static str];
    fn rows(&self) -> Vec<Vec<String>>;
}

impl Tabular for DesignTokens {
    fn headers(&self) -> &'static [&'static str] {
        &["category", "key", "value", "type", "description"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.entries()
            .into_iter()
            .map(|(category, key, token)| {
                vec![
                    category.to_string(),
                    key.to_string(),
                    token.value.to_simple_string(),
                    token.token_type.to_string(),
                    token.description.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }
}

impl Tabular for SimpleDesignTokens {
    fn headers(&self) -> &'static [&'static str] {
        &["category", "key", "value"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let strings = [
            ("colors", &self.colors),
            ("spacing", &self.spacing),
            ("radius", &self.radius),
            ("shadows", &self.shadows),
            ("typography", &self.typography),
            ("animation", &self.animation),
            ("borders", &self.borders),
        ];
        let mut rows: Vec<Vec<String>> = strings
            .into_iter()
            .filter_map(|(category, map)| map.as_ref().map(|map| (category, map)))
            .flat_map(|(category, map)| {
                map.iter()
                    .map(move |(key, value)| vec![category.to_string(), key.clone(), value.clone()])
            })
            .collect();
        if let Some(opacity) = &self.opacity {
            rows.extend(
                opacity
                    .iter()
                    .map(|(key, value)| vec!["opacity".to_string(), key.clone(), value.to_string()]),
            );
        }
        rows
    }
}

/// One `classify` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub key: String,
    pub category: String,
}

impl Classification {
    pub fn new(key: &str, category: Category) -> Self {
        Self {
            key: key.to_string(),
            category: category.to_string(),
        }
    }
}

impl Tabular for Vec<Classification> {
    fn headers(&self) -> &'static [&'static str] {
        &["key", "category"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|c| vec![c.key.clone(), c.category.clone()])
            .collect()
    }
}

/// Serializes `data` in `format`.
pub fn render<T: Serialize + Tabular>(data: &T, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Csv => to_csv(data),
    }
}

fn to_csv<T: Tabular>(data: &T) -> Result<String, OutputError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(data.headers())
        .map_err(|e| OutputError::Csv(e.to_string()))?;
    for row in data.rows() {
        wtr.write_record(&row)
            .map_err(|e| OutputError::Csv(e.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| OutputError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| OutputError::Csv(e.to_string()))
}
