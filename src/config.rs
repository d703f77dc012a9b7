use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a single evaluation run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Path of the labeled dataset JSON
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Path the consolidated report is written to
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    /// N-gram order for the BLEU-like overlap score
    #[serde(default = "default_ngram_order")]
    pub ngram_order: usize,
    /// Items evaluated in flight at once; 1 means strictly sequential
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Questions for the interactive rating session
    #[serde(default)]
    pub manual_questions: Vec<String>,
    /// Oracle endpoint settings
    pub oracle: OracleConfig,
}

/// How to reach the answer-generation service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// URL answering the consultation contract
    pub endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset_evaluacion.json")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("reporte_evaluacion.json")
}

fn default_ngram_order() -> usize {
    4
}

fn default_concurrency() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    300
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_parsing() {
        let toml_content = r#"
dataset_path = "data/preguntas.json"
report_path = "out/reporte.json"
ngram_order = 2
concurrency = 4
manual_questions = ["¿Qué es RAG?", "¿Cómo se indexan los documentos?"]

[oracle]
endpoint = "http://localhost:8000/consulta"
timeout_secs = 30
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = RunConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("data/preguntas.json"));
        assert_eq!(config.report_path, PathBuf::from("out/reporte.json"));
        assert_eq!(config.ngram_order, 2);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.manual_questions.len(), 2);
        assert_eq!(config.oracle.endpoint, "http://localhost:8000/consulta");
        assert_eq!(config.oracle.timeout_secs, 30);
    }

    #[test]
    fn test_config_defaults() {
        let toml_content = r#"
[oracle]
endpoint = "http://localhost:8000/consulta"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = RunConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("dataset_evaluacion.json"));
        assert_eq!(config.report_path, PathBuf::from("reporte_evaluacion.json"));
        assert_eq!(config.ngram_order, 4);
        assert_eq!(config.concurrency, 1);
        assert!(config.manual_questions.is_empty());
        assert_eq!(config.oracle.timeout_secs, 300);
    }

    #[test]
    fn test_config_missing_oracle_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "ngram_order = 4\n").unwrap();

        let result = RunConfig::from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_config_missing_file_is_an_error() {
        let result = RunConfig::from_file(Path::new("/nonexistent/run.toml"));
        assert!(result.is_err());
    }
}
