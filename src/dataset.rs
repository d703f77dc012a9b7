use crate::models::EvaluationItem;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Load the evaluation dataset from a JSON file.
///
/// A missing file is not fatal: the run proceeds over an empty dataset after
/// a warning, so a half-configured setup still produces a (trivial) report.
/// A file that exists but cannot be read or parsed is an error.
pub fn load(path: &Path) -> Result<Vec<EvaluationItem>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            eprintln!("⚠️  Dataset no encontrado: {}", path.display());
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read dataset: {}", path.display()));
        }
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset JSON: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_parses_items() {
        let json = r#"[
            {
                "pregunta": "¿Qué es un índice vectorial?",
                "respuesta_esperada": "Una estructura para búsqueda por similitud",
                "documentos_relevantes": ["vectores.pdf"],
                "categoria": "infraestructura"
            },
            {
                "pregunta": "¿Cuántos documentos hay?"
            }
        ]"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let items = load(temp_file.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question, "¿Qué es un índice vectorial?");
        assert!(items[1].reference_answer.is_empty());
    }

    #[test]
    fn test_load_missing_file_yields_empty_dataset() {
        let items = load(Path::new("/nonexistent/dataset.json")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_load_malformed_json_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{{ not json").unwrap();

        assert!(load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_empty_array() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[]").unwrap();

        let items = load(temp_file.path()).unwrap();
        assert!(items.is_empty());
    }
}
