use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One labeled question from the evaluation dataset.
///
/// The dataset is JSON with Spanish field names; `respuesta_referencia` is
/// accepted as a legacy alias for the reference answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationItem {
    /// Question posed to the oracle
    #[serde(rename = "pregunta")]
    pub question: String,
    /// Reference answer the generated text is scored against
    #[serde(
        rename = "respuesta_esperada",
        alias = "respuesta_referencia",
        default
    )]
    pub reference_answer: String,
    /// Identifiers of the documents a correct retrieval should surface
    #[serde(rename = "documentos_relevantes", default)]
    pub relevant_documents: HashSet<String>,
    /// Free-form category label, kept for per-category analysis
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
}

/// Answer returned by the oracle for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleAnswer {
    /// Generated answer text
    #[serde(rename = "respuesta")]
    pub answer: String,
    /// Retrieved fragments, in retrieval rank order
    #[serde(rename = "fuentes", default)]
    pub sources: Vec<SourceDocument>,
}

/// One retrieved fragment with its provenance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Text of the fragment
    pub page_content: String,
    /// Where the fragment came from
    pub metadata: SourceMetadata,
}

/// Provenance of a retrieved fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document identifier, compared against `relevant_documents`
    pub source: String,
    /// Page within the document, when the loader provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRef>,
}

/// Page references arrive as numbers from PDF loaders and as free text from
/// other splitters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRef {
    Number(i64),
    Label(String),
}

/// Precision/recall/F1 triple for one ROUGE variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// ROUGE-1 and ROUGE-L for one reference/candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RougeScores {
    pub rouge1: RougeScore,
    pub rouge_l: RougeScore,
}

/// Set-overlap retrieval quality: counts and the ratios derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalScore {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1_score")]
    pub f1: f64,
    #[serde(rename = "tp")]
    pub true_positives: usize,
    #[serde(rename = "fp")]
    pub false_positives: usize,
    #[serde(rename = "fn")]
    pub false_negatives: usize,
}

/// All scores computed for one evaluated item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Single-order clipped n-gram precision (BLEU-like, no brevity penalty)
    pub bleu: f64,
    pub rouge1: RougeScore,
    #[serde(rename = "rougeL")]
    pub rouge_l: RougeScore,
    /// Absent when the dataset item carries no retrieval ground truth
    #[serde(rename = "recuperacion", default, skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<RetrievalScore>,
    /// Wall-clock seconds for the oracle call
    #[serde(rename = "tiempo_respuesta")]
    pub response_seconds: f64,
}

/// Outcome for one dataset item: scored or failed, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemOutcome {
    Scored {
        #[serde(rename = "metricas")]
        metrics: ScoreRecord,
    },
    Failed {
        error: String,
    },
}

/// Per-item entry of the consolidated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    #[serde(rename = "pregunta")]
    pub question: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

impl ItemResult {
    /// Scores, if the item was evaluated successfully.
    pub fn metrics(&self) -> Option<&ScoreRecord> {
        match &self.outcome {
            ItemOutcome::Scored { metrics } => Some(metrics),
            ItemOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Failed { .. })
    }
}

/// Mean/min/max of one metric across a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    #[serde(rename = "promedio")]
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-metric summaries for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub bleu: MetricSummary,
    pub rouge1_f1: MetricSummary,
    #[serde(rename = "rougeL_f1")]
    pub rouge_l_f1: MetricSummary,
    /// Absent when no dataset item carries retrieval ground truth
    #[serde(rename = "recuperacion_f1", default, skip_serializing_if = "Option::is_none")]
    pub retrieval_f1: Option<MetricSummary>,
    #[serde(rename = "tiempo_respuesta")]
    pub response_seconds: MetricSummary,
}

/// Consolidated evaluation report. This struct is the canonical serialized
/// form: field order here is the key order in the persisted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "total_preguntas")]
    pub total_questions: usize,
    #[serde(rename = "preguntas_fallidas")]
    pub failed_questions: usize,
    #[serde(rename = "promedio_bleu")]
    pub mean_bleu: f64,
    #[serde(rename = "promedio_rouge1_f1")]
    pub mean_rouge1_f1: f64,
    #[serde(rename = "promedio_rougeL_f1")]
    pub mean_rouge_l_f1: f64,
    #[serde(rename = "agregados")]
    pub aggregates: Aggregates,
    #[serde(rename = "resultados_detallados")]
    pub detailed_results: Vec<ItemResult>,
}
