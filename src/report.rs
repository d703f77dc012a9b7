use crate::models::{
    Aggregates, ItemOutcome, ItemResult, MetricSummary, Report, RetrievalScore, RougeScore,
    ScoreRecord,
};
use anyhow::{Context, Result};
use std::path::Path;

/// Round to the four decimals the report format carries.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn round_rouge(score: RougeScore) -> RougeScore {
    RougeScore {
        precision: round4(score.precision),
        recall: round4(score.recall),
        f1: round4(score.f1),
    }
}

fn round_retrieval(score: RetrievalScore) -> RetrievalScore {
    RetrievalScore {
        precision: round4(score.precision),
        recall: round4(score.recall),
        f1: round4(score.f1),
        true_positives: score.true_positives,
        false_positives: score.false_positives,
        false_negatives: score.false_negatives,
    }
}

fn round_record(record: ScoreRecord) -> ScoreRecord {
    ScoreRecord {
        bleu: round4(record.bleu),
        rouge1: round_rouge(record.rouge1),
        rouge_l: round_rouge(record.rouge_l),
        retrieval: record.retrieval.map(round_retrieval),
        response_seconds: round4(record.response_seconds),
    }
}

fn round_result(result: ItemResult) -> ItemResult {
    ItemResult {
        question: result.question,
        outcome: match result.outcome {
            ItemOutcome::Scored { metrics } => ItemOutcome::Scored {
                metrics: round_record(metrics),
            },
            failed @ ItemOutcome::Failed { .. } => failed,
        },
    }
}

/// Mean/min/max of a series. All zeros for an empty series, so a run with no
/// scored items still aggregates without dividing by zero.
fn summarize(values: &[f64]) -> MetricSummary {
    if values.is_empty() {
        return MetricSummary {
            mean: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    MetricSummary {
        mean: round4(sum / values.len() as f64),
        min: round4(min),
        max: round4(max),
    }
}

/// Build the consolidated report from per-item results.
///
/// Every float is rounded to four decimals here, at construction, so the
/// in-memory report and its persisted form are the same values and a
/// persist/load cycle reproduces the report exactly. Failed items count
/// toward the total but contribute to no average. Retrieval aggregates are
/// present only when at least one item was scored against retrieval ground
/// truth.
pub fn aggregate(results: Vec<ItemResult>) -> Report {
    let results: Vec<ItemResult> = results.into_iter().map(round_result).collect();

    let records: Vec<&ScoreRecord> = results.iter().filter_map(ItemResult::metrics).collect();
    let failed_questions = results.len() - records.len();

    let bleu = summarize(&records.iter().map(|r| r.bleu).collect::<Vec<_>>());
    let rouge1_f1 = summarize(&records.iter().map(|r| r.rouge1.f1).collect::<Vec<_>>());
    let rouge_l_f1 = summarize(&records.iter().map(|r| r.rouge_l.f1).collect::<Vec<_>>());
    let response_seconds =
        summarize(&records.iter().map(|r| r.response_seconds).collect::<Vec<_>>());

    let retrieval_values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.retrieval.as_ref().map(|s| s.f1))
        .collect();
    let retrieval_f1 = if retrieval_values.is_empty() {
        None
    } else {
        Some(summarize(&retrieval_values))
    };

    Report {
        total_questions: results.len(),
        failed_questions,
        mean_bleu: bleu.mean,
        mean_rouge1_f1: rouge1_f1.mean,
        mean_rouge_l_f1: rouge_l_f1.mean,
        aggregates: Aggregates {
            bleu,
            rouge1_f1,
            rouge_l_f1,
            retrieval_f1,
            response_seconds,
        },
        detailed_results: results,
    }
}

/// Write the report as pretty-printed UTF-8 JSON in a single write.
pub fn persist(report: &Report, path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to: {}", path.display()))
}

/// Read a previously persisted report back.
pub fn load(path: &Path) -> Result<Report> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse report JSON: {}", path.display()))
}
