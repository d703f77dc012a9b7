use crate::models::{ItemOutcome, Report};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Print the evaluation report in the specified format
pub fn print_report(report: &Report, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_plain(report),
        OutputFormat::Json => print_json(report),
    }
}

/// Print the report in plain text format
fn print_plain(report: &Report) {
    println!("\n{}", "=".repeat(60));
    println!("📊 REPORTE DE EVALUACIÓN DEL SISTEMA RAG");
    println!("{}", "=".repeat(60));
    println!("Total de preguntas:     {}", report.total_questions);
    if report.failed_questions > 0 {
        println!("Preguntas fallidas:     {}", report.failed_questions);
    }
    println!("BLEU-like promedio:     {:.4}", report.mean_bleu);
    println!("ROUGE-1 F1 promedio:    {:.4}", report.mean_rouge1_f1);
    println!("ROUGE-L F1 promedio:    {:.4}", report.mean_rouge_l_f1);
    if let Some(retrieval) = &report.aggregates.retrieval_f1 {
        println!("Recuperación F1 prom.:  {:.4}", retrieval.mean);
    }
    let timing = &report.aggregates.response_seconds;
    println!(
        "Tiempo de respuesta (s): promedio {:.4} | min {:.4} | max {:.4}",
        timing.mean, timing.min, timing.max
    );
    println!("{}", "=".repeat(60));

    if report.detailed_results.is_empty() {
        return;
    }

    println!("\n📝 RESULTADOS DETALLADOS");
    println!("{}", "-".repeat(24));
    for (i, result) in report.detailed_results.iter().enumerate() {
        println!("[{}] {}", i + 1, result.question);
        match &result.outcome {
            ItemOutcome::Scored { metrics } => {
                println!(
                    "    BLEU-like {:.4} | ROUGE-1 F1 {:.4} | ROUGE-L F1 {:.4} | {:.4} s",
                    metrics.bleu, metrics.rouge1.f1, metrics.rouge_l.f1, metrics.response_seconds
                );
                if let Some(retrieval) = &metrics.retrieval {
                    println!(
                        "    Recuperación: P {:.4} R {:.4} F1 {:.4} (tp {}, fp {}, fn {})",
                        retrieval.precision,
                        retrieval.recall,
                        retrieval.f1,
                        retrieval.true_positives,
                        retrieval.false_positives,
                        retrieval.false_negatives
                    );
                }
            }
            ItemOutcome::Failed { error } => {
                println!("    ❌ Error: {}", error);
            }
        }
    }
}

/// Print the report in JSON format
fn print_json(report: &Report) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ItemResult, RetrievalScore, RougeScore, ScoreRecord,
    };
    use crate::report::aggregate;

    fn create_test_report() -> Report {
        let rouge = RougeScore {
            precision: 0.8,
            recall: 0.9,
            f1: 0.8471,
        };
        aggregate(vec![
            ItemResult {
                question: "¿Qué es un índice vectorial?".to_string(),
                outcome: ItemOutcome::Scored {
                    metrics: ScoreRecord {
                        bleu: 0.42,
                        rouge1: rouge,
                        rouge_l: rouge,
                        retrieval: Some(RetrievalScore {
                            precision: 0.5,
                            recall: 1.0,
                            f1: 2.0 / 3.0,
                            true_positives: 1,
                            false_positives: 1,
                            false_negatives: 0,
                        }),
                        response_seconds: 1.25,
                    },
                },
            },
            ItemResult {
                question: "¿Qué pasó aquí?".to_string(),
                outcome: ItemOutcome::Failed {
                    error: "conexión rechazada".to_string(),
                },
            },
        ])
    }

    #[test]
    fn test_plain_output_does_not_panic() {
        print_plain(&create_test_report());
    }

    #[test]
    fn test_plain_output_empty_report() {
        print_plain(&aggregate(Vec::new()));
    }

    #[test]
    fn test_json_output_does_not_panic() {
        print_json(&create_test_report());
    }

    #[test]
    fn test_print_report_both_formats() {
        let report = create_test_report();
        print_report(&report, OutputFormat::Plain);
        print_report(&report, OutputFormat::Json);
    }
}
