use crate::config::RunConfig;
use crate::dataset;
use crate::metrics;
use crate::models::{
    EvaluationItem, ItemOutcome, ItemResult, OracleAnswer, Report, ScoreRecord,
};
use crate::oracle::Oracle;
use crate::report;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Orchestrates a batch evaluation run: dataset in, consolidated report out.
pub struct Runner {
    config: RunConfig,
    oracle: Arc<dyn Oracle>,
    verbose: bool,
}

impl Runner {
    /// Create a new runner over the given oracle
    pub fn new(config: RunConfig, oracle: Arc<dyn Oracle>, verbose: bool) -> Self {
        Self {
            config,
            oracle,
            verbose,
        }
    }

    /// Run the full evaluation: load the dataset, score every item, persist
    /// the report and return it.
    pub async fn run(&self) -> Result<Report> {
        let items = dataset::load(&self.config.dataset_path)?;
        println!("🧪 Evaluando {} preguntas...", items.len());
        if self.verbose {
            println!(
                "Orden de n-grama: {}, concurrencia: {}",
                self.config.ngram_order, self.config.concurrency
            );
        }

        let results = self.evaluate_items(items).await?;
        let report = report::aggregate(results);

        report::persist(&report, &self.config.report_path)?;
        println!(
            "✅ Reporte guardado en: {}",
            self.config.report_path.display()
        );

        Ok(report)
    }

    /// Evaluate all items, sequentially or with bounded fan-out. Results come
    /// back in dataset order either way.
    pub async fn evaluate_items(&self, items: Vec<EvaluationItem>) -> Result<Vec<ItemResult>> {
        let concurrency = self.config.concurrency.max(1);
        if concurrency == 1 {
            self.evaluate_sequential(items).await
        } else {
            self.evaluate_concurrent(items, concurrency).await
        }
    }

    async fn evaluate_sequential(&self, items: Vec<EvaluationItem>) -> Result<Vec<ItemResult>> {
        let total = items.len();
        let mut results = Vec::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            log_progress(index + 1, total, &item.question);
            if self.verbose {
                println!("  → Consultando al oráculo");
            }
            results.push(evaluate_item(self.oracle.as_ref(), &item, self.config.ngram_order).await);
        }

        Ok(results)
    }

    /// Fan out over a semaphore so at most `concurrency` oracle calls are in
    /// flight, then reorder the completions back to dataset order.
    async fn evaluate_concurrent(
        &self,
        items: Vec<EvaluationItem>,
        concurrency: usize,
    ) -> Result<Vec<ItemResult>> {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();

        for (index, item) in items.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("Failed to acquire evaluation slot")?;
            let oracle = Arc::clone(&self.oracle);
            let ngram_order = self.config.ngram_order;

            tasks.spawn(async move {
                let _permit = permit;
                log_progress(index + 1, total, &item.question);
                (index, evaluate_item(oracle.as_ref(), &item, ngram_order).await)
            });
        }

        let mut indexed = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            indexed.push(joined.context("Evaluation task panicked")?);
        }
        indexed.sort_by_key(|(index, _)| *index);

        Ok(indexed.into_iter().map(|(_, result)| result).collect())
    }
}

/// Evaluate one item: a single timed oracle call, then scoring. An oracle
/// failure becomes a failure marker in the results instead of aborting the
/// batch.
async fn evaluate_item(oracle: &dyn Oracle, item: &EvaluationItem, ngram_order: usize) -> ItemResult {
    let started = Instant::now();
    let outcome = match oracle.answer(&item.question).await {
        Ok(answer) => {
            let response_seconds = started.elapsed().as_secs_f64();
            ItemOutcome::Scored {
                metrics: score_answer(item, &answer, ngram_order, response_seconds),
            }
        }
        Err(err) => {
            eprintln!("❌ Error en \"{}\": {:#}", truncate(&item.question, 50), err);
            ItemOutcome::Failed {
                error: format!("{err:#}"),
            }
        }
    };

    ItemResult {
        question: item.question.clone(),
        outcome,
    }
}

/// Score one answer against its dataset item. Retrieval is only scored when
/// the item names relevant documents; sources are identified by their
/// `source` metadata, deduplicated as a set.
fn score_answer(
    item: &EvaluationItem,
    answer: &OracleAnswer,
    ngram_order: usize,
    response_seconds: f64,
) -> ScoreRecord {
    let rouge = metrics::rouge_scores(&item.reference_answer, &answer.answer);

    let retrieval = if item.relevant_documents.is_empty() {
        None
    } else {
        let recovered: HashSet<String> = answer
            .sources
            .iter()
            .map(|source| source.metadata.source.clone())
            .collect();
        Some(metrics::retrieval_score(&item.relevant_documents, &recovered))
    };

    ScoreRecord {
        bleu: metrics::ngram_overlap(&item.reference_answer, &answer.answer, ngram_order),
        rouge1: rouge.rouge1,
        rouge_l: rouge.rouge_l,
        retrieval,
        response_seconds,
    }
}

fn log_progress(num: usize, total: usize, question: &str) {
    println!("[{}/{}] {}...", num, total, truncate(question, 50));
}

/// First `max_chars` characters, whole. Questions are UTF-8 and byte
/// truncation could split a code point.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
