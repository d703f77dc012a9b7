use crate::oracle::Oracle;
use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

/// A dimension rated during the manual session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingDimension {
    Relevance,
    Coherence,
    Precision,
}

impl RatingDimension {
    /// Prompt label shown to the rater.
    pub fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevancia",
            Self::Coherence => "Coherencia",
            Self::Precision => "Precisión",
        }
    }
}

/// Where 1-5 ratings come from. The session runs against a console in
/// production and a scripted double in tests.
pub trait RatingSource {
    /// Ask for a rating of one dimension for the given question.
    fn ask(&mut self, question: &str, dimension: RatingDimension) -> Result<u8>;
}

/// Console rating source: prompts on stdout and re-prompts until it reads an
/// integer in 1..=5. Closed stdin ends the session with an error.
pub struct ConsoleRatings;

impl RatingSource for ConsoleRatings {
    fn ask(&mut self, _question: &str, dimension: RatingDimension) -> Result<u8> {
        let stdin = std::io::stdin();
        loop {
            print!("{} (1-5): ", dimension.label());
            std::io::stdout().flush().context("Failed to flush stdout")?;

            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .context("Failed to read rating")?;
            if read == 0 {
                bail!("Rating input closed before the session finished");
            }

            match line.trim().parse::<u8>() {
                Ok(value @ 1..=5) => return Ok(value),
                _ => println!("Ingresa un número entero entre 1 y 5."),
            }
        }
    }
}

/// The three ratings collected for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualRating {
    pub question: String,
    pub relevance: u8,
    pub coherence: u8,
    pub precision: u8,
}

impl ManualRating {
    /// Mean of the three dimensions for this question.
    pub fn average(&self) -> f64 {
        f64::from(self.relevance as u16 + self.coherence as u16 + self.precision as u16) / 3.0
    }
}

/// Averages across a whole manual session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualSummary {
    pub relevance: f64,
    pub coherence: f64,
    pub precision: f64,
    pub overall: f64,
}

impl ManualSummary {
    /// Per-dimension means plus the mean of per-question averages. All zeros
    /// for an empty session.
    pub fn from_ratings(ratings: &[ManualRating]) -> Self {
        if ratings.is_empty() {
            return Self {
                relevance: 0.0,
                coherence: 0.0,
                precision: 0.0,
                overall: 0.0,
            };
        }

        let count = ratings.len() as f64;
        let mean = |extract: fn(&ManualRating) -> f64| -> f64 {
            ratings.iter().map(extract).sum::<f64>() / count
        };

        Self {
            relevance: mean(|r| f64::from(r.relevance)),
            coherence: mean(|r| f64::from(r.coherence)),
            precision: mean(|r| f64::from(r.precision)),
            overall: mean(ManualRating::average),
        }
    }
}

/// Run the interactive rating session: ask the oracle each question, show
/// the answer, collect the three ratings. Strictly sequential; every prompt
/// blocks on the rating source.
pub async fn run_session(
    oracle: &dyn Oracle,
    questions: &[String],
    ratings_from: &mut dyn RatingSource,
) -> Result<Vec<ManualRating>> {
    if questions.is_empty() {
        println!("No hay preguntas configuradas para la evaluación manual.");
        return Ok(Vec::new());
    }

    println!("\n📋 Evaluación Manual");
    println!("Califica cada respuesta de 1 a 5.");

    let mut ratings = Vec::with_capacity(questions.len());
    for question in questions {
        println!("\n{}", "=".repeat(60));
        println!("❓ {question}");
        println!("{}", "=".repeat(60));

        let answer = oracle
            .answer(question)
            .await
            .with_context(|| format!("Oracle failed for: {question}"))?;

        println!("\n💬 Respuesta:\n{}", answer.answer);
        if !answer.sources.is_empty() {
            println!("\n📚 {} fuentes consultadas", answer.sources.len());
        }
        println!();

        let relevance = ratings_from.ask(question, RatingDimension::Relevance)?;
        let coherence = ratings_from.ask(question, RatingDimension::Coherence)?;
        let precision = ratings_from.ask(question, RatingDimension::Precision)?;

        ratings.push(ManualRating {
            question: question.clone(),
            relevance,
            coherence,
            precision,
        });
    }

    print_summary(&ManualSummary::from_ratings(&ratings));
    Ok(ratings)
}

fn print_summary(summary: &ManualSummary) {
    println!("\n{}", "=".repeat(60));
    println!("📊 RESUMEN DE EVALUACIÓN MANUAL");
    println!("{}", "=".repeat(60));
    println!("Relevancia promedio:  {:.2}/5", summary.relevance);
    println!("Coherencia promedio:  {:.2}/5", summary.coherence);
    println!("Precisión promedio:   {:.2}/5", summary.precision);
    println!("Calificación general: {:.2}/5", summary.overall);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OracleAnswer;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    struct EchoOracle;

    #[async_trait]
    impl Oracle for EchoOracle {
        async fn answer(&self, question: &str) -> Result<OracleAnswer> {
            Ok(OracleAnswer {
                answer: format!("Respuesta a: {question}"),
                sources: Vec::new(),
            })
        }
    }

    struct FailingOracle;

    #[async_trait]
    impl Oracle for FailingOracle {
        async fn answer(&self, _question: &str) -> Result<OracleAnswer> {
            Err(anyhow::anyhow!("servicio no disponible"))
        }
    }

    /// Rating source that replays a fixed script of values.
    struct ScriptedRatings {
        values: VecDeque<u8>,
        asked: Vec<(String, RatingDimension)>,
    }

    impl ScriptedRatings {
        fn new(values: &[u8]) -> Self {
            Self {
                values: values.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl RatingSource for ScriptedRatings {
        fn ask(&mut self, question: &str, dimension: RatingDimension) -> Result<u8> {
            self.asked.push((question.to_string(), dimension));
            self.values
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    fn questions(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_session_collects_three_ratings_per_question() {
        let mut source = ScriptedRatings::new(&[5, 4, 3, 2, 1, 5]);
        let ratings = run_session(
            &EchoOracle,
            &questions(&["¿Primera?", "¿Segunda?"]),
            &mut source,
        )
        .await
        .unwrap();

        assert_eq!(
            ratings,
            vec![
                ManualRating {
                    question: "¿Primera?".to_string(),
                    relevance: 5,
                    coherence: 4,
                    precision: 3,
                },
                ManualRating {
                    question: "¿Segunda?".to_string(),
                    relevance: 2,
                    coherence: 1,
                    precision: 5,
                },
            ]
        );

        // Dimensions are always asked in the same order.
        let dimensions: Vec<RatingDimension> =
            source.asked.iter().map(|(_, d)| *d).collect();
        assert_eq!(
            dimensions,
            vec![
                RatingDimension::Relevance,
                RatingDimension::Coherence,
                RatingDimension::Precision,
                RatingDimension::Relevance,
                RatingDimension::Coherence,
                RatingDimension::Precision,
            ]
        );
    }

    #[tokio::test]
    async fn test_session_without_questions_asks_nothing() {
        let mut source = ScriptedRatings::new(&[]);
        let ratings = run_session(&EchoOracle, &[], &mut source).await.unwrap();

        assert!(ratings.is_empty());
        assert!(source.asked.is_empty());
    }

    #[tokio::test]
    async fn test_session_propagates_oracle_failure() {
        let mut source = ScriptedRatings::new(&[5, 5, 5]);
        let result = run_session(&FailingOracle, &questions(&["¿Algo?"]), &mut source).await;

        assert!(result.is_err());
        assert!(source.asked.is_empty());
    }

    #[test]
    fn test_rating_average() {
        let rating = ManualRating {
            question: "q".to_string(),
            relevance: 5,
            coherence: 4,
            precision: 3,
        };
        assert_eq!(rating.average(), 4.0);
    }

    #[test]
    fn test_summary_averages_per_dimension_and_overall() {
        let ratings = vec![
            ManualRating {
                question: "a".to_string(),
                relevance: 5,
                coherence: 3,
                precision: 4,
            },
            ManualRating {
                question: "b".to_string(),
                relevance: 3,
                coherence: 5,
                precision: 4,
            },
        ];

        let summary = ManualSummary::from_ratings(&ratings);
        assert_eq!(summary.relevance, 4.0);
        assert_eq!(summary.coherence, 4.0);
        assert_eq!(summary.precision, 4.0);
        assert_eq!(summary.overall, 4.0);
    }

    #[test]
    fn test_summary_of_empty_session_is_zero() {
        let summary = ManualSummary::from_ratings(&[]);
        assert_eq!(summary.relevance, 0.0);
        assert_eq!(summary.overall, 0.0);
    }

    #[test]
    fn test_dimension_labels() {
        assert_eq!(RatingDimension::Relevance.label(), "Relevancia");
        assert_eq!(RatingDimension::Coherence.label(), "Coherencia");
        assert_eq!(RatingDimension::Precision.label(), "Precisión");
    }
}
