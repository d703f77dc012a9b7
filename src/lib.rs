//! Evaluation metrics and harness for retrieval-augmented answer generation.
//!
//! The crate scores generated answers against a labeled dataset with a
//! BLEU-like n-gram overlap, ROUGE-1 and ROUGE-L, and set-overlap retrieval
//! quality, then consolidates everything into a deterministic JSON report.
//! The system under evaluation sits behind the [`oracle::Oracle`] trait; the
//! bundled implementation talks to an HTTP service, tests use stubs.

pub mod config;
pub mod dataset;
pub mod manual;
pub mod metrics;
pub mod models;
pub mod oracle;
pub mod output;
pub mod report;
pub mod runner;
