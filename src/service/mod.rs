//! Plagiarism service facade.
//!
//! Construction loads the corpus and builds both indices once. Afterwards every
//! query path takes `&self`, so one instance is shared behind an `Arc`.
//!
//! [`PlagiarismService::new`] never fails: a missing corpus or a failed build
//! leaves the service not ready, and every [`check`](PlagiarismService::check)
//! reports [`ServiceError::NotReady`] with the construction failure as its reason. Use
//! [`PlagiarismService::try_new`] to surface construction failures directly.

mod error;
mod verdict;


pub use error::ServiceError;
pub use verdict::Verdict;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::config::EngineConfig;
use crate::constants::round_to;
use crate::corpus::{Document, load_corpus};
use crate::embedding::SentenceEmbedder;
use crate::lexical::LexicalIndex;
use crate::pipeline::QueryPipeline;
use crate::scoring::ScoreFusion;
use crate::semantic::SemanticIndex;

struct Ready {
    documents: Arc<[Document]>,
    pipeline: QueryPipeline,
}

enum ServiceState {
    Ready(Box<Ready>),
    Unavailable { reason: String },
}

pub struct PlagiarismService {
    config: EngineConfig,
    embedder: Arc<SentenceEmbedder>,
    fusion: ScoreFusion,
    state: ServiceState,
}

impl std::fmt::Debug for PlagiarismService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlagiarismService")
            .field("ready", &self.is_ready())
            .field("documents", &self.document_count())
            .field("config", &self.config)
            .finish()
    }
}

impl PlagiarismService {
    /// Builds the service, degrading to not-ready on any construction failure.
    pub fn new(
        config: EngineConfig,
        corpus_path: impl AsRef<Path>,
        embedder: Arc<SentenceEmbedder>,
    ) -> Self {
        match Self::try_new(config.clone(), corpus_path, embedder.clone()) {
            Ok(service) => service,
            Err(e) => {
                error!(error = %e, "Plagiarism service unavailable");
                Self::unavailable(config, embedder, e.to_string())
            }
        }
    }

    /// Builds the service or returns the construction failure.
    pub fn try_new(
        config: EngineConfig,
        corpus_path: impl AsRef<Path>,
        embedder: Arc<SentenceEmbedder>,
    ) -> Result<Self, ServiceError> {
        let documents =
            load_corpus(corpus_path).map_err(|e| ServiceError::CorpusUnavailable {
                reason: e.to_string(),
            })?;
        Self::from_documents(config, documents, embedder)
    }

    /// Builds both indices over an in-memory corpus.
    ///
    /// Documents are renumbered by position, so `corpus_doc_{i}` always names the
    /// `i`-th document handed in regardless of the incoming `index` values.
    pub fn from_documents(
        config: EngineConfig,
        documents: Vec<Document>,
        embedder: Arc<SentenceEmbedder>,
    ) -> Result<Self, ServiceError> {
        if documents.is_empty() {
            return Err(ServiceError::CorpusUnavailable {
                reason: "corpus contains no documents".to_string(),
            });
        }

        config
            .validate()
            .map_err(|e| ServiceError::IndexBuildFailure {
                reason: e.to_string(),
            })?;

        let started = Instant::now();
        let documents: Arc<[Document]> = documents
            .into_iter()
            .enumerate()
            .map(|(position, doc)| Document::new(position, doc.text))
            .collect();

        let lexical = LexicalIndex::build(
            documents.clone(),
            config.permutations,
            config.lsh_threshold,
            config.k_lexical,
        )
        .map_err(|e| ServiceError::IndexBuildFailure {
            reason: e.to_string(),
        })?;

        let semantic = SemanticIndex::build(documents.clone(), embedder.clone(), config.k_semantic)
            .map_err(|e| ServiceError::IndexBuildFailure {
                reason: e.to_string(),
            })?;

        info!(
            documents = documents.len(),
            model = %config.embedding_model_id,
            stub_embedder = embedder.is_stub(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Plagiarism service ready"
        );

        Ok(Self {
            fusion: ScoreFusion::from_config(&config),
            config,
            embedder,
            state: ServiceState::Ready(Box::new(Ready {
                documents,
                pipeline: QueryPipeline::new(lexical, semantic),
            })),
        })
    }

    fn unavailable(config: EngineConfig, embedder: Arc<SentenceEmbedder>, reason: String) -> Self {
        Self {
            fusion: ScoreFusion::from_config(&config),
            config,
            embedder,
            state: ServiceState::Unavailable { reason },
        }
    }

    /// Scores `text` against the corpus.
    pub fn check(&self, text: &str) -> Result<Verdict, ServiceError> {
        let started = Instant::now();

        let ready = match &self.state {
            ServiceState::Ready(ready) => ready,
            ServiceState::Unavailable { reason } => {
                return Err(ServiceError::NotReady {
                    reason: reason.clone(),
                });
            }
        };

        let channels = ready.pipeline.run(text)?;
        let fused = self.fusion.fuse(&channels.lexical, &channels.semantic);
        let matches = channels.combined();

        let processing_time_s = round_to(started.elapsed().as_secs_f64(), 3);

        info!(
            sentences = channels.sentences.len(),
            overall = fused.overall,
            lexical_matches = channels.lexical.len(),
            semantic_matches = channels.semantic.len(),
            processing_time_s,
            "Plagiarism check complete"
        );

        Ok(Verdict {
            overall_similarity: fused.overall,
            lexical_breakdown: fused.lexical_breakdown,
            semantic_breakdown: fused.semantic_breakdown,
            processing_time_s,
            matches,
            lexical_matches: channels.lexical,
            semantic_matches: channels.semantic,
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    /// Why the service is not ready, if it isn't.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            ServiceState::Ready(_) => None,
            ServiceState::Unavailable { reason } => Some(reason),
        }
    }

    /// Number of corpus documents indexed (zero when not ready).
    pub fn document_count(&self) -> usize {
        match &self.state {
            ServiceState::Ready(ready) => ready.documents.len(),
            ServiceState::Unavailable { .. } => 0,
        }
    }

    pub fn embedder(&self) -> &Arc<SentenceEmbedder> {
        &self.embedder
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
