//! Test fixtures for integration tests.

use std::io::Write;
use std::sync::Arc;

use copyless::config::EngineConfig;
use copyless::embedding::SentenceEmbedder;
use copyless::service::PlagiarismService;
use tempfile::NamedTempFile;

pub const MITOCHONDRIA: &str = "The mitochondria is the powerhouse of the cell.";

pub const UNRELATED: &str = "The cat sat on the mat.";

pub const CORPUS: &str = "Photosynthesis converts light energy into chemical energy stored in glucose. \
Plants release oxygen as a by-product of the reaction.

The mitochondria is the powerhouse of the cell. It produces ATP through cellular respiration, \
which releases energy stored in nutrients.

The French Revolution began in 1789 and reshaped European politics for decades.

Rust guarantees memory safety without a garbage collector by checking ownership at compile time.";

/// Writes `content` to a temp file that lives as long as the returned handle.
pub fn corpus_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp corpus");
    file.write_all(content.as_bytes()).expect("write temp corpus");
    file.flush().expect("flush temp corpus");
    file
}

pub fn stub_embedder() -> Arc<SentenceEmbedder> {
    Arc::new(SentenceEmbedder::stub())
}

/// Ready service over [`CORPUS`] with the stub embedder.
pub fn stub_service() -> PlagiarismService {
    stub_service_with(EngineConfig::default())
}

pub fn stub_service_with(config: EngineConfig) -> PlagiarismService {
    let file = corpus_file(CORPUS);
    PlagiarismService::try_new(config, file.path(), stub_embedder()).expect("service builds")
}
