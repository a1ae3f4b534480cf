//! FAQ knowledge base: resolved entries, the similarity index over them, and the loader that
//! wires CSV, embeddings file, provider and index blob together.

mod index;
mod knowledge;
mod store;

pub use index::{entries_fingerprint, IndexBlob, Neighbor, SimilarityIndex, INDEX_FORMAT_VERSION};
pub use knowledge::{build_knowledge, BuildOptions, KnowledgeBase, KnowledgePaths, KnowledgeStatus};
pub use store::FaqStore;
