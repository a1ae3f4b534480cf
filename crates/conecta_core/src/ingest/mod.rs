pub mod embeddings_file;
pub mod faq_csv;
