use std::collections::BTreeMap;
use std::fs;

use conecta_core::error::codes;
use conecta_core::ingest::embeddings_file::EmbeddingsFile;
use pretty_assertions::assert_eq;

#[test]
fn absent_file_loads_as_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = EmbeddingsFile::open(dir.path().join("faq_embeddings.json"));
    assert_eq!(file.load().expect("load"), None);
}

#[test]
fn saved_map_is_reloaded_and_tmp_is_gone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("faq_embeddings.json");
    let file = EmbeddingsFile::open(path.clone());

    let mut map = BTreeMap::new();
    map.insert("Qual a velocidade média?".to_string(), vec![0.25f32, -0.5, 1.0]);
    file.save(&map).expect("save");

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
    assert_eq!(file.load().expect("load"), Some(map));
}

#[test]
fn non_object_json_is_data_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("faq_embeddings.json");
    fs::write(&path, "[[0.1, 0.2]]").expect("write");

    let err = EmbeddingsFile::open(path).load().expect_err("wrong shape");
    assert_eq!(err.code, codes::DATA_UNAVAILABLE);
}
