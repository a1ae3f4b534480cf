use conecta_ai::faq::{entries_fingerprint, IndexBlob, SimilarityIndex, INDEX_FORMAT_VERSION};
use conecta_core::domain::FaqEntry;
use pretty_assertions::assert_eq;

fn entry(question: &str, answer: &str, embedding: Vec<f32>) -> FaqEntry {
    FaqEntry {
        question: question.to_string(),
        answer: answer.to_string(),
        embedding,
    }
}

fn sample_entries() -> Vec<FaqEntry> {
    vec![
        entry("What is the average speed?", "The average is 42 Mbps.", vec![2.0, 0.0, 0.0]),
        entry("How many schools are there?", "There are 5,000 schools.", vec![0.0, 3.0, 0.0]),
        entry("Which district is slowest?", "The east zone.", vec![0.0, 0.0, 0.5]),
    ]
}

#[test]
fn stored_vector_finds_itself_at_zero_distance() {
    let entries = sample_entries();
    let fp = entries_fingerprint(&entries);
    let index = SimilarityIndex::build(&entries, "mock", &fp).expect("build");
    assert_eq!(index.len(), entries.len());
    assert_eq!(index.dims(), 3);

    for (position, e) in entries.iter().enumerate() {
        let hit = index.nearest(&e.embedding).expect("query").expect("non-empty");
        assert_eq!(hit.position, position);
        assert!(hit.distance.abs() < 1e-6, "distance={}", hit.distance);
    }
}

#[test]
fn distance_is_squared_euclidean_on_unit_vectors() {
    let entries = sample_entries();
    let index = SimilarityIndex::build(&entries, "mock", "fp").expect("build");

    // 45 degrees between the query and the first two entries; cos = 1/sqrt(2).
    let hit = index.nearest(&[1.0, 1.0, 0.0]).expect("query").expect("hit");
    let expected = 2.0 - 2.0 * std::f32::consts::FRAC_1_SQRT_2;
    assert!((hit.distance - expected).abs() < 1e-5);
    // Equidistant from positions 0 and 1: lowest position wins.
    assert_eq!(hit.position, 0);

    // Opposite of the first entry, orthogonal to the others.
    let far = index.nearest(&[-1.0, 0.0, 0.0]).expect("query").expect("hit");
    assert!(far.distance >= 2.0 - 1e-6);
}

#[test]
fn empty_index_yields_no_neighbor() {
    let index = SimilarityIndex::build(&[], "mock", "fp").expect("build");
    assert!(index.is_empty());
    assert_eq!(index.nearest(&[1.0, 0.0]).expect("query"), None);
}

#[test]
fn unusable_query_vectors_are_embedding_failures() {
    let index = SimilarityIndex::build(&sample_entries(), "mock", "fp").expect("build");

    let wrong_dims = index.nearest(&[1.0, 0.0]).expect_err("dims");
    assert_eq!(wrong_dims.code, "AI_EMBEDDINGS_FAILED");

    let zero = index.nearest(&[0.0, 0.0, 0.0]).expect_err("zero norm");
    assert_eq!(zero.code, "AI_EMBEDDINGS_FAILED");
}

#[test]
fn zero_vector_entry_makes_source_unusable() {
    let entries = vec![entry("q", "a", vec![0.0, 0.0])];
    let err = SimilarityIndex::build(&entries, "mock", "fp").expect_err("zero");
    assert_eq!(err.code, "DATA_UNAVAILABLE");
}

#[test]
fn blob_survives_disk_and_detects_staleness() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("faq_index.bin");

    let entries = sample_entries();
    let fp = entries_fingerprint(&entries);
    let index = SimilarityIndex::build(&entries, "mock", &fp).expect("build");
    index.to_blob().save(&path).expect("save");

    let blob = IndexBlob::load(&path).expect("load").expect("present");
    assert_eq!(blob.version, INDEX_FORMAT_VERSION);
    assert!(blob.matches("mock", &fp, entries.len()));
    assert!(!blob.matches("other-model", &fp, entries.len()));
    assert!(!blob.matches("mock", "different", entries.len()));
    assert!(!blob.matches("mock", &fp, entries.len() + 1));

    let reloaded = SimilarityIndex::from_blob(blob).expect("from_blob");
    assert_eq!(reloaded, index);
}

#[test]
fn missing_blob_is_none_and_garbage_is_data_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("faq_index.bin");
    assert_eq!(IndexBlob::load(&path).expect("absent"), None);

    std::fs::write(&path, b"\x01\x02not an index").expect("write");
    let err = IndexBlob::load(&path).expect_err("corrupt");
    assert_eq!(err.code, "DATA_UNAVAILABLE");
}

#[test]
fn fingerprint_tracks_answers_and_vectors() {
    let entries = sample_entries();
    let base = entries_fingerprint(&entries);
    assert_eq!(base, entries_fingerprint(&sample_entries()));

    let mut edited = sample_entries();
    edited[0].answer = "The average is 43 Mbps.".to_string();
    assert_ne!(base, entries_fingerprint(&edited));

    let mut moved = sample_entries();
    moved[2].embedding[2] = 0.6;
    assert_ne!(base, entries_fingerprint(&moved));
}
