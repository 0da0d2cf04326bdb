//! Vector index search: ordering, clamping, tie-breaking, and the
//! empty-index failure.

use std::collections::HashMap;

use fundqa_rag::document::Chunk;
use fundqa_rag::error::QaError;
use fundqa_rag::index::InMemoryIndex;
use proptest::prelude::*;

fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("text for {id}"),
        embedding,
        start_index: 0,
        metadata: HashMap::new(),
        document_id: "doc".to_string(),
    }
}

#[test]
fn searching_an_empty_index_fails() {
    let index = InMemoryIndex::new();
    let err = index.search(&[1.0, 0.0], 3).unwrap_err();
    assert!(matches!(err, QaError::EmptyIndex), "got {err}");
}

#[test]
fn results_are_ranked_by_descending_similarity() {
    let mut index = InMemoryIndex::new();
    index.insert(chunk("orthogonal", vec![0.0, 1.0]));
    index.insert(chunk("aligned", vec![1.0, 0.0]));
    index.insert(chunk("diagonal", vec![0.7, 0.7]));

    let results = index.search(&[1.0, 0.0], 2).unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    assert_eq!(ids, ["aligned", "diagonal"]);
    assert!(results[0].score > results[1].score);
}

#[test]
fn top_k_larger_than_index_is_clamped() {
    let mut index = InMemoryIndex::new();
    index.insert(chunk("only", vec![1.0, 0.0]));

    let results = index.search(&[1.0, 0.0], 10).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn equal_scores_keep_insertion_order() {
    let mut index = InMemoryIndex::new();
    index.insert(chunk("first", vec![1.0, 0.0]));
    index.insert(chunk("second", vec![1.0, 0.0]));
    index.insert(chunk("third", vec![2.0, 0.0]));

    let results = index.search(&[1.0, 0.0], 3).unwrap();

    // All three vectors point the same way, so all scores tie.
    let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
    assert_eq!(ids, ["first", "second", "third"]);
}

#[test]
fn zero_magnitude_embeddings_score_zero() {
    let mut index = InMemoryIndex::new();
    index.insert(chunk("zero", vec![0.0, 0.0]));
    index.insert(chunk("aligned", vec![1.0, 0.0]));

    let results = index.search(&[1.0, 0.0], 2).unwrap();
    assert_eq!(results[0].chunk.id, "aligned");
    assert_eq!(results[1].score, 0.0);
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any stored chunk set and query embedding, search returns at most
    /// `top_k` results, every result comes from the stored set, and scores
    /// never increase along the result order.
    #[test]
    fn search_is_bounded_ordered_and_grounded(
        embeddings in proptest::collection::vec(arb_normalized_embedding(16), 1..20),
        query in arb_normalized_embedding(16),
        top_k in 1usize..25,
    ) {
        let mut index = InMemoryIndex::new();
        for (i, embedding) in embeddings.iter().enumerate() {
            index.insert(chunk(&format!("chunk_{i}"), embedding.clone()));
        }

        let results = index.search(&query, top_k).unwrap();

        prop_assert!(results.len() <= top_k);
        prop_assert!(results.len() <= embeddings.len());

        for result in &results {
            prop_assert!(result.chunk.id.starts_with("chunk_"));
        }

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}
