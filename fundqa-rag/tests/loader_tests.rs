//! Corpus loading from plain-text sources.

use std::path::PathBuf;

use fundqa_rag::error::QaError;
use fundqa_rag::loader::load_corpus;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fundqa_loader_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn text_file_loads_as_a_single_page() {
    let path = scratch_file("funds.txt", "Fund ABC charges a 2% management fee.");

    let corpus = load_corpus(&path).await.unwrap();

    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus[0].text, "Fund ABC charges a 2% management fee.");
    assert_eq!(corpus[0].id, "funds_page1");
    assert_eq!(corpus[0].metadata.get("page").map(String::as_str), Some("1"));
    assert_eq!(corpus[0].source_uri.as_deref(), Some(path.display().to_string().as_str()));
}

#[tokio::test]
async fn missing_file_is_a_document_error() {
    let path = std::env::temp_dir().join("fundqa_loader_does_not_exist.txt");

    let err = load_corpus(&path).await.unwrap_err();
    assert!(matches!(err, QaError::Document(_)), "got {err}");
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let path = scratch_file("funds.docx", "irrelevant");

    let err = load_corpus(&path).await.unwrap_err();
    assert!(matches!(err, QaError::Document(_)), "got {err}");
}
