use super::*;

#[test]
fn document_match_serializes_for_output() {
    let m = DocumentMatch {
        id: Uuid::nil(),
        content: "some chunk text".to_string(),
        filename: Some("notes.md".to_string()),
        similarity: 0.87,
    };

    let json = serde_json::to_value(&m).expect("should serialize");
    assert_eq!(json["content"], "some chunk text");
    assert_eq!(json["filename"], "notes.md");
    assert!((json["similarity"].as_f64().expect("similarity is a number") - 0.87).abs() < 1e-9);
}

#[test]
fn new_document_from_embedding() {
    let row = NewDocument {
        content: "chunk".to_string(),
        embedding: Vector::from(vec![0.5_f32; 4]),
        filename: Some("doc.txt".to_string()),
        owner_id: None,
        chunk_index: 3,
        token_count: 12,
    };

    assert_eq!(row.embedding.as_slice().len(), 4);
    assert_eq!(row.chunk_index, 3);
}
