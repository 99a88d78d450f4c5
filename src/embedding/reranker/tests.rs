use super::*;

#[test]
fn test_config_defaults() {
    let config = RerankerConfig::default();
    assert!(config.model_path.is_none());
    assert_eq!(config.max_seq_len, MAX_SEQ_LEN);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_rejects_empty_path() {
    let config = RerankerConfig::new("");
    assert!(config.validate().is_err());
    assert!(matches!(
        CrossEncoder::load(config),
        Err(RerankerError::InvalidConfig { .. })
    ));
}

#[test]
fn test_missing_model_files_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let result = CrossEncoder::load(RerankerConfig::new(dir.path()));
    assert!(matches!(result, Err(RerankerError::ModelLoadFailed { .. })));
}

#[test]
fn test_stub_prefers_overlapping_documents() {
    let encoder = CrossEncoder::stub().unwrap();
    assert!(!encoder.is_model_loaded());

    let query = "produção de mobiliário em madeira";
    let related = encoder
        .score(query, "Fábrica de mobiliário produção em madeira maciça")
        .unwrap();
    let unrelated = encoder.score(query, "Agência de viagens e turismo").unwrap();

    assert!(related > unrelated);
    assert!((0.0..=1.0).contains(&related));
    assert!((0.0..=1.0).contains(&unrelated));
}

#[test]
fn test_batch_scores_align_with_input() {
    let encoder = CrossEncoder::stub().unwrap();
    let documents = vec![
        "turismo rural".to_string(),
        "software".to_string(),
        "alojamento turismo".to_string(),
    ];

    let scores = RelevanceModel::score(&encoder, "turismo", &documents).unwrap();

    assert_eq!(scores.len(), 3);
    assert_eq!(scores[0], CrossEncoder::score(&encoder, "turismo", "turismo rural").unwrap());
    assert!(scores[1] < scores[0]);
}

#[test]
fn test_empty_query_scores_zero() {
    assert_eq!(placeholder_score("de a o", "qualquer coisa"), 0.0);
}

#[test]
fn test_device_errors_keep_their_source() {
    let err: RerankerError = crate::embedding::EmbeddingError::DeviceUnavailable {
        device: "cuda".to_string(),
        reason: "no driver".to_string(),
    }
    .into();

    assert!(matches!(err, RerankerError::Embedding(_)));
    assert_eq!(err.to_string(), "cuda device unavailable: no driver");
}
