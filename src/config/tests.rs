use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_matcher_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        for name in [
            "MATCHER_DATABASE_URL",
            "MATCHER_QDRANT_URL",
            "MATCHER_COLLECTION",
            "MATCHER_EMBEDDER_PATH",
            "MATCHER_RERANKER_PATH",
            "MATCHER_GEOCODING_API_KEY",
            "MATCHER_GEOCODING_REGION",
            "MATCHER_GEOCODING_COUNTRY",
            "MATCHER_RATE_LIMIT_BACKOFF_SECS",
            "MATCHER_REASONING_MODEL",
            "MATCHER_INITIAL_CANDIDATES",
            "MATCHER_CANDIDATE_STEP",
            "MATCHER_MAX_CANDIDATES",
            "MATCHER_SKIP_LIST_PATH",
            "MATCHER_LOCATION_CACHE_CAPACITY",
        ] {
            env::remove_var(name);
        }
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.database_url.is_none());
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, "companies");
    assert_eq!(config.geocoding_region, "pt");
    assert_eq!(config.geocoding_country, "Portugal");
    assert_eq!(config.rate_limit_backoff, Duration::from_secs(60));
    assert_eq!(config.initial_candidates, 10);
    assert_eq!(config.candidate_step, 10);
    assert_eq!(config.max_candidates, 50);
    assert_eq!(
        config.skip_list_path,
        PathBuf::from("./data/skipped_incentives.json")
    );
    assert!(config.location_cache_capacity.is_none());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_matcher_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.max_candidates, 50);
    assert!(config.embedder_path.is_none());
    assert!(config.geocoding_api_key.is_none());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_matcher_env();

    let config = with_env_vars(
        &[
            ("MATCHER_DATABASE_URL", "postgres://localhost/incentives"),
            ("MATCHER_COLLECTION", "empresas"),
            ("MATCHER_RATE_LIMIT_BACKOFF_SECS", "5"),
            ("MATCHER_MAX_CANDIDATES", "30"),
            ("MATCHER_LOCATION_CACHE_CAPACITY", "1000"),
            ("MATCHER_GEOCODING_API_KEY", "  key-123  "),
        ],
        || Config::from_env().expect("should parse overrides"),
    );

    assert_eq!(
        config.database_url.as_deref(),
        Some("postgres://localhost/incentives")
    );
    assert_eq!(config.collection, "empresas");
    assert_eq!(config.rate_limit_backoff, Duration::from_secs(5));
    assert_eq!(config.max_candidates, 30);
    assert_eq!(config.location_cache_capacity, Some(1000));
    assert_eq!(config.geocoding_api_key.as_deref(), Some("key-123"));
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    clear_matcher_env();

    let config = with_env_vars(
        &[("MATCHER_EMBEDDER_PATH", "   "), ("MATCHER_QDRANT_URL", "")],
        || Config::from_env().expect("blank values are ignored"),
    );

    assert!(config.embedder_path.is_none());
    assert_eq!(config.qdrant_url, DEFAULT_QDRANT_URL);
}

#[test]
#[serial]
fn test_invalid_number_is_rejected() {
    clear_matcher_env();

    let result = with_env_vars(&[("MATCHER_MAX_CANDIDATES", "lots")], Config::from_env);

    match result {
        Err(ConfigError::NumberParseError { name, value, .. }) => {
            assert_eq!(name, "MATCHER_MAX_CANDIDATES");
            assert_eq!(value, "lots");
        }
        other => panic!("expected NumberParseError, got {other:?}"),
    }
}

#[test]
fn test_validate_accepts_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_max_below_initial() {
    let config = Config {
        initial_candidates: 20,
        max_candidates: 10,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            name: "MATCHER_MAX_CANDIDATES",
            ..
        })
    ));
}

#[test]
fn test_validate_rejects_zero_step() {
    let config = Config {
        candidate_step: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_rejects_missing_model_dir() {
    let config = Config {
        reranker_path: Some(PathBuf::from("/definitely/not/here")),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_rejects_model_file_instead_of_dir() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("model.safetensors");
    std::fs::write(&file, b"weights").unwrap();

    let config = Config {
        embedder_path: Some(file),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_rejects_skip_list_directory() {
    let dir = TempDir::new().unwrap();

    let config = Config {
        skip_list_path: dir.path().to_path_buf(),
        ..Default::default()
    };

    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_require_database_url() {
    let config = Config::default();
    assert!(matches!(
        config.require_database_url(),
        Err(ConfigError::MissingEnvVar {
            name: "MATCHER_DATABASE_URL"
        })
    ));

    let config = Config {
        database_url: Some("postgres://db".to_string()),
        ..Default::default()
    };
    assert_eq!(config.require_database_url().unwrap(), "postgres://db");
}

#[test]
fn test_require_geocoding_api_key() {
    for key in [None, Some("  ")] {
        let config = Config {
            geocoding_api_key: key.map(str::to_string),
            ..Default::default()
        };
        assert!(matches!(
            config.require_geocoding_api_key(),
            Err(ConfigError::MissingEnvVar {
                name: "MATCHER_GEOCODING_API_KEY"
            })
        ));
    }

    let config = Config {
        geocoding_api_key: Some("places-key".to_string()),
        ..Default::default()
    };
    assert_eq!(config.require_geocoding_api_key().unwrap(), "places-key");
}

#[test]
fn test_require_embedder_path() {
    assert!(matches!(
        Config::default().require_embedder_path(),
        Err(ConfigError::MissingEnvVar {
            name: "MATCHER_EMBEDDER_PATH"
        })
    ));

    let config = Config {
        embedder_path: Some(PathBuf::from("/models/minilm")),
        ..Default::default()
    };
    assert_eq!(
        config.require_embedder_path().unwrap(),
        Path::new("/models/minilm")
    );
}
