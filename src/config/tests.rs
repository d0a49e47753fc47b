use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

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

fn clear_copyless_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("COPYLESS_PORT");
        env::remove_var("COPYLESS_BIND_ADDR");
        env::remove_var("COPYLESS_CORPUS_PATH");
        env::remove_var("COPYLESS_MODEL_PATH");
        env::remove_var("COPYLESS_MODEL_ID");
        env::remove_var("COPYLESS_LSH_PERMUTATIONS");
        env::remove_var("COPYLESS_LSH_THRESHOLD");
        env::remove_var("COPYLESS_K_SEMANTIC");
        env::remove_var("COPYLESS_K_LEXICAL");
        env::remove_var("COPYLESS_WEIGHT_LEXICAL");
        env::remove_var("COPYLESS_WEIGHT_SEMANTIC");
        env::remove_var("COPYLESS_SERPER_API_KEY");
        env::remove_var("SERPER_API_KEY");
        env::remove_var("COPYLESS_MAX_SEARCH_RESULTS");
        env::remove_var("COPYLESS_MAX_CHUNKS_PER_PAGE");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8000);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(
        config.corpus_path,
        PathBuf::from("./corpus/fixed_corpus.txt")
    );
    assert!(config.model_path.is_none());
    assert!(config.serper_api_key.is_none());
    assert_eq!(config.max_search_results, 5);
    assert_eq!(config.max_chunks_per_page, 10);
}

#[test]
fn test_default_engine_config() {
    let engine = EngineConfig::default();

    assert_eq!(engine.permutations, 128);
    assert_eq!(engine.lsh_threshold, 0.5);
    assert_eq!(engine.k_semantic, 5);
    assert_eq!(engine.k_lexical, 5);
    assert_eq!(engine.weight_lexical, 0.6);
    assert_eq!(engine.weight_semantic, 0.4);
    assert_eq!(engine.embedding_model_id, "all-MiniLM-L6-v2");
    assert!(engine.validate().is_ok());
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8000");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
fn test_socket_addr_ipv6_is_bracketed() {
    let config = Config {
        bind_addr: IpAddr::V6(std::net::Ipv6Addr::LOCALHOST),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "[::1]:8000");
    assert!(config.socket_addr().parse::<std::net::SocketAddr>().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_copyless_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8000);
    assert_eq!(config.engine, EngineConfig::default());
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_copyless_env();

    with_env_vars(&[("COPYLESS_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_port_zero_rejected() {
    clear_copyless_env();

    with_env_vars(&[("COPYLESS_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_port_not_a_number() {
    clear_copyless_env();

    with_env_vars(&[("COPYLESS_PORT", "eighty")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
        assert!(err.to_string().contains("eighty"));
    });
}

#[test]
#[serial]
fn test_from_env_invalid_bind_addr() {
    clear_copyless_env();

    with_env_vars(&[("COPYLESS_BIND_ADDR", "not-an-ip")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_engine_overrides() {
    clear_copyless_env();

    with_env_vars(
        &[
            ("COPYLESS_LSH_PERMUTATIONS", "64"),
            ("COPYLESS_LSH_THRESHOLD", "0.7"),
            ("COPYLESS_K_SEMANTIC", "3"),
            ("COPYLESS_K_LEXICAL", "8"),
            ("COPYLESS_WEIGHT_LEXICAL", "0.5"),
            ("COPYLESS_WEIGHT_SEMANTIC", "0.5"),
            ("COPYLESS_MODEL_ID", "paraphrase-MiniLM-L3-v2"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.engine.permutations, 64);
            assert_eq!(config.engine.lsh_threshold, 0.7);
            assert_eq!(config.engine.k_semantic, 3);
            assert_eq!(config.engine.k_lexical, 8);
            assert_eq!(config.engine.weight_lexical, 0.5);
            assert_eq!(config.engine.weight_semantic, 0.5);
            assert_eq!(config.engine.embedding_model_id, "paraphrase-MiniLM-L3-v2");
        },
    );
}

#[test]
#[serial]
fn test_from_env_unparsable_threshold() {
    clear_copyless_env();

    with_env_vars(&[("COPYLESS_LSH_THRESHOLD", "half")], || {
        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue { name, value, .. } => {
                assert_eq!(name, "COPYLESS_LSH_THRESHOLD");
                assert_eq!(value, "half");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    });
}

#[test]
#[serial]
fn test_from_env_blank_values_use_defaults() {
    clear_copyless_env();

    with_env_vars(
        &[("COPYLESS_K_LEXICAL", "  "), ("COPYLESS_MODEL_PATH", "   ")],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.engine.k_lexical, 5);
            assert!(config.model_path.is_none());
        },
    );
}

#[test]
#[serial]
fn test_from_env_serper_key_fallback() {
    clear_copyless_env();

    with_env_vars(&[("SERPER_API_KEY", "bare-key")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.serper_api_key.as_deref(), Some("bare-key"));
    });

    with_env_vars(
        &[
            ("SERPER_API_KEY", "bare-key"),
            ("COPYLESS_SERPER_API_KEY", "prefixed-key"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.serper_api_key.as_deref(), Some("prefixed-key"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_paths() {
    clear_copyless_env();

    with_env_vars(
        &[
            ("COPYLESS_CORPUS_PATH", "/data/corpus.txt"),
            ("COPYLESS_MODEL_PATH", "/models/minilm"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.corpus_path, PathBuf::from("/data/corpus.txt"));
            assert_eq!(config.model_path, Some(PathBuf::from("/models/minilm")));
        },
    );
}

#[test]
fn test_validate_default_passes() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_missing_model_dir() {
    let config = Config {
        model_path: Some(PathBuf::from("/definitely/not/a/model/dir")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_path_is_file() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let config = Config {
        model_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_corpus_path_is_directory() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let config = Config {
        corpus_path: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_engine_validate_rejects_zero_permutations() {
    let engine = EngineConfig::default().with_permutations(0);
    assert!(matches!(
        engine.validate(),
        Err(ConfigError::InvalidEngine { .. })
    ));
}

#[test]
fn test_engine_validate_rejects_threshold_out_of_range() {
    assert!(EngineConfig::default().with_lsh_threshold(1.5).validate().is_err());
    assert!(EngineConfig::default().with_lsh_threshold(-0.1).validate().is_err());
    assert!(EngineConfig::default().with_lsh_threshold(0.0).validate().is_ok());
    assert!(EngineConfig::default().with_lsh_threshold(1.0).validate().is_ok());
}

#[test]
fn test_engine_validate_rejects_zero_k() {
    assert!(EngineConfig::default().with_k(0, 5).validate().is_err());
    assert!(EngineConfig::default().with_k(5, 0).validate().is_err());
}

#[test]
fn test_engine_validate_weights() {
    assert!(EngineConfig::default().with_weights(-0.1, 0.4).validate().is_err());
    assert!(EngineConfig::default().with_weights(0.6, f64::NAN).validate().is_err());
    // Weights are not required to sum to one.
    assert!(EngineConfig::default().with_weights(2.0, 3.0).validate().is_ok());
}

#[test]
fn test_engine_validate_rejects_blank_model_id() {
    let engine = EngineConfig {
        embedding_model_id: "  ".to_string(),
        ..Default::default()
    };
    assert!(engine.validate().is_err());
}

#[test]
fn test_model_id_matches_directory_name() {
    let engine = EngineConfig::default();
    assert!(engine.model_id_matches(std::path::Path::new("/models/all-MiniLM-L6-v2")));
    assert!(engine.model_id_matches(std::path::Path::new("/models/ALL-MINILM-L6-V2/")));
    assert!(!engine.model_id_matches(std::path::Path::new("/models/bge-small-en")));

    let hub = EngineConfig {
        embedding_model_id: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        ..Default::default()
    };
    assert!(hub.model_id_matches(std::path::Path::new("models/all-MiniLM-L6-v2")));
}
