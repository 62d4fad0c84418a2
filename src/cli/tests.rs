#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(&["deepquest-rs", "什么是向量数据库"]).unwrap();

        assert_eq!(args.question, "什么是向量数据库");
        assert!(args.session.is_none());
        assert!(args.config.is_none());
        assert!(args.output_path.is_none());
        assert!(!args.verbose);
        assert!(!args.no_web_search);
        assert!(!args.no_session);
    }

    #[test]
    fn test_args_question_required() {
        assert!(Args::try_parse_from(&["deepquest-rs"]).is_err());
    }

    #[test]
    fn test_args_short_options() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "-s", "session-42",
            "-o", "/test/report.md",
            "-v"
        ]).unwrap();

        assert_eq!(args.question, "研究问题");
        assert_eq!(args.session, Some("session-42".to_string()));
        assert_eq!(args.output_path, Some(PathBuf::from("/test/report.md")));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_llm_options() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "--llm-provider", "openai",
            "--llm-api-key", "test-key",
            "--llm-api-base-url", "https://api.openai.com",
            "--model-efficient", "gpt-3.5-turbo",
            "--model-powerful", "gpt-4",
            "--max-tokens", "2048",
            "--temperature", "0.7",
            "--max-workers", "5"
        ]).unwrap();

        assert_eq!(args.llm_provider, Some("openai".to_string()));
        assert_eq!(args.llm_api_key, Some("test-key".to_string()));
        assert_eq!(args.llm_api_base_url, Some("https://api.openai.com".to_string()));
        assert_eq!(args.model_efficient, Some("gpt-3.5-turbo".to_string()));
        assert_eq!(args.model_powerful, Some("gpt-4".to_string()));
        assert_eq!(args.max_tokens, Some(2048));
        assert_eq!(args.temperature, Some(0.7));
        assert_eq!(args.max_workers, Some(5));
    }

    #[test]
    fn test_args_target_language() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "--target-language", "zh"
        ]).unwrap();

        assert_eq!(args.target_language, Some("zh".to_string()));
    }

    #[test]
    fn test_into_config_basic() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "-o", "/test/report.md"
        ]).unwrap();

        let config = args.into_config();

        assert_eq!(config.output_path, Some(PathBuf::from("/test/report.md")));
        assert!(!config.verbose);
        assert!(config.session.enabled);
        assert!(config.tools.enable_web_search);
    }

    #[test]
    fn test_into_config_with_overrides() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "--verbose",
            "--llm-provider", "openai",
            "--model-efficient", "gpt-3.5-turbo",
            "--max-workers", "2"
        ]).unwrap();

        let config = args.into_config();

        assert!(config.verbose);
        assert_eq!(config.llm.provider, crate::config::LLMProvider::OpenAI);
        assert_eq!(config.llm.model_efficient, "gpt-3.5-turbo");
        assert_eq!(config.research.max_concurrent_workers, 2);
    }

    #[test]
    fn test_into_config_powerful_falls_back_to_efficient() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "--model-efficient", "gpt-3.5-turbo"
        ]).unwrap();

        let config = args.into_config();

        assert_eq!(config.llm.model_efficient, "gpt-3.5-turbo");
        assert_eq!(config.llm.model_powerful, "gpt-3.5-turbo");
    }

    #[test]
    fn test_into_config_no_session() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "--no-session"
        ]).unwrap();

        let config = args.into_config();
        assert!(!config.session.enabled);
    }

    #[test]
    fn test_into_config_no_web_search() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "--no-web-search"
        ]).unwrap();

        let config = args.into_config();
        assert!(!config.tools.enable_web_search);
    }

    #[test]
    fn test_into_config_corpus_path() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "研究问题",
            "--corpus-path", "/data/papers"
        ]).unwrap();

        let config = args.into_config();
        assert_eq!(config.tools.corpus_path, Some(PathBuf::from("/data/papers")));
    }

    #[test]
    fn test_invalid_llm_provider() {
        // 这个测试需要捕获 stderr，暂时跳过
        // let args = Args::try_parse_from(&[
        //     "deepquest-rs",
        //     "研究问题",
        //     "--llm-provider", "invalid"
        // ]).unwrap();

        // let config = args.into_config();
        // 应该使用默认的 provider
    }

    #[test]
    fn test_complex_args_combination() {
        let args = Args::try_parse_from(&[
            "deepquest-rs",
            "对比主流向量数据库的索引结构",
            "-s", "session-7",
            "-c", "/config.toml",
            "-v",
            "--model-efficient", "gpt-3.5-turbo",
            "--model-powerful", "gpt-4",
            "--max-tokens", "4096",
            "--temperature", "0.5",
            "--target-language", "ja",
            "--corpus-path", "/data/papers",
            "--no-web-search",
            "--no-session"
        ]).unwrap();

        assert_eq!(args.question, "对比主流向量数据库的索引结构");
        assert_eq!(args.session, Some("session-7".to_string()));
        assert_eq!(args.config, Some(PathBuf::from("/config.toml")));
        assert!(args.verbose);
        assert_eq!(args.model_efficient, Some("gpt-3.5-turbo".to_string()));
        assert_eq!(args.model_powerful, Some("gpt-4".to_string()));
        assert_eq!(args.max_tokens, Some(4096));
        assert_eq!(args.temperature, Some(0.5));
        assert_eq!(args.target_language, Some("ja".to_string()));
        assert_eq!(args.corpus_path, Some(PathBuf::from("/data/papers")));
        assert!(args.no_web_search);
        assert!(args.no_session);
    }
}
