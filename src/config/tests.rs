#[cfg(test)]
mod tests {
    use crate::config::{
        CompressionConfig, Config, LLMConfig, LLMProvider, ResearchConfig, SessionConfig,
        ToolsConfig,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.output_path.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_provider_default() {
        let provider = LLMProvider::default();
        assert_eq!(provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!(
            "openai".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "moonshot".parse::<LLMProvider>().unwrap(),
            LLMProvider::Moonshot
        );
        assert_eq!(
            "deepseek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "mistral".parse::<LLMProvider>().unwrap(),
            LLMProvider::Mistral
        );
        assert_eq!(
            "openrouter".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenRouter
        );
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "gemini".parse::<LLMProvider>().unwrap(),
            LLMProvider::Gemini
        );
        assert_eq!(
            "ollama".parse::<LLMProvider>().unwrap(),
            LLMProvider::Ollama
        );

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::Moonshot.to_string(), "moonshot");
        assert_eq!(LLMProvider::DeepSeek.to_string(), "deepseek");
        assert_eq!(LLMProvider::Mistral.to_string(), "mistral");
        assert_eq!(LLMProvider::OpenRouter.to_string(), "openrouter");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::Gemini.to_string(), "gemini");
        assert_eq!(LLMProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        assert_eq!(config.provider, LLMProvider::OpenAI);
        // api_key may be empty if env var is not set
        assert!(!config.api_base_url.is_empty());
        assert!(!config.model_efficient.is_empty());
        assert!(!config.model_powerful.is_empty());
        assert_eq!(config.max_tokens, 131072);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_delay_ms, 5000);
        assert_eq!(config.timeout_seconds, 300);
    }

    #[test]
    fn test_research_config_default() {
        let config = ResearchConfig::default();

        assert_eq!(config.max_concurrent_workers, 3);
        assert_eq!(config.max_supervisor_turns, 6);
        assert_eq!(config.max_worker_cycles, 8);
        assert_eq!(config.tool_retry_budget, 3);
    }

    #[test]
    fn test_compression_config_default() {
        let config = CompressionConfig::default();

        assert_eq!(config.max_prompt_tokens, 24 * 1024);
        assert_eq!(config.target_tokens, 4096);
        assert!(config.target_tokens < config.max_prompt_tokens);
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();

        assert!(config.enabled);
        assert_eq!(config.session_dir, PathBuf::from(".quaestor/sessions"));
        assert_eq!(config.expire_hours, 72); // 3 days
    }

    #[test]
    fn test_tools_config_default() {
        let config = ToolsConfig::default();

        assert!(config.enable_web_search);
        assert!(config.web_search_endpoint.contains("tavily"));
        assert_eq!(config.search_timeout_seconds, 30);
        assert_eq!(config.max_search_results, 5);
        assert!(config.corpus_path.is_none());
        assert_eq!(config.max_document_bytes, 64 * 1024);
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("quaestor.toml");

        let config_content = r#"target_language = "en"
output_path = "./report.md"
verbose = true

[llm]
provider = "deepseek"
api_key = "test-key"
api_base_url = "https://api.deepseek.com"
model_efficient = "deepseek-chat"
model_powerful = "deepseek-reasoner"
max_tokens = 65536
temperature = 0.2
retry_attempts = 3
retry_delay_ms = 1000
timeout_seconds = 120

[research]
max_concurrent_workers = 2
max_supervisor_turns = 4
max_worker_cycles = 6
tool_retry_budget = 2

[compression]
max_prompt_tokens = 16384
target_tokens = 2048

[session]
enabled = false
session_dir = ".quaestor/sessions"
expire_hours = 24

[tools]
enable_web_search = true
web_search_endpoint = "https://api.tavily.com/search"
web_search_api_key = "search-key"
search_timeout_seconds = 15
max_search_results = 3
max_document_bytes = 32768
"#;

        std::fs::write(&config_path, config_content).unwrap();

        let config = Config::from_file(&config_path).unwrap();

        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.api_key, "test-key");
        assert_eq!(config.llm.max_tokens, 65536);
        assert_eq!(config.research.max_concurrent_workers, 2);
        assert_eq!(config.compression.max_prompt_tokens, 16384);
        assert!(!config.session.enabled);
        assert_eq!(config.tools.max_search_results, 3);
        assert_eq!(config.output_path, Some(PathBuf::from("./report.md")));
        assert!(config.verbose);
    }

    #[test]
    fn test_config_from_missing_file() {
        let path = PathBuf::from("/nonexistent/quaestor.toml");
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_config_fields() {
        let mut config = Config::default();

        config.research.max_concurrent_workers = 5;
        config.research.max_supervisor_turns = 10;
        config.compression.max_prompt_tokens = 8192;
        config.session.enabled = false;
        config.tools.corpus_path = Some(PathBuf::from("./docs"));
        config.verbose = true;

        assert_eq!(config.research.max_concurrent_workers, 5);
        assert_eq!(config.research.max_supervisor_turns, 10);
        assert_eq!(config.compression.max_prompt_tokens, 8192);
        assert!(!config.session.enabled);
        assert_eq!(config.tools.corpus_path, Some(PathBuf::from("./docs")));
        assert!(config.verbose);
    }
}
