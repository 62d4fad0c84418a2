#[cfg(test)]
mod tests {
    use crate::config::ToolsConfig;
    use crate::error::EngineError;
    use crate::llm::tools::ToolKit;
    use tempfile::TempDir;

    fn offline_tools_config() -> ToolsConfig {
        ToolsConfig {
            enable_web_search: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_toolkit_definitions_default() {
        let toolkit = ToolKit::new(&ToolsConfig::default()).unwrap();
        let names: Vec<&str> = toolkit
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect();

        assert!(names.contains(&"web_search"));
        assert!(names.contains(&"think"));
        assert!(names.contains(&"research_complete"));
        // 未配置资料库路径时不提供资料库工具
        assert!(!names.contains(&"corpus_explorer"));
    }

    #[test]
    fn test_toolkit_definitions_with_corpus() {
        let temp_dir = TempDir::new().unwrap();
        let config = ToolsConfig {
            enable_web_search: false,
            corpus_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };

        let toolkit = ToolKit::new(&config).unwrap();
        let names: Vec<&str> = toolkit
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect();

        assert!(!names.contains(&"web_search"));
        assert!(names.contains(&"corpus_explorer"));
    }

    #[test]
    fn test_completion_signal_detection() {
        assert!(ToolKit::is_completion_signal("research_complete"));
        assert!(!ToolKit::is_completion_signal("web_search"));
        assert!(!ToolKit::is_completion_signal("think"));
    }

    #[tokio::test]
    async fn test_execute_think_echoes_reflection() {
        let toolkit = ToolKit::new(&offline_tools_config()).unwrap();

        let execution = toolkit
            .execute(
                "think",
                serde_json::json!({"reflection": "需要再查证发布时间"}),
            )
            .await
            .unwrap();

        assert!(execution.content.contains("需要再查证发布时间"));
        assert!(execution.sources.is_empty());
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let toolkit = ToolKit::new(&offline_tools_config()).unwrap();

        let result = toolkit.execute("teleport", serde_json::json!({})).await;

        match result {
            Err(EngineError::ToolFailure { tool, .. }) => assert_eq!(tool, "teleport"),
            other => panic!("expected ToolFailure, got {:?}", other.map(|e| e.content)),
        }
    }

    #[tokio::test]
    async fn test_execute_disabled_web_search() {
        let toolkit = ToolKit::new(&offline_tools_config()).unwrap();

        let result = toolkit
            .execute("web_search", serde_json::json!({"query": "rust"}))
            .await;

        assert!(matches!(result, Err(EngineError::ToolFailure { .. })));
    }

    #[tokio::test]
    async fn test_execute_malformed_arguments() {
        let toolkit = ToolKit::new(&offline_tools_config()).unwrap();

        // think 工具要求 reflection 字段
        let result = toolkit.execute("think", serde_json::json!({})).await;

        match result {
            Err(EngineError::ToolFailure { message, .. }) => {
                assert!(message.contains("schema"));
            }
            other => panic!("expected ToolFailure, got {:?}", other.map(|e| e.content)),
        }
    }

    #[tokio::test]
    async fn test_execute_research_complete() {
        let toolkit = ToolKit::new(&offline_tools_config()).unwrap();

        let execution = toolkit
            .execute(
                "research_complete",
                serde_json::json!({"summary": "已覆盖全部子问题"}),
            )
            .await
            .unwrap();

        assert!(execution.content.contains("研究完成信号"));
    }

    #[tokio::test]
    async fn test_corpus_explorer_read_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("survey.md"), "向量索引综述内容").unwrap();

        let config = ToolsConfig {
            enable_web_search: false,
            corpus_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let toolkit = ToolKit::new(&config).unwrap();

        let execution = toolkit
            .execute(
                "corpus_explorer",
                serde_json::json!({"action": "read_file", "path": "survey.md"}),
            )
            .await
            .unwrap();

        assert!(execution.content.contains("向量索引综述内容"));
        assert!(execution.content.contains("[来源: survey.md]"));
        assert_eq!(execution.sources, vec!["survey.md".to_string()]);
    }

    #[tokio::test]
    async fn test_corpus_explorer_list_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.md"), "A").unwrap();
        std::fs::create_dir(temp_dir.path().join("papers")).unwrap();
        std::fs::write(temp_dir.path().join("papers/b.md"), "B").unwrap();
        // 隐藏文件应被跳过
        std::fs::write(temp_dir.path().join(".hidden"), "H").unwrap();

        let config = ToolsConfig {
            enable_web_search: false,
            corpus_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let toolkit = ToolKit::new(&config).unwrap();

        let execution = toolkit
            .execute("corpus_explorer", serde_json::json!({"action": "list_directory"}))
            .await
            .unwrap();

        assert!(execution.content.contains("a.md"));
        assert!(execution.content.contains("papers"));
        assert!(!execution.content.contains(".hidden"));
    }

    #[tokio::test]
    async fn test_corpus_explorer_find_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("hnsw_survey.md"), "S").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "N").unwrap();

        let config = ToolsConfig {
            enable_web_search: false,
            corpus_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let toolkit = ToolKit::new(&config).unwrap();

        let execution = toolkit
            .execute(
                "corpus_explorer",
                serde_json::json!({"action": "find_files", "pattern": "*.md"}),
            )
            .await
            .unwrap();

        assert!(execution.content.contains("hnsw_survey.md"));
        assert!(!execution.content.contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_corpus_explorer_missing_document() {
        let temp_dir = TempDir::new().unwrap();
        let config = ToolsConfig {
            enable_web_search: false,
            corpus_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let toolkit = ToolKit::new(&config).unwrap();

        // 文档不存在时工具返回说明性文本而非错误
        let execution = toolkit
            .execute(
                "corpus_explorer",
                serde_json::json!({"action": "read_file", "path": "ghost.md"}),
            )
            .await
            .unwrap();

        assert!(execution.content.contains("文档不存在"));
        assert!(execution.sources.is_empty());
    }
}
