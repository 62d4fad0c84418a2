#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use rig::completion::ToolDefinition;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::config::Config;
    use crate::engine::context::RunContext;
    use crate::engine::workflow;
    use crate::error::EngineError;
    use crate::llm::client::{ModelGateway, ModelTurn};
    use crate::types::{Phase, RunState, Speaker};

    /// 永不响应的模型网关，用于不触发模型调用的流程测试
    struct SilentGateway;

    #[async_trait]
    impl ModelGateway for SilentGateway {
        async fn extract<T>(&self, _system_prompt: &str, _user_prompt: &str) -> Result<T>
        where
            T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
        {
            Err(anyhow!("silent gateway"))
        }

        async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Err(anyhow!("silent gateway"))
        }

        async fn research_turn(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _tools: &[ToolDefinition],
        ) -> Result<ModelTurn> {
            Err(anyhow!("silent gateway"))
        }

        async fn check_connection(&self) -> Result<()> {
            Ok(())
        }
    }

    fn create_test_context() -> (RunContext<SilentGateway>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.tools.enable_web_search = false;
        config.session.session_dir = temp_dir.path().join("sessions");

        let context = RunContext::with_gateway(config, SilentGateway).unwrap();
        (context, temp_dir)
    }

    #[test]
    fn test_run_context_creation() {
        let (context, _temp_dir) = create_test_context();

        // 离线配置下工具集仍包含思考与完成信号工具
        assert_eq!(context.toolkit.definitions().len(), 2);
        assert!(!context.config.tools.enable_web_search);
    }

    #[test]
    fn test_run_context_clone_shares_services() {
        let (context, _temp_dir) = create_test_context();
        let cloned = context.clone();

        assert!(Arc::ptr_eq(&context.gateway, &cloned.gateway));
        assert!(Arc::ptr_eq(&context.toolkit, &cloned.toolkit));
        assert!(Arc::ptr_eq(&context.sessions, &cloned.sessions));
        assert!(Arc::ptr_eq(&context.compressor, &cloned.compressor));
    }

    #[tokio::test]
    async fn test_new_session_starts_clarifying() {
        let (context, _temp_dir) = create_test_context();

        let state = workflow::resume_or_create(&context, "研究Rust异步运行时的调度策略", None)
            .await
            .unwrap();

        assert!(!state.session_id.is_empty());
        assert_eq!(state.phase, Phase::Clarifying);
        assert_eq!(state.conversation.len(), 1);
        assert_eq!(state.conversation[0].speaker, Speaker::User);
        assert!(state.brief.is_none());
        assert!(state.research_notes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (context, _temp_dir) = create_test_context();

        let err = workflow::run(&context, "继续", Some("no-such-session"))
            .await
            .unwrap_err();

        match err.downcast_ref::<EngineError>() {
            Some(EngineError::SessionNotFound(id)) => assert_eq!(id, "no-such-session"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resume_rewinds_to_clarifying_and_appends_turn() {
        let (context, _temp_dir) = create_test_context();

        // 挂起中的会话：助手刚提出过澄清问题
        let mut suspended = RunState::new("session-42");
        suspended.append_user_turn("研究最好的数据库");
        suspended.append_assistant_turn("你指哪一类数据库？用于什么场景？");
        suspended.phase = Phase::Clarifying;
        context.sessions.save(&suspended).await.unwrap();

        let resumed = workflow::resume_or_create(&context, "开源的时序数据库，用于物联网场景", Some("session-42"))
            .await
            .unwrap();

        assert_eq!(resumed.session_id, "session-42");
        assert_eq!(resumed.phase, Phase::Clarifying);
        assert_eq!(resumed.conversation.len(), 3);
        assert_eq!(resumed.conversation[2].speaker, Speaker::User);
        assert_eq!(resumed.conversation[2].content, "开源的时序数据库，用于物联网场景");
        // 先前的轮次原样保留，只追加不重排
        assert_eq!(resumed.conversation[0].content, "研究最好的数据库");
        assert_eq!(resumed.conversation[1].speaker, Speaker::Assistant);
    }

    #[tokio::test]
    async fn test_resume_after_done_reenters_clarifying() {
        let (context, _temp_dir) = create_test_context();

        let mut finished = RunState::new("finished-session");
        finished.append_user_turn("水的沸点是多少？");
        finished.phase = Phase::Done;
        finished.report = Some("水在标准大气压下的沸点是100摄氏度。".to_string());
        context.sessions.save(&finished).await.unwrap();

        let resumed = workflow::resume_or_create(&context, "那在高原上呢？", Some("finished-session"))
            .await
            .unwrap();

        // 无论上次停在哪个阶段，新的用户输入都从范围界定重新开始
        assert_eq!(resumed.phase, Phase::Clarifying);
        assert_eq!(resumed.conversation.len(), 2);
        assert!(resumed.report.is_some());
    }
}
