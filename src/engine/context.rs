use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::llm::client::{LLMClient, ModelGateway};
use crate::llm::tools::ToolKit;
use crate::session::SessionStore;
use crate::utils::context_compressor::ContextCompressor;

/// 引擎运行上下文
///
/// 各阶段组件共享的服务集合。对模型网关保持泛型，
/// 便于在测试中用脚本化网关替换真实LLM客户端。
pub struct RunContext<G: ModelGateway> {
    /// 模型网关，引擎与LLM通信的唯一入口
    pub gateway: Arc<G>,
    /// 配置
    pub config: Config,
    /// 研究工具集
    pub toolkit: Arc<ToolKit>,
    /// 会话存储，支撑澄清挂起后的恢复
    pub sessions: Arc<SessionStore>,
    /// 上下文压缩器
    pub compressor: Arc<ContextCompressor>,
}

impl<G: ModelGateway> Clone for RunContext<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            config: self.config.clone(),
            toolkit: Arc::clone(&self.toolkit),
            sessions: Arc::clone(&self.sessions),
            compressor: Arc::clone(&self.compressor),
        }
    }
}

impl RunContext<LLMClient> {
    /// 创建使用真实LLM客户端的运行上下文
    pub fn new(config: Config) -> Result<Self> {
        let gateway = LLMClient::new(config.clone())?;
        Self::with_gateway(config, gateway)
    }
}

impl<G: ModelGateway> RunContext<G> {
    /// 以指定的模型网关创建运行上下文
    pub fn with_gateway(config: Config, gateway: G) -> Result<Self> {
        let toolkit = Arc::new(ToolKit::new(&config.tools)?);
        let sessions = Arc::new(SessionStore::new(config.session.clone()));
        let compressor = Arc::new(ContextCompressor::new(config.compression.clone()));

        Ok(Self {
            gateway: Arc::new(gateway),
            config,
            toolkit,
            sessions,
            compressor,
        })
    }
}
