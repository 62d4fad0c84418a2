//! 研究工具集
//!
//! 工具清单在构造时静态确定，运行期间不增删。所有工具经由统一的
//! `(名称, 参数)` 调度接口执行，执行失败以错误值返回而不中断研究循环。

pub mod complete;
pub mod corpus_explorer;
pub mod think;
pub mod web_search;

use anyhow::Result;
use rig::completion::ToolDefinition;
use rig::tool::Tool;

use crate::config::ToolsConfig;
use crate::error::EngineError;

pub use complete::AgentToolResearchComplete;
pub use corpus_explorer::AgentToolCorpusExplorer;
pub use think::AgentToolThink;
pub use web_search::AgentToolWebSearch;

/// 工具执行产物：供模型阅读的观察文本与来源标签
#[derive(Debug, Clone)]
pub struct ToolExecution {
    pub content: String,
    pub sources: Vec<String>,
}

/// 研究工具集 - 统一的工具调度入口
pub struct ToolKit {
    web_search: Option<AgentToolWebSearch>,
    corpus_explorer: Option<AgentToolCorpusExplorer>,
    think: AgentToolThink,
    research_complete: AgentToolResearchComplete,
    definitions: Vec<ToolDefinition>,
}

impl ToolKit {
    /// 根据配置构造工具集
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        let web_search = if config.enable_web_search {
            Some(AgentToolWebSearch::new(config)?)
        } else {
            None
        };

        let corpus_explorer = config
            .corpus_path
            .as_ref()
            .map(|root| AgentToolCorpusExplorer::new(root.clone(), config.max_document_bytes));

        let think = AgentToolThink::new();
        let research_complete = AgentToolResearchComplete::new();

        let mut definitions = Vec::new();
        if web_search.is_some() {
            definitions.push(AgentToolWebSearch::tool_definition());
        }
        if corpus_explorer.is_some() {
            definitions.push(AgentToolCorpusExplorer::tool_definition());
        }
        definitions.push(AgentToolThink::tool_definition());
        definitions.push(AgentToolResearchComplete::tool_definition());

        Ok(Self {
            web_search,
            corpus_explorer,
            think,
            research_complete,
            definitions,
        })
    }

    /// 当前可用工具的描述清单
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// 判断某个工具调用是否为研究完成信号
    pub fn is_completion_signal(name: &str) -> bool {
        name == AgentToolResearchComplete::NAME
    }

    /// 按名称调度执行工具
    pub async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolExecution, EngineError> {
        match name {
            AgentToolWebSearch::NAME => {
                let tool = self.web_search.as_ref().ok_or_else(|| {
                    EngineError::ToolFailure {
                        tool: name.to_string(),
                        message: "网络搜索工具未启用".to_string(),
                    }
                })?;
                let args = Self::parse_args(name, arguments)?;
                let result = tool
                    .call(args)
                    .await
                    .map_err(|e| Self::execution_failure(name, e))?;
                Ok(ToolExecution {
                    content: result.render(),
                    sources: result.source_urls(),
                })
            }
            AgentToolCorpusExplorer::NAME => {
                let tool = self.corpus_explorer.as_ref().ok_or_else(|| {
                    EngineError::ToolFailure {
                        tool: name.to_string(),
                        message: "资料库浏览工具未启用".to_string(),
                    }
                })?;
                let args = Self::parse_args(name, arguments)?;
                let result = tool
                    .call(args)
                    .await
                    .map_err(|e| Self::execution_failure(name, e))?;
                Ok(ToolExecution {
                    content: result.render(),
                    sources: result.source_paths(),
                })
            }
            AgentToolThink::NAME => {
                let args = Self::parse_args(name, arguments)?;
                let result = self
                    .think
                    .call(args)
                    .await
                    .map_err(|e| Self::execution_failure(name, e))?;
                Ok(ToolExecution {
                    content: result.render(),
                    sources: Vec::new(),
                })
            }
            AgentToolResearchComplete::NAME => {
                let args = Self::parse_args(name, arguments)?;
                let result = self
                    .research_complete
                    .call(args)
                    .await
                    .map_err(|e| Self::execution_failure(name, e))?;
                Ok(ToolExecution {
                    content: result.render(),
                    sources: Vec::new(),
                })
            }
            _ => Err(EngineError::ToolFailure {
                tool: name.to_string(),
                message: "未知的工具名称".to_string(),
            }),
        }
    }

    fn parse_args<A: serde::de::DeserializeOwned>(
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<A, EngineError> {
        serde_json::from_value(arguments).map_err(|e| EngineError::ToolFailure {
            tool: name.to_string(),
            message: format!("参数不符合工具schema: {}", e),
        })
    }

    fn execution_failure(name: &str, error: impl std::fmt::Display) -> EngineError {
        EngineError::ToolFailure {
            tool: name.to_string(),
            message: error.to_string(),
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
