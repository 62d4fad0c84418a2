//! 网络搜索工具

use anyhow::Result;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
#[cfg(debug_assertions)]
use std::time::Duration;

use crate::config::ToolsConfig;

/// 网络搜索工具
#[derive(Debug, Clone)]
pub struct AgentToolWebSearch {
    endpoint: String,
    api_key: String,
    max_results: usize,
    http: reqwest::Client,
}

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct WebSearchArgs {
    pub query: String,
}

/// 单条搜索命中
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// 搜索结果
#[derive(Debug, Serialize)]
pub struct WebSearchResult {
    pub query: String,
    pub answer: Option<String>,
    pub hits: Vec<SearchHit>,
}

impl WebSearchResult {
    /// 渲染为带来源标注的观察文本
    pub fn render(&self) -> String {
        let mut content = format!("搜索问题: {}\n", self.query);
        if let Some(answer) = &self.answer {
            content.push_str(&format!("综合摘要: {}\n", answer));
        }
        if self.hits.is_empty() {
            content.push_str("没有找到相关结果。\n");
        }
        for (i, hit) in self.hits.iter().enumerate() {
            content.push_str(&format!(
                "{}. {} [来源: {}]\n   {}\n",
                i + 1,
                hit.title,
                hit.url,
                hit.content
            ));
        }
        content
    }

    /// 命中的来源URL列表
    pub fn source_urls(&self) -> Vec<String> {
        self.hits.iter().map(|hit| hit.url.clone()).collect()
    }
}

/// 搜索服务的响应体
#[derive(Debug, Deserialize)]
struct SearchApiResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchApiHit>,
}

#[derive(Debug, Deserialize)]
struct SearchApiHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, thiserror::Error)]
#[error("web search tool error: {0}")]
pub struct WebSearchToolError(pub String);

impl AgentToolWebSearch {
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.search_timeout_seconds))
            .build()?;

        Ok(Self {
            endpoint: config.web_search_endpoint.clone(),
            api_key: config.web_search_api_key.clone(),
            max_results: config.max_search_results,
            http,
        })
    }

    pub(crate) fn tool_definition() -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description:
                "在互联网上搜索与研究课题相关的最新信息，返回带来源URL的摘要片段。".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "搜索查询语句，使用具体、聚焦的关键词组合"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn search(&self, args: &WebSearchArgs) -> Result<WebSearchResult> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": args.query,
            "max_results": self.max_results,
            "include_answer": true,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: SearchApiResponse = response.json().await?;

        let hits = parsed
            .results
            .into_iter()
            .take(self.max_results)
            .map(|hit| SearchHit {
                title: hit.title,
                url: hit.url,
                // 安全地截取片段，避免超长内容撑爆上下文
                content: if hit.content.chars().count() > 2000 {
                    let truncated: String = hit.content.chars().take(2000).collect();
                    format!("{}...", truncated)
                } else {
                    hit.content
                },
            })
            .collect();

        Ok(WebSearchResult {
            query: args.query.clone(),
            answer: parsed.answer,
            hits,
        })
    }
}

impl Tool for AgentToolWebSearch {
    const NAME: &'static str = "web_search";

    type Error = WebSearchToolError;
    type Args = WebSearchArgs;
    type Output = WebSearchResult;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        Self::tool_definition()
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...web_search@{:?}", args);

        #[cfg(debug_assertions)]
        tokio::time::sleep(Duration::from_secs(2)).await;

        self.search(&args)
            .await
            .map_err(|e| WebSearchToolError(e.to_string()))
    }
}
