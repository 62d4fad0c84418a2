//! 本地资料库浏览工具

use anyhow::Result;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
#[cfg(debug_assertions)]
use std::time::Duration;
use walkdir::WalkDir;

/// 资料库浏览工具
///
/// 在配置指定的资料库根目录内列目录、找文件、读取文档内容，
/// 读取结果带有资料路径来源标注。
#[derive(Debug, Clone)]
pub struct AgentToolCorpusExplorer {
    root: PathBuf,
    max_document_bytes: u64,
}

/// 资料库浏览参数
#[derive(Debug, Deserialize)]
pub struct CorpusExplorerArgs {
    pub action: String, // "list_directory", "find_files", "read_file"
    pub path: Option<String>,
    pub pattern: Option<String>,
    pub max_files: Option<usize>,
}

/// 资料库浏览结果
#[derive(Debug, Serialize, Default)]
pub struct CorpusExplorerResult {
    pub files: Vec<String>,
    pub directories: Vec<String>,
    pub document: Option<String>,
    pub document_path: Option<String>,
    pub insights: Vec<String>,
}

impl CorpusExplorerResult {
    /// 渲染为观察文本
    pub fn render(&self) -> String {
        let mut content = String::new();
        for insight in &self.insights {
            content.push_str(insight);
            content.push('\n');
        }
        if !self.directories.is_empty() {
            content.push_str(&format!("目录: {}\n", self.directories.join(", ")));
        }
        if !self.files.is_empty() {
            content.push_str("文件:\n");
            for file in &self.files {
                content.push_str(&format!("  - {}\n", file));
            }
        }
        if let (Some(document), Some(path)) = (&self.document, &self.document_path) {
            content.push_str(&format!("文档内容 [来源: {}]:\n{}\n", path, document));
        }
        content
    }

    /// 被读取文档的来源路径
    pub fn source_paths(&self) -> Vec<String> {
        self.document_path.iter().cloned().collect()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("corpus explorer tool error: {0}")]
pub struct CorpusExplorerToolError(pub String);

impl AgentToolCorpusExplorer {
    pub fn new(root: PathBuf, max_document_bytes: u64) -> Self {
        Self {
            root,
            max_document_bytes,
        }
    }

    pub(crate) fn tool_definition() -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description:
                "浏览本地资料库，列出目录内容，按名称模式查找资料，读取单篇文档的内容。"
                    .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["list_directory", "find_files", "read_file"],
                        "description": "要执行的操作类型：list_directory(列出目录), find_files(查找资料), read_file(读取文档)"
                    },
                    "path": {
                        "type": "string",
                        "description": "目标路径（相对于资料库根目录）"
                    },
                    "pattern": {
                        "type": "string",
                        "description": "资料名称搜索模式（用于find_files操作）"
                    },
                    "max_files": {
                        "type": "integer",
                        "description": "最大返回文件数量（默认100）"
                    }
                },
                "required": ["action"]
            }),
        }
    }

    async fn list_directory(&self, args: &CorpusExplorerArgs) -> Result<CorpusExplorerResult> {
        let target_path = self.resolve_path(args.path.as_deref());

        if !target_path.exists() {
            return Ok(CorpusExplorerResult {
                insights: vec![format!("路径不存在: {}", target_path.display())],
                ..Default::default()
            });
        }

        let max_files = args.max_files.unwrap_or(100);
        let mut files = Vec::new();
        let mut directories = Vec::new();

        // 递归遍历，限制深度为3
        for entry in WalkDir::new(&target_path).max_depth(3) {
            if files.len() >= max_files {
                break;
            }

            let entry = entry?;
            let path = entry.path();

            if self.is_hidden(path) {
                continue;
            }

            if entry.file_type().is_file() {
                files.push(self.relative_display(path));
            } else if entry.file_type().is_dir() && path != target_path {
                directories.push(self.relative_display(path));
            }
        }

        let insights = vec![format!(
            "找到 {} 个文件和 {} 个目录",
            files.len(),
            directories.len()
        )];

        Ok(CorpusExplorerResult {
            files,
            directories,
            insights,
            ..Default::default()
        })
    }

    async fn find_files(&self, args: &CorpusExplorerArgs) -> Result<CorpusExplorerResult> {
        let pattern = args
            .pattern
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("find_files action requires pattern parameter"))?;

        let search_path = self.resolve_path(args.path.as_deref());

        if !search_path.exists() {
            return Ok(CorpusExplorerResult {
                insights: vec![format!("搜索路径不存在: {}", search_path.display())],
                ..Default::default()
            });
        }

        let max_files = args.max_files.unwrap_or(100);
        let mut files = Vec::new();

        // 递归搜索，限制深度为5
        for entry in WalkDir::new(&search_path).max_depth(5) {
            if files.len() >= max_files {
                break;
            }

            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_file() || self.is_hidden(path) {
                continue;
            }

            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if self.matches_pattern(file_name, pattern) {
                files.push(self.relative_display(path));
            }
        }

        let insights = vec![
            format!("搜索模式: {}", pattern),
            format!("找到 {} 个匹配文件", files.len()),
        ];

        Ok(CorpusExplorerResult {
            files,
            insights,
            ..Default::default()
        })
    }

    async fn read_file(&self, args: &CorpusExplorerArgs) -> Result<CorpusExplorerResult> {
        let file_path = args
            .path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("read_file action requires path parameter"))?;

        let target_path = self.root.join(file_path);

        if !target_path.exists() || !target_path.is_file() {
            return Ok(CorpusExplorerResult {
                insights: vec![format!("文档不存在: {}", target_path.display())],
                ..Default::default()
            });
        }

        let metadata = std::fs::metadata(&target_path)?;
        let content = std::fs::read_to_string(&target_path)?;

        // 超过大小限制时截断，按字符边界处理
        let document = if metadata.len() > self.max_document_bytes {
            let limit = self.max_document_bytes as usize;
            let truncated: String = content.chars().take(limit).collect();
            format!("{}\n...(文档过大，已截断)", truncated)
        } else {
            content
        };

        let relative = self.relative_display(&target_path);

        Ok(CorpusExplorerResult {
            insights: vec![format!("读取文档: {} ({} 字节)", relative, metadata.len())],
            document: Some(document),
            document_path: Some(relative),
            ..Default::default()
        })
    }

    fn resolve_path(&self, path: Option<&str>) -> PathBuf {
        match path {
            Some(p) => self.root.join(p),
            None => self.root.clone(),
        }
    }

    fn relative_display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    fn is_hidden(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
    }

    fn matches_pattern(&self, file_name: &str, pattern: &str) -> bool {
        if pattern.contains('*') {
            // 简单的通配符匹配
            let parts: Vec<&str> = pattern.split('*').collect();
            if parts.len() == 2 {
                let prefix = parts[0];
                let suffix = parts[1];
                return file_name.starts_with(prefix) && file_name.ends_with(suffix);
            }
        }

        // 包含匹配
        file_name.to_lowercase().contains(&pattern.to_lowercase())
    }
}

impl Tool for AgentToolCorpusExplorer {
    const NAME: &'static str = "corpus_explorer";

    type Error = CorpusExplorerToolError;
    type Args = CorpusExplorerArgs;
    type Output = CorpusExplorerResult;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        Self::tool_definition()
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...corpus_explorer@{:?}", args);

        #[cfg(debug_assertions)]
        tokio::time::sleep(Duration::from_secs(2)).await;

        match args.action.as_str() {
            "list_directory" => self
                .list_directory(&args)
                .await
                .map_err(|e| CorpusExplorerToolError(e.to_string())),
            "find_files" => self
                .find_files(&args)
                .await
                .map_err(|e| CorpusExplorerToolError(e.to_string())),
            "read_file" => self
                .read_file(&args)
                .await
                .map_err(|e| CorpusExplorerToolError(e.to_string())),
            _ => Err(CorpusExplorerToolError(format!(
                "unknown action: {}",
                args.action
            ))),
        }
    }
}
