use crate::internal::uploader::structs::SourceFile;

/// 单条类型规则
#[derive(Debug, Clone, PartialEq, Eq)]
enum AcceptRule {
    /// `.png`：按文件名扩展名匹配（不区分大小写）
    Extension(String),
    /// `image/*`：按 mime 主类型匹配
    MimePrefix(String),
    /// `application/pdf`：按完整 mime 匹配
    Mime(String),
}

/// 文件类型过滤，语法同 `<input accept>`：逗号分隔的 `.ext`、`type/*`、`type/subtype`。
///
/// 空字符串表示不限制。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptFilter {
    rules: Vec<AcceptRule>,
}

impl AcceptFilter {
    pub fn parse(accept: &str) -> Self {
        let rules = accept
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('.') {
                    AcceptRule::Extension(s)
                } else if let Some(prefix) = s.strip_suffix("/*") {
                    AcceptRule::MimePrefix(format!("{prefix}/"))
                } else {
                    AcceptRule::Mime(s)
                }
            })
            .collect();
        Self { rules }
    }

    /// 是否不做任何限制
    pub fn accepts_all(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn matches(&self, file: &SourceFile) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let name = file.name().to_ascii_lowercase();
        let mime = file.mime_type().to_ascii_lowercase();

        self.rules.iter().any(|rule| match rule {
            AcceptRule::Extension(ext) => name.ends_with(ext.as_str()),
            AcceptRule::MimePrefix(prefix) => mime.starts_with(prefix.as_str()),
            AcceptRule::Mime(exact) => mime == *exact,
        })
    }
}
