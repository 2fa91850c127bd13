use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::upload_error::UploadError;

/// 源文件数据所在位置
#[derive(Debug, Clone)]
enum SourceOrigin {
    /// 本地文件，开始分块时才一次性读入内存
    Path(PathBuf),
    /// 已在内存中的数据
    Memory(Bytes),
}

/// 待上传的源文件：名称、mime 类型、大小，以及数据来源。
///
/// 名称与大小在创建时即可得到，批量上传据此在发出任何请求前做大小检查；
/// 文件内容在上传器进入分块阶段时才读取，读取后只读共享。
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    mime_type: String,
    size: u64,
    origin: SourceOrigin,
}

impl SourceFile {
    /// 从本地路径创建；只读取元数据，mime 类型按扩展名推断。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(UploadError::ReadSource)?;

        if metadata.is_dir() {
            return Err(UploadError::Configuration(format!(
                "仅支持上传文件，当前为目录: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            mime_type: guess_mime_type(&name),
            name,
            size: metadata.len(),
            origin: SourceOrigin::Path(path.to_path_buf()),
        })
    }

    /// 从内存数据创建；mime 类型按名称的扩展名推断。
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let data = data.into();
        Self {
            mime_type: guess_mime_type(&name),
            name,
            size: data.len() as u64,
            origin: SourceOrigin::Memory(data),
        }
    }

    /// 覆盖推断出的 mime 类型。
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// 创建时得到的大小（字节）。
    pub fn size(&self) -> u64 {
        self.size
    }

    /// 一次性读取全部内容。
    pub(crate) async fn read_all(&self) -> Result<Bytes, UploadError> {
        match &self.origin {
            SourceOrigin::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(UploadError::ReadSource),
            SourceOrigin::Memory(data) => Ok(data.clone()),
        }
    }
}

fn guess_mime_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
