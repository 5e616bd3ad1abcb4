//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件或目录未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// NIfTI 解码错误
    #[error("NIfTI 读取失败 {path:?}: {source}")]
    Nifti {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },

    /// 自定义检查未通过（供 `PairCheck` 实现使用）
    #[error("样本检查未通过: {0}")]
    CheckError(String),

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 图像与标签形状不一致
    #[error("图像与标签形状不一致: 图像 {image:?}, 标签 {label:?}")]
    ShapeMismatch { image: Vec<usize>, label: Vec<usize> },

    /// 空白图像（最大值不为正）
    #[error("空白图像: 最大值为 {max:?}")]
    BlankImage { max: Option<i16> },

    /// 图像与标签文件数量不一致
    #[error("{split} 数据集的图像与标签数量不一致: 图像 {images} 个, 标签 {labels} 个")]
    PairCountMismatch {
        split: String,
        images: usize,
        labels: usize,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// JSON 解析错误
    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 数据变换失败
    #[error("数据变换失败: {0}")]
    TransformError(String),
}

impl DataError {
    pub(crate) fn nifti(path: impl Into<PathBuf>, source: nifti::NiftiError) -> Self {
        Self::Nifti {
            path: path.into(),
            source,
        }
    }
}
