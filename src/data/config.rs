//! 数据集与加载器配置
//!
//! 配置以 JSON 保存，例如：
//! ```json
//! {
//!     "root": "/data/lits",
//!     "split": "train",
//!     "preload": true,
//!     "seed": 42,
//!     "loader": { "batch_size": 2, "shuffle": true, "num_workers": 4 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::datasets::Lits3dDatasetBuilder;
use super::error::DataError;
use super::split::Split;

/// 数据集配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub split: Split,
    #[serde(default)]
    pub preload: bool,
    /// 数据增强的基础种子
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// 加载器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub batch_size: usize,
    pub shuffle: bool,
    pub drop_last: bool,
    pub num_workers: usize,
    /// 打乱顺序用的种子，为空则每次随机
    pub seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            shuffle: false,
            drop_last: false,
            num_workers: 0,
            seed: None,
        }
    }
}

impl DatasetConfig {
    pub fn new(root: impl AsRef<Path>, split: impl Into<Split>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            split: split.into(),
            preload: false,
            seed: 0,
            loader: LoaderConfig::default(),
        }
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取并校验
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        if !path.is_file() {
            return Err(DataError::FileNotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// 保存为 JSON 文件
    pub fn save_json_file(&self, path: &Path) -> Result<(), DataError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.split.as_str().is_empty() {
            return Err(DataError::ConfigError("split 不能为空".to_string()));
        }
        if self.loader.batch_size == 0 {
            return Err(DataError::ConfigError("batch_size 必须大于 0".to_string()));
        }
        Ok(())
    }

    /// 按配置生成数据集构造器（变换、检查等可继续在构造器上设置）
    pub fn builder(&self) -> Lits3dDatasetBuilder {
        Lits3dDatasetBuilder::new(&self.root, self.split.clone())
            .preload(self.preload)
            .seed(self.seed)
    }

    pub fn loader_config(&self) -> &LoaderConfig {
        &self.loader
    }
}
