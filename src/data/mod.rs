//! 数据加载模块
//!
//! 提供成对体数据（图像/分割标签）的枚举、预加载、校验、变换和批处理功能。
//!
//! # 主要组件
//!
//! - [`Lits3dDataset`]: `<root>/<split>/{image,segmentation}` 下成对的 NIfTI 数据集
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`volume`]: NIfTI 体数据读取与文件识别
//! - [`check`]: 图像/标签对的合法性检查
//! - [`transforms`]: 成对变换接口
//! - [`seed`]: 每次访问的确定性随机种子
//! - [`DatasetConfig`]: JSON 配置
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use attention_gated_dataio::data::{DataLoader, Lits3dDataset};
//!
//! let dataset = Lits3dDataset::builder("/data/lits", "train")
//!     .transform(my_augmentation)
//!     .preload(true)
//!     .seed(42)
//!     .build()?;
//! let mut loader = DataLoader::new(&dataset, 2).shuffle(true).seed(42);
//!
//! for epoch in 0..epochs {
//!     loader.set_epoch(epoch);
//!     for batch in loader.iter() {
//!         let batch = batch?;
//!         // ...
//!     }
//! }
//! ```

pub mod check;
pub mod config;
mod dataloader;
pub mod datasets;
pub mod error;
pub mod seed;
mod split;
pub mod transforms;
pub mod volume;

#[cfg(test)]
mod tests;

// Re-exports
pub use check::{NoCheck, PairCheck, SanityCheck};
pub use config::{DatasetConfig, LoaderConfig};
pub use dataloader::{DataLoader, DataLoaderIterator};
pub use datasets::{Lits3dDataset, Lits3dDatasetBuilder, Storage};
pub use error::DataError;
pub use seed::{AccessKey, SeedPolicy};
pub use split::Split;
pub use transforms::{Compose, Pair, PairTransform};
pub use volume::{VolumeMeta, is_image_file, load_nifti_volume, read_volume_meta};
