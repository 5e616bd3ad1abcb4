//! 内置数据集
//!
//! - LiTS 3D：成对的 CT 体数据与分割标签（分割任务）

mod lits3d;

pub use lits3d::{
    FileFilter, IMAGE_DIR, LABEL_DIR, Lits3dDataset, Lits3dDatasetBuilder, Storage,
    list_volume_files,
};
