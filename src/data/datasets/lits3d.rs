//! LiTS 风格的 3D 分割数据集
//!
//! 目录结构：
//! ```text
//! <root>/<split>/image/*.nii(.gz)          图像体数据（按 i16 读取）
//! <root>/<split>/segmentation/*.nii(.gz)   标签体数据（按 u8 读取）
//! ```
//! 两个目录下的文件各自按绝对路径字典序排序后一一配对。

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::ArrayD;

use crate::data::check::{PairCheck, SanityCheck};
use crate::data::error::DataError;
use crate::data::seed::{AccessKey, SeedPolicy};
use crate::data::split::Split;
use crate::data::transforms::{Pair, PairTransform};
use crate::data::volume::{VolumeMeta, is_image_file, load_nifti_volume, read_volume_meta};

/// 图像子目录名
pub const IMAGE_DIR: &str = "image";
/// 标签子目录名
pub const LABEL_DIR: &str = "segmentation";

/// 判断文件是否属于数据集的谓词
pub type FileFilter = fn(&Path) -> bool;

/// 体数据的存放方式，构造时确定
pub enum Storage {
    /// 每次访问都从硬盘读取
    Lazy,
    /// 构造时全部读入内存
    Preloaded {
        images: Vec<ArrayD<i16>>,
        labels: Vec<ArrayD<u8>>,
    },
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Lazy => write!(f, "Lazy"),
            Storage::Preloaded { images, .. } => write!(f, "Preloaded({} pairs)", images.len()),
        }
    }
}

/// [`Lits3dDataset`] 的构造器
pub struct Lits3dDatasetBuilder {
    root: PathBuf,
    split: Split,
    transform: Option<Box<dyn PairTransform>>,
    check: Box<dyn PairCheck>,
    file_filter: FileFilter,
    preload: bool,
    seed: u64,
}

impl Lits3dDatasetBuilder {
    pub fn new(root: impl AsRef<Path>, split: impl Into<Split>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            split: split.into(),
            transform: None,
            check: Box::new(SanityCheck),
            file_filter: is_image_file,
            preload: false,
            seed: 0,
        }
    }

    /// 设置每次访问时应用的成对变换
    pub fn transform<T: PairTransform + 'static>(mut self, transform: T) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// 直接设置（可能为空的）已装箱变换
    pub fn boxed_transform(mut self, transform: Option<Box<dyn PairTransform>>) -> Self {
        self.transform = transform;
        self
    }

    /// 替换默认的 [`SanityCheck`]
    pub fn check<C: PairCheck + 'static>(mut self, check: C) -> Self {
        self.check = Box::new(check);
        self
    }

    /// 替换默认的 [`is_image_file`]
    pub fn file_filter(mut self, filter: FileFilter) -> Self {
        self.file_filter = filter;
        self
    }

    /// 是否在构造时把全部体数据读入内存
    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    /// 设置数据增强随机数的基础种子
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<Lits3dDataset, DataError> {
        if self.split.as_str().is_empty() {
            return Err(DataError::ConfigError("split 不能为空".to_string()));
        }
        let split_dir = self.root.join(self.split.as_str());
        let image_files = list_volume_files(&split_dir.join(IMAGE_DIR), self.file_filter)?;
        let label_files = list_volume_files(&split_dir.join(LABEL_DIR), self.file_filter)?;
        if image_files.len() != label_files.len() {
            return Err(DataError::PairCountMismatch {
                split: self.split.to_string(),
                images: image_files.len(),
                labels: label_files.len(),
            });
        }

        log::info!(
            "Number of {} images: {} NIFTIs",
            self.split,
            image_files.len()
        );

        let storage = if self.preload {
            log::info!("Preloading the {} dataset ...", self.split);
            let images = image_files
                .iter()
                .map(|p| load_nifti_volume::<i16>(p).map(|(v, _)| v))
                .collect::<Result<Vec<_>, _>>()?;
            let labels = label_files
                .iter()
                .map(|p| load_nifti_volume::<u8>(p).map(|(v, _)| v))
                .collect::<Result<Vec<_>, _>>()?;
            log::info!("Loading is done");
            Storage::Preloaded { images, labels }
        } else {
            Storage::Lazy
        };

        Ok(Lits3dDataset {
            root: self.root,
            split: self.split,
            image_files,
            label_files,
            storage,
            transform: self.transform,
            check: self.check,
            seed: SeedPolicy::new(self.seed),
            accesses: AtomicU64::new(0),
        })
    }
}

/// 成对的 3D 图像/标签数据集
///
/// 构造后不可变（除 [`get`](Self::get) 使用的访问计数外），可在多个线程间共享并发读取。
///
/// # 示例
/// ```ignore
/// let dataset = Lits3dDataset::builder("/data/lits", "train")
///     .preload(true)
///     .seed(42)
///     .build()?;
/// let (image, label) = dataset.get(0)?;
/// ```
pub struct Lits3dDataset {
    root: PathBuf,
    split: Split,
    image_files: Vec<PathBuf>,
    label_files: Vec<PathBuf>,
    storage: Storage,
    transform: Option<Box<dyn PairTransform>>,
    check: Box<dyn PairCheck>,
    seed: SeedPolicy,
    accesses: AtomicU64,
}

impl Lits3dDataset {
    pub fn builder(root: impl AsRef<Path>, split: impl Into<Split>) -> Lits3dDatasetBuilder {
        Lits3dDatasetBuilder::new(root, split)
    }

    /// 使用默认检查与种子 0 构造数据集
    ///
    /// # 参数
    /// - `root`: 数据根目录
    /// - `split`: 划分名，对应 `<root>` 下的子目录
    /// - `transform`: 可选的成对变换
    /// - `preload`: 是否预先读入内存
    pub fn new(
        root: impl AsRef<Path>,
        split: impl Into<Split>,
        transform: Option<Box<dyn PairTransform>>,
        preload: bool,
    ) -> Result<Self, DataError> {
        Self::builder(root, split)
            .boxed_transform(transform)
            .preload(preload)
            .build()
    }

    /// 返回数据集中的样本对数量
    pub fn len(&self) -> usize {
        self.image_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_files.is_empty()
    }

    /// 获取第 index 对样本
    ///
    /// 每次调用占用一个新的访问序号（worker 0），因此同一样本多次访问得到不同的增强。
    /// 多线程下序号的分配顺序不确定；需要可复现的结果时使用 [`get_seeded`](Self::get_seeded)。
    pub fn get(&self, index: usize) -> Result<Pair, DataError> {
        let access = self.accesses.fetch_add(1, Ordering::Relaxed);
        self.get_seeded(index, AccessKey::new(0, access))
    }

    /// 获取第 index 对样本，数据增强使用由 `key` 派生的随机流
    ///
    /// 流程：读取（或复制预加载的）体数据 → 合法性检查 → 变换。
    pub fn get_seeded(&self, index: usize, key: AccessKey) -> Result<Pair, DataError> {
        let (image, label) = self.get_raw(index)?;
        self.check.check(&image, &label)?;

        match &self.transform {
            Some(transform) => {
                let mut rng = self.seed.rng(key);
                transform.apply(image, label, &mut rng)
            }
            None => Ok((image, label)),
        }
    }

    /// 获取未经检查与变换的原始样本对
    ///
    /// 预加载模式下返回的是拷贝，修改它不会影响缓存。
    pub fn get_raw(&self, index: usize) -> Result<Pair, DataError> {
        self.check_index(index)?;
        match &self.storage {
            Storage::Lazy => {
                let (image, _) = load_nifti_volume::<i16>(&self.image_files[index])?;
                let (label, _) = load_nifti_volume::<u8>(&self.label_files[index])?;
                Ok((image, label))
            }
            Storage::Preloaded { images, labels } => {
                Ok((images[index].clone(), labels[index].clone()))
            }
        }
    }

    /// 第 index 对样本的头信息（图像, 标签）
    pub fn meta(&self, index: usize) -> Result<(VolumeMeta, VolumeMeta), DataError> {
        self.check_index(index)?;
        Ok((
            read_volume_meta(&self.image_files[index])?,
            read_volume_meta(&self.label_files[index])?,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split(&self) -> &Split {
        &self.split
    }

    /// 排序后的图像文件（绝对路径）
    pub fn image_files(&self) -> &[PathBuf] {
        &self.image_files
    }

    /// 排序后的标签文件（绝对路径）
    pub fn label_files(&self) -> &[PathBuf] {
        &self.label_files
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// 已经由 [`get`](Self::get) 分配出去的访问序号数
    pub fn access_count(&self) -> u64 {
        self.accesses.load(Ordering::Relaxed)
    }

    /// 访问计数归零，之后的 `get` 序列从头复现
    pub fn reset_accesses(&self) {
        self.accesses.store(0, Ordering::Relaxed);
    }

    pub fn is_preloaded(&self) -> bool {
        matches!(self.storage, Storage::Preloaded { .. })
    }

    pub fn seed(&self) -> SeedPolicy {
        self.seed
    }

    fn check_index(&self, index: usize) -> Result<(), DataError> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Lits3dDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lits3dDataset")
            .field("root", &self.root)
            .field("split", &self.split)
            .field("len", &self.len())
            .field("storage", &self.storage)
            .field("has_transform", &self.transform.is_some())
            .field("seed", &self.seed)
            .field("accesses", &self.access_count())
            .finish()
    }
}

/// 列出目录下被 `filter` 接受的文件，转为绝对路径并按字典序排序
pub fn list_volume_files(dir: &Path, filter: FileFilter) -> Result<Vec<PathBuf>, DataError> {
    if !dir.is_dir() {
        return Err(DataError::FileNotFound(dir.to_path_buf()));
    }
    let dir = std::path::absolute(dir)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.is_file() && filter(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    Ok(files)
}
