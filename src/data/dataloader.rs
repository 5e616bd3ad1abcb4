/*
 * @Description  : DataLoader - PyTorch 风格的体数据批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle)
 * - 丢弃不完整批次 (drop_last)
 * - 多 worker 并行取样 (num_workers)
 *
 * 每个样本的增强种子只由 (种子, 逻辑 worker, 访问序号) 决定，
 * 因此串行与并行取样得到的结果完全一致。
 * 体数据形状各异，批次以 Vec<Pair> 的形式交给训练代码自行拼接。
 */

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use crate::data::config::LoaderConfig;
use crate::data::datasets::Lits3dDataset;
use crate::data::error::DataError;
use crate::data::seed::{AccessKey, splitmix64};
use crate::data::transforms::Pair;

/// DataLoader - 按批次遍历 [`Lits3dDataset`]
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(&dataset, 2)
///     .shuffle(true)
///     .seed(42)
///     .num_workers(4);
///
/// for batch in loader.iter() {
///     let batch = batch?;
///     // batch: Vec<(image, label)>
/// }
/// ```
pub struct DataLoader<'a> {
    dataset: &'a Lits3dDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
    num_workers: usize,
    epoch: u64,
}

impl<'a> DataLoader<'a> {
    /// 创建新的 DataLoader
    ///
    /// # 参数
    /// - `dataset`: 数据集
    /// - `batch_size`: 批大小
    pub fn new(dataset: &'a Lits3dDataset, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size 必须大于 0");
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
            num_workers: 0,
            epoch: 0,
        }
    }

    /// 按配置创建 DataLoader（配置须已通过校验）
    pub fn from_config(dataset: &'a Lits3dDataset, config: &LoaderConfig) -> Self {
        let loader = Self::new(dataset, config.batch_size)
            .shuffle(config.shuffle)
            .drop_last(config.drop_last)
            .num_workers(config.num_workers);
        match config.seed {
            Some(seed) => loader.seed(seed),
            None => loader,
        }
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 设置逻辑 worker 数量，大于 1 时批次内并行取样
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// 设置当前轮次（每轮开始前调用，决定打乱顺序与增强种子）
    pub fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 本轮的样本顺序
    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            match self.seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(splitmix64(seed ^ splitmix64(self.epoch)));
                    indices.shuffle(&mut rng);
                }
                None => {
                    let mut rng = rand::thread_rng();
                    indices.shuffle(&mut rng);
                }
            }
        }
        indices
    }

    /// 创建迭代器
    pub fn iter(&self) -> DataLoaderIterator<'_, 'a> {
        DataLoaderIterator {
            loader: self,
            indices: self.indices(),
            current_batch: 0,
        }
    }

    /// 第 position 个（本轮顺序中的位置）样本的访问身份
    fn access_key(&self, batch: usize, position: usize) -> AccessKey {
        let worker = batch % self.num_workers.max(1);
        let access = self
            .epoch
            .wrapping_mul(self.dataset.len() as u64)
            .wrapping_add(position as u64);
        AccessKey::new(worker, access)
    }
}

/// DataLoader 迭代器
pub struct DataLoaderIterator<'l, 'a> {
    loader: &'l DataLoader<'a>,
    indices: Vec<usize>,
    current_batch: usize,
}

impl Iterator for DataLoaderIterator<'_, '_> {
    type Item = Result<Vec<Pair>, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.indices.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        // 检查是否还有数据
        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);

        // 如果 drop_last 且批次不完整，则跳过
        if self.loader.drop_last && end - start < batch_size {
            return None;
        }

        let batch = self.current_batch;
        self.current_batch += 1;

        let fetch = |position: usize| {
            let key = self.loader.access_key(batch, position);
            self.loader.dataset.get_seeded(self.indices[position], key)
        };

        let samples: Result<Vec<Pair>, DataError> = if self.loader.num_workers > 1 && end - start > 1 {
            (start..end).into_par_iter().map(fetch).collect()
        } else {
            (start..end).map(fetch).collect()
        };

        Some(samples)
    }
}
