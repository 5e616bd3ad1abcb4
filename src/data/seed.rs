/*
 * @Description  : 每次取样的随机种子
 *
 * 数据增强需要随机数，而多个 worker 并行取样时各自的随机流必须互不相关。
 * 这里不依赖时间，而是由 (基础种子, worker 编号, 访问序号) 确定性地派生出种子：
 * - 同一组参数总是得到同一随机流，训练可复现；
 * - 任一参数不同，得到的随机流即不同。
 */

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// 一次取样的身份：由哪个 worker 发起，是第几次访问
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AccessKey {
    pub worker: usize,
    pub access: u64,
}

impl AccessKey {
    pub fn new(worker: usize, access: u64) -> Self {
        Self { worker, access }
    }
}

/// 种子派生策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedPolicy {
    base: u64,
}

impl SeedPolicy {
    pub fn new(base: u64) -> Self {
        Self { base }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// 派生某次访问的种子
    pub fn seed_for(&self, key: AccessKey) -> u64 {
        let h = splitmix64(self.base);
        let h = splitmix64(h ^ key.worker as u64);
        splitmix64(h ^ key.access)
    }

    /// 派生某次访问的随机数生成器
    pub fn rng(&self, key: AccessKey) -> StdRng {
        StdRng::seed_from_u64(self.seed_for(key))
    }
}

/// SplitMix64 混合函数
pub(crate) fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
