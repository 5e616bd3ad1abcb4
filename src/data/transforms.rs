//! 数据变换接口
//!
//! 具体的数据增强（翻转、旋转、弹性形变等）由使用方提供，这里只约定接口：
//! 变换接收一对（图像, 标签）以及本次访问专属的随机数生成器，返回变换后的一对。

use ndarray::ArrayD;
use rand::rngs::StdRng;

use super::error::DataError;

/// 一对体数据：`i16` 图像与逐体素的 `u8` 标签
pub type Pair = (ArrayD<i16>, ArrayD<u8>);

/// 成对变换
///
/// 随机性只能来自传入的 `rng`，这样同一次访问（同一种子）总能复现同样的结果。
pub trait PairTransform: Send + Sync {
    fn apply(
        &self,
        image: ArrayD<i16>,
        label: ArrayD<u8>,
        rng: &mut StdRng,
    ) -> Result<Pair, DataError>;
}

impl<F> PairTransform for F
where
    F: Fn(ArrayD<i16>, ArrayD<u8>, &mut StdRng) -> Result<Pair, DataError> + Send + Sync,
{
    fn apply(
        &self,
        image: ArrayD<i16>,
        label: ArrayD<u8>,
        rng: &mut StdRng,
    ) -> Result<Pair, DataError> {
        self(image, label, rng)
    }
}

/// 依次执行多个变换，共用同一个随机数生成器
#[derive(Default)]
pub struct Compose {
    transforms: Vec<Box<dyn PairTransform>>,
}

impl Compose {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个变换
    pub fn then<T: PairTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl PairTransform for Compose {
    fn apply(
        &self,
        image: ArrayD<i16>,
        label: ArrayD<u8>,
        rng: &mut StdRng,
    ) -> Result<Pair, DataError> {
        self.transforms
            .iter()
            .try_fold((image, label), |(image, label), t| t.apply(image, label, rng))
    }
}
