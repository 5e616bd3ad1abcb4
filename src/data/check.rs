//! 图像/标签对的合法性检查
//!
//! 检查逻辑以 [`PairCheck`] 的形式注入数据集，默认使用 [`SanityCheck`]。

use ndarray::ArrayD;

use super::error::DataError;

/// 对一对（图像, 标签）做结构检查，不通过则返回错误
pub trait PairCheck: Send + Sync {
    fn check(&self, image: &ArrayD<i16>, label: &ArrayD<u8>) -> Result<(), DataError>;
}

impl<F> PairCheck for F
where
    F: Fn(&ArrayD<i16>, &ArrayD<u8>) -> Result<(), DataError> + Send + Sync,
{
    fn check(&self, image: &ArrayD<i16>, label: &ArrayD<u8>) -> Result<(), DataError> {
        self(image, label)
    }
}

/// 默认检查：
/// 1. 图像与标签的形状必须一致；
/// 2. 图像不能是空白的（最大值须大于 0）。
#[derive(Debug, Clone, Copy, Default)]
pub struct SanityCheck;

impl PairCheck for SanityCheck {
    fn check(&self, image: &ArrayD<i16>, label: &ArrayD<u8>) -> Result<(), DataError> {
        if image.shape() != label.shape() {
            return Err(DataError::ShapeMismatch {
                image: image.shape().to_vec(),
                label: label.shape().to_vec(),
            });
        }

        let max = image.iter().copied().max();
        match max {
            Some(m) if m > 0 => Ok(()),
            _ => Err(DataError::BlankImage { max }),
        }
    }
}

/// 不做任何检查
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheck;

impl PairCheck for NoCheck {
    fn check(&self, _image: &ArrayD<i16>, _label: &ArrayD<u8>) -> Result<(), DataError> {
        Ok(())
    }
}
