//! data 模块单元测试
//!
//! 测试数据均为临时目录中现写的小体积 NIfTI 文件。

mod check;
mod transforms;

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array3, ArrayD};
use nifti::writer::WriterOptions;
use rand::Rng;
use rand::rngs::StdRng;

use crate::data::error::DataError;
use crate::data::transforms::{Pair, PairTransform};

/// 测试体数据的形状
pub(super) const SHAPE: (usize, usize, usize) = (4, 3, 2);

/// 第 i 个样本的图像：各体素值互不相同且均为正
pub(super) fn image_volume(i: usize) -> Array3<i16> {
    Array3::from_shape_fn(SHAPE, |(x, y, z)| (i * 100 + x * 6 + y * 2 + z + 1) as i16)
}

/// 第 i 个样本的标签：取值 0..3
pub(super) fn label_volume(i: usize) -> Array3<u8> {
    Array3::from_shape_fn(SHAPE, |(x, y, z)| ((i + x + y + z) % 3) as u8)
}

pub(super) fn write_image(path: &Path, data: &Array3<i16>) {
    WriterOptions::new(path)
        .write_nifti(data)
        .expect("写入图像失败");
}

pub(super) fn write_label(path: &Path, data: &Array3<u8>) {
    WriterOptions::new(path)
        .write_nifti(data)
        .expect("写入标签失败");
}

/// 在 `<root>/<split>/` 下写入 `images` 个图像与 `labels` 个标签，
/// 文件名为 `case_XX.nii`。返回 split 目录。
pub(super) fn make_split(root: &Path, split: &str, images: usize, labels: usize) -> PathBuf {
    let split_dir = root.join(split);
    let image_dir = split_dir.join("image");
    let label_dir = split_dir.join("segmentation");
    fs::create_dir_all(&image_dir).unwrap();
    fs::create_dir_all(&label_dir).unwrap();

    for i in 0..images {
        write_image(&image_dir.join(format!("case_{i:02}.nii")), &image_volume(i));
    }
    for i in 0..labels {
        write_label(&label_dir.join(format!("case_{i:02}.nii")), &label_volume(i));
    }
    split_dir
}

/// 给图像加一个随机偏移，并把标签沿第 0 轴随机翻转
pub(super) fn jitter() -> impl PairTransform {
    |image: ArrayD<i16>, label: ArrayD<u8>, rng: &mut StdRng| -> Result<Pair, DataError> {
        let offset: i16 = rng.gen_range(0..1000);
        let mut label = label;
        if rng.gen_bool(0.5) {
            label.invert_axis(ndarray::Axis(0));
        }
        Ok((image + offset, label))
    }
}
