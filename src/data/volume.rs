//! NIfTI 体数据读取
//!
//! 体数据的解码完全交给 [`nifti`] crate，这里只负责：
//! - 按目标元素类型（图像 `i16`、标签 `u8`）转换；
//! - 去掉长度为 1 的轴（例如只有一帧的时间轴）；
//! - 整理出常用的头信息 [`VolumeMeta`]。

use std::path::Path;

use ndarray::{ArrayD, Axis};
use nifti::{InMemNiftiVolume, IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use serde::{Deserialize, Serialize};

use super::error::DataError;

/// 能识别的体数据文件后缀（小写比较）
pub const IMAGE_EXTENSIONS: [&str; 2] = [".nii.gz", ".nii"];

/// 判断是否为可识别的体数据文件（仅看文件名后缀，不读取内容）
pub fn is_image_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let name = name.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        })
        .unwrap_or(false)
}

/// 体数据元素类型
///
/// 目前只有图像用的 `i16` 和标签用的 `u8`。
pub trait VolumeElement: Copy + Send + Sync + 'static {
    fn decode(volume: InMemNiftiVolume) -> nifti::Result<ArrayD<Self>>;
}

impl VolumeElement for i16 {
    fn decode(volume: InMemNiftiVolume) -> nifti::Result<ArrayD<Self>> {
        volume.into_ndarray::<i16>()
    }
}

impl VolumeElement for u8 {
    fn decode(volume: InMemNiftiVolume) -> nifti::Result<ArrayD<Self>> {
        volume.into_ndarray::<u8>()
    }
}

/// 体数据文件的头信息摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMeta {
    /// 文件名（不含目录）
    pub name: String,
    /// 头中的 `dim` 字段，`dim[0]` 为维数
    pub dim: [u16; 8],
    /// 头中的 `pixdim` 字段（体素尺寸）
    pub pixdim: [f32; 8],
    /// 由 `srow_x/y/z` 组成的 4x4 仿射矩阵
    pub affine: [[f32; 4]; 4],
}

impl VolumeMeta {
    fn from_header(path: &Path, header: &NiftiHeader) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            dim: header.dim,
            pixdim: header.pixdim,
            affine: [
                header.srow_x,
                header.srow_y,
                header.srow_z,
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// 空间维度（去掉 `dim[0]` 后的有效维度）
    pub fn shape(&self) -> Vec<usize> {
        let ndim = (self.dim[0] as usize).min(7);
        self.dim[1..=ndim].iter().map(|&d| d as usize).collect()
    }
}

/// 读取 NIfTI 文件，返回转换为 `T` 的体数据及其头信息
pub fn load_nifti_volume<T: VolumeElement>(path: &Path) -> Result<(ArrayD<T>, VolumeMeta), DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    let object = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| DataError::nifti(path, e))?;
    let meta = VolumeMeta::from_header(path, object.header());
    let volume = T::decode(object.into_volume()).map_err(|e| DataError::nifti(path, e))?;

    Ok((squeeze(volume), meta))
}

/// 只读取头信息
pub fn read_volume_meta(path: &Path) -> Result<VolumeMeta, DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    let header = NiftiHeader::from_file(path).map_err(|e| DataError::nifti(path, e))?;
    Ok(VolumeMeta::from_header(path, &header))
}

/// 去掉所有长度为 1 的轴
pub(crate) fn squeeze<T>(mut array: ArrayD<T>) -> ArrayD<T> {
    while let Some(axis) = array.shape().iter().position(|&d| d == 1) {
        array = array.index_axis_move(Axis(axis), 0);
    }
    array
}
