//! # Attention Gated Networks — 数据加载
//!
//! 为注意力门控分割网络的训练提供数据：在硬盘上枚举成对的 3D 体数据（图像与分割标签），
//! 可选地预先读入内存，并在每次访问时做合法性检查与（可注入的）数据增强。
//!
//! 体数据文件的解码交给 [`nifti`] crate，张量拼接与训练循环由上层代码负责。
//!

pub mod data;
