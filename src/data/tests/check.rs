//! check 模块单元测试

use ndarray::{ArrayD, IxDyn};

use super::{image_volume, label_volume};
use crate::data::check::{NoCheck, PairCheck, SanityCheck};
use crate::data::error::DataError;

#[test]
fn test_sanity_check_passes() {
    let image = image_volume(0).into_dyn();
    let label = label_volume(0).into_dyn();
    assert!(SanityCheck.check(&image, &label).is_ok());
}

#[test]
fn test_sanity_check_shape_mismatch() {
    let image = image_volume(0).into_dyn();
    let label = ArrayD::<u8>::zeros(IxDyn(&[4, 3, 3]));

    match SanityCheck.check(&image, &label) {
        Err(DataError::ShapeMismatch { image, label }) => {
            assert_eq!(image, vec![4, 3, 2]);
            assert_eq!(label, vec![4, 3, 3]);
        }
        other => panic!("期望 ShapeMismatch，实际 {other:?}"),
    }
}

#[test]
fn test_sanity_check_blank_image() {
    let label = label_volume(0).into_dyn();

    let zeros = ArrayD::<i16>::zeros(IxDyn(&[4, 3, 2]));
    assert!(matches!(
        SanityCheck.check(&zeros, &label),
        Err(DataError::BlankImage { max: Some(0) })
    ));

    // 全为负值同样视为空白
    let negative = ArrayD::<i16>::from_elem(IxDyn(&[4, 3, 2]), -1000);
    assert!(matches!(
        SanityCheck.check(&negative, &label),
        Err(DataError::BlankImage { max: Some(-1000) })
    ));
}

#[test]
fn test_sanity_check_empty_volume() {
    let image = ArrayD::<i16>::zeros(IxDyn(&[0, 3]));
    let label = ArrayD::<u8>::zeros(IxDyn(&[0, 3]));
    assert!(matches!(
        SanityCheck.check(&image, &label),
        Err(DataError::BlankImage { max: None })
    ));
}

#[test]
fn test_no_check() {
    let image = ArrayD::<i16>::zeros(IxDyn(&[2, 2]));
    let label = ArrayD::<u8>::zeros(IxDyn(&[5]));
    assert!(NoCheck.check(&image, &label).is_ok());
}

#[test]
fn test_closure_check() {
    let max_label = |_: &ArrayD<i16>, label: &ArrayD<u8>| -> Result<(), DataError> {
        if label.iter().any(|&v| v > 1) {
            return Err(DataError::CheckError("标签超出范围".to_string()));
        }
        Ok(())
    };

    let image = image_volume(0).into_dyn();
    let binary = label_volume(0).mapv(|v| v.min(1)).into_dyn();
    assert!(max_label.check(&image, &binary).is_ok());
    assert!(matches!(
        max_label.check(&image, &label_volume(0).into_dyn()),
        Err(DataError::CheckError(_))
    ));
}
