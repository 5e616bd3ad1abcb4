//! transforms 模块单元测试

use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{image_volume, jitter, label_volume};
use crate::data::error::DataError;
use crate::data::transforms::{Compose, Pair, PairTransform};

fn add(value: i16) -> impl PairTransform {
    move |image: ArrayD<i16>, label: ArrayD<u8>, _: &mut StdRng| -> Result<Pair, DataError> {
        Ok((image + value, label))
    }
}

fn double() -> impl PairTransform {
    |image: ArrayD<i16>, label: ArrayD<u8>, _: &mut StdRng| -> Result<Pair, DataError> {
        Ok((image * 2i16, label))
    }
}

#[test]
fn test_closure_transform() {
    let image = image_volume(0).into_dyn();
    let label = label_volume(0).into_dyn();
    let mut rng = StdRng::seed_from_u64(0);

    let (out_image, out_label) = add(5).apply(image.clone(), label.clone(), &mut rng).unwrap();
    assert_eq!(out_image, image + 5i16);
    assert_eq!(out_label, label);
}

#[test]
fn test_compose_keeps_order() {
    let image = image_volume(1).into_dyn();
    let label = label_volume(1).into_dyn();
    let mut rng = StdRng::seed_from_u64(0);

    let add_then_double = Compose::new().then(add(1)).then(double());
    let double_then_add = Compose::new().then(double()).then(add(1));
    assert_eq!(add_then_double.len(), 2);

    let (a, _) = add_then_double
        .apply(image.clone(), label.clone(), &mut rng)
        .unwrap();
    let (b, _) = double_then_add.apply(image.clone(), label, &mut rng).unwrap();
    assert_eq!(a, (image.clone() + 1i16) * 2i16);
    assert_eq!(b, image * 2i16 + 1i16);
}

#[test]
fn test_empty_compose_is_identity() {
    let image = image_volume(2).into_dyn();
    let label = label_volume(2).into_dyn();
    let mut rng = StdRng::seed_from_u64(0);

    let compose = Compose::new();
    assert!(compose.is_empty());
    let (out_image, out_label) = compose.apply(image.clone(), label.clone(), &mut rng).unwrap();
    assert_eq!(out_image, image);
    assert_eq!(out_label, label);
}

#[test]
fn test_compose_shares_rng() {
    let image = image_volume(0).into_dyn();
    let label = label_volume(0).into_dyn();

    // 两次抖动共用一个随机数生成器，结果等于依次手动调用
    let compose = Compose::new().then(jitter()).then(jitter());
    let (composed, _) = compose
        .apply(image.clone(), label.clone(), &mut StdRng::seed_from_u64(9))
        .unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    let (step, step_label) = jitter().apply(image, label, &mut rng).unwrap();
    let (manual, _) = jitter().apply(step, step_label, &mut rng).unwrap();
    assert_eq!(composed, manual);
}

#[test]
fn test_compose_stops_on_error() {
    let fail = |_: ArrayD<i16>, _: ArrayD<u8>, rng: &mut StdRng| -> Result<Pair, DataError> {
        let roll: u8 = rng.gen_range(0..10);
        Err(DataError::TransformError(format!("第 {roll} 次失败")))
    };
    let compose = Compose::new().then(add(1)).then(fail).then(double());

    let result = compose.apply(
        image_volume(0).into_dyn(),
        label_volume(0).into_dyn(),
        &mut StdRng::seed_from_u64(0),
    );
    assert!(matches!(result, Err(DataError::TransformError(_))));
}
