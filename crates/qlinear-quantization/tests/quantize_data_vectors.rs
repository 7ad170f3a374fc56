//! Known input/output vectors for `quantize_data` and the transform.

use std::sync::Arc;

use qlinear_common::{QuantizationError, TensorDataType};
use qlinear_quantization::{
    Float8Distributions, LookupKernel, QuantParams, QuantizedData, Quantizer, decode_e4m3fn,
    dequantize_array, quantize_array, quantize_data,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
}

// ---------------------------------------------------------------------------
// Integer targets
// ---------------------------------------------------------------------------

#[test]
fn uint8_full_range_is_identity() -> anyhow::Result<()> {
    let data: Vec<f32> = vec![0.0, 255.0];
    let r = quantize_data(&data, TensorDataType::Uint8, false, false)?;
    assert_eq!((r.rmin, r.rmax), (0.0, 255.0));
    assert_eq!(r.zero_point, 0);
    assert!((r.scale - 1.0).abs() < 1e-6);
    assert_eq!(r.quantized, QuantizedData::U8(vec![0, 255]));
    Ok(())
}

#[test]
fn int8_symmetric_positive_data() -> anyhow::Result<()> {
    // The solver widens [1, 3] to [0, 3] and then to [-3, 3]; the reported
    // range stays the observed one.
    let r = quantize_data(&[1.0, 2.0, 3.0], TensorDataType::Int8, true, false)?;
    assert_eq!((r.rmin, r.rmax), (1.0, 3.0));
    assert_eq!(r.zero_point, 0);
    assert!((r.scale - 3.0 / 127.0).abs() < 1e-7);
    assert_eq!(r.quantized, QuantizedData::I8(vec![42, 85, 127]));
    Ok(())
}

#[test]
fn int8_asymmetric_never_emits_minus_128() {
    // Parameters come from [-128, 127] but the transform clips to [-127, 127].
    let r = quantize_data(&[-1.0, 0.0, 1.0], TensorDataType::Int8, false, false).unwrap();
    let values = r.quantized.to_i32_vec();
    assert!(values.iter().all(|&q| (-127..=127).contains(&q)), "{values:?}");
}

#[test]
fn reduced_range_uint8_tops_out_at_127() {
    let r = quantize_data(&[0.0, 10.0], TensorDataType::Uint8, false, true).unwrap();
    assert_eq!(r.zero_point, 0);
    assert!((r.scale - 10.0 / 127.0).abs() < 1e-6);
    assert_eq!(r.quantized, QuantizedData::U8(vec![0, 127]));
}

#[test]
fn int16_symmetric_range() {
    let r = quantize_data(&[-2.0, 1.0], TensorDataType::Int16, true, false).unwrap();
    assert_eq!(r.zero_point, 0);
    // 1.0 / scale is exactly 16383.5
    assert_eq!(r.quantized, QuantizedData::I16(vec![-32767, 16384]));
}

#[test]
fn int16_symmetric_range_is_balanced() {
    let r = quantize_data(&[-2.0, 2.0], TensorDataType::Int16, true, false).unwrap();
    assert_eq!(r.quantized, QuantizedData::I16(vec![-32767, 32767]));
}

#[test]
fn constant_zero_data_uses_identity() {
    init_tracing();
    let r = quantize_data(&[0.0; 4], TensorDataType::Uint16, false, false).unwrap();
    assert_eq!(r.params(), QuantParams::IDENTITY);
    assert_eq!(r.quantized, QuantizedData::U16(vec![0; 4]));
}

#[test]
fn requantizing_dequantized_values_is_stable() {
    let data = [-3.7f32, -0.2, 0.0, 0.9, 2.5, 11.0];
    for kind in [
        TensorDataType::Uint8,
        TensorDataType::Int8,
        TensorDataType::Uint16,
        TensorDataType::Int16,
    ] {
        for symmetric in [false, true] {
            let r = quantize_data(&data, kind, symmetric, false).unwrap();
            let real = dequantize_array(&r.quantized, r.params());
            let again = quantize_array(kind, &real, r.scale, r.zero_point, None, None).unwrap();
            assert_eq!(again, r.quantized, "{kind} symmetric={symmetric}");
        }
    }
}

// ---------------------------------------------------------------------------
// Float8 target
// ---------------------------------------------------------------------------

#[test]
fn float8_values_of_the_format_map_to_themselves() {
    let codes: Vec<u8> = (0..=u8::MAX).filter(|b| b & 0x7F != 0x7F).collect();
    let data: Vec<f32> = codes.iter().map(|&b| decode_e4m3fn(b)).collect();

    let r = quantize_data(&data, TensorDataType::Float8E4M3FN, true, false).unwrap();
    assert_eq!(r.zero_point, 0);
    assert!((r.scale - 1.0).abs() < 1e-6, "scale {}", r.scale);
    assert_eq!((r.rmin, r.rmax), (-448.0, 448.0));
    assert_eq!(r.quantized, QuantizedData::Float8E4M3FN(codes));
}

#[test]
fn float8_scale_tracks_data_spread() {
    let codes: Vec<u8> = (0..=u8::MAX).filter(|b| b & 0x7F != 0x7F).collect();
    let data: Vec<f32> = codes.iter().map(|&b| decode_e4m3fn(b) * 4.0).collect();

    let r = quantize_data(&data, TensorDataType::Float8E4M3FN, false, false).unwrap();
    assert!((r.scale - 4.0).abs() < 1e-5, "scale {}", r.scale);
    assert_eq!(r.quantized, QuantizedData::Float8E4M3FN(codes));
}

#[test]
fn float8_nan_input_is_reported() {
    init_tracing();
    let err = quantize_data(&[1.0, f32::NAN, -2.0], TensorDataType::Float8E4M3FN, true, false)
        .unwrap_err();
    match err.as_quantization() {
        Some(QuantizationError::QuantizationProducedNaN { data_min, data_max, .. }) => {
            assert_eq!((*data_min, *data_max), (-2.0, 1.0));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("one of the quantized values is NaN"));
}

#[test]
fn float8_nan_report_uses_decoded_values() {
    // 1.0 lands near 480 after scaling, past what the non-saturating kernel keeps.
    let quantizer = Quantizer::new(
        Arc::new(LookupKernel::non_saturating()),
        Arc::new(Float8Distributions::new()),
    );
    let mut data = vec![-0.01];
    data.extend([0.0; 20]);
    data.push(1.0);
    let err = quantizer
        .quantize_data(&data, TensorDataType::Float8E4M3FN, true, false)
        .unwrap_err();
    match err.as_quantization() {
        Some(QuantizationError::QuantizationProducedNaN { quant_min, quant_max, .. }) => {
            assert_eq!((*quant_min, *quant_max), (-4.75, 0.0));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn float8_with_explicit_dependencies() {
    let quantizer = Quantizer::new(
        Arc::new(LookupKernel::non_saturating()),
        Arc::new(Float8Distributions::new()),
    );
    let r = quantizer
        .quantize_data(&[-1.0, 0.0, 1.0], TensorDataType::Float8E4M3FN, true, false)
        .unwrap();
    let bits = r.quantized.as_float8_bits().unwrap();
    assert_eq!(bits[1], 0x00);
    assert_eq!(bits[0], bits[2] | 0x80);
    assert!(quantizer.distributions().std_of_format(TensorDataType::Float8E4M3FN).is_ok());
}

#[test]
fn float8_dequantize_recovers_representable_values() {
    let r = quantize_data(&[0.5, -0.25, 2.0, 0.0], TensorDataType::Float8E4M3FN, true, false)
        .unwrap();
    let back = dequantize_array(&r.quantized, r.params());
    for (orig, got) in [0.5f32, -0.25, 2.0, 0.0].iter().zip(&back) {
        let rel = (orig - got).abs() / orig.abs().max(1e-3);
        assert!(rel < 0.07, "{orig} -> {got}");
    }
}
