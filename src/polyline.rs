//! Encoded polyline codec
//!
//! Implements the standard polyline algorithm: each point is stored as the
//! delta of latitude then longitude from the previous point, scaled by
//! `10^precision`, zig-zag encoded and written as 5-bit chunks offset by 63.

use crate::WeatherRouteError;
use crate::models::{Coordinate, Path};

/// Precision used by directions providers unless stated otherwise
pub const DEFAULT_PRECISION: u32 = 5;

// 7 chunks of 5 bits cover any 32-bit signed delta.
const MAX_CHUNKS: u32 = 7;

/// Decode with the default 5-decimal precision
pub fn decode(encoded: &str) -> crate::Result<Path> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

pub fn decode_with_precision(encoded: &str, precision: u32) -> crate::Result<Path> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut path = Vec::with_capacity(bytes.len() / 4);

    while index < bytes.len() {
        let (dlat, next) = read_value(bytes, index)?;
        let (dlng, next) = read_value(bytes, next)?;
        index = next;

        lat = lat
            .checked_add(dlat)
            .ok_or_else(|| WeatherRouteError::malformed("latitude overflow"))?;
        lng = lng
            .checked_add(dlng)
            .ok_or_else(|| WeatherRouteError::malformed("longitude overflow"))?;

        let coordinate = Coordinate::new(lat as f64 / factor, lng as f64 / factor)
            .map_err(|e| WeatherRouteError::malformed(format!("point {}: {e}", path.len())))?;
        path.push(coordinate);
    }

    Ok(path)
}

fn read_value(bytes: &[u8], mut index: usize) -> crate::Result<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(index) else {
            return Err(WeatherRouteError::malformed(format!(
                "input ends in the middle of a value at byte {index}"
            )));
        };
        if !(63..=126).contains(&byte) {
            return Err(WeatherRouteError::malformed(format!(
                "invalid character {:?} at byte {index}",
                byte as char
            )));
        }
        if shift / 5 >= MAX_CHUNKS {
            return Err(WeatherRouteError::malformed(format!(
                "value overflows at byte {index}"
            )));
        }

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        index += 1;

        if chunk < 0x20 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((value, index))
}

/// Encode with the default 5-decimal precision
#[must_use]
pub fn encode(path: &[Coordinate]) -> String {
    encode_with_precision(path, DEFAULT_PRECISION)
}

#[must_use]
pub fn encode_with_precision(path: &[Coordinate], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut out = String::with_capacity(path.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for coordinate in path {
        let lat = (coordinate.latitude() * factor).round() as i64;
        let lng = (coordinate.longitude() * factor).round() as i64;
        write_value(&mut out, lat - prev_lat);
        write_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn write_value(out: &mut String, value: i64) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_path() -> Path {
        vec![
            Coordinate::new(38.5, -120.2).unwrap(),
            Coordinate::new(40.7, -120.95).unwrap(),
            Coordinate::new(43.252, -126.453).unwrap(),
        ]
    }

    #[test]
    fn test_decode_reference() {
        let path = decode(REFERENCE).unwrap();
        assert_eq!(path.len(), 3);
        for (got, want) in path.iter().zip(reference_path()) {
            assert!((got.latitude() - want.latitude()).abs() < 1e-9);
            assert!((got.longitude() - want.longitude()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_encode_reference() {
        assert_eq!(encode(&reference_path()), REFERENCE);
    }

    #[rstest]
    #[case(REFERENCE)]
    #[case("??")]
    #[case("_ibE_seK_seK_seK")]
    fn test_reencode_reproduces_input(#[case] encoded: &str) {
        let path = decode(encoded).unwrap();
        assert_eq!(encode(&path), encoded);
    }

    #[test]
    fn test_precision_six() {
        let path = vec![Coordinate::new(52.123456, 4.654321).unwrap()];
        let encoded = encode_with_precision(&path, 6);
        let decoded = decode_with_precision(&encoded, 6).unwrap();
        assert!((decoded[0].latitude() - 52.123456).abs() < 1e-9);
        assert!((decoded[0].longitude() - 4.654321).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_is_empty_path() {
        assert!(decode("").unwrap().is_empty());
    }

    #[rstest]
    #[case("_p~iF")] // latitude only
    #[case("_p~iF~ps|")] // longitude cut mid-value
    #[case("_")]
    fn test_truncated_input_is_malformed(#[case] encoded: &str) {
        let err = decode(encoded).unwrap_err();
        assert!(matches!(err, WeatherRouteError::MalformedEncoding { .. }));
    }

    #[test]
    fn test_invalid_character_is_malformed() {
        let err = decode("_p~iF ps|U").unwrap_err();
        assert!(err.to_string().contains("invalid character"));
    }

    #[test]
    fn test_overlong_value_is_malformed() {
        // eight continuation chunks never terminate within 32 bits
        let err = decode("~~~~~~~~?").unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_out_of_range_coordinate_is_malformed() {
        // 100 degrees latitude encodes fine but is not a valid position
        let encoded = {
            let mut s = String::new();
            write_value(&mut s, 10_000_000);
            write_value(&mut s, 0);
            s
        };
        let err = decode(&encoded).unwrap_err();
        assert!(matches!(err, WeatherRouteError::MalformedEncoding { .. }));
    }
}
