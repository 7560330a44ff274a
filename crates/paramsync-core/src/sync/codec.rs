//! Value <-> wire payload conversion.
//!
//! Payloads are the tagged JSON form of [`ParamValue`]. Struct members are
//! emitted in sorted order, so equal values always produce identical
//! payloads and the seen-set can compare encodings byte for byte.

use paramsync_types::{DecodeError, EncodeError, EncodedRecord, ParamValue};

pub fn encode(value: &ParamValue) -> Result<String, EncodeError> {
    serde_json::to_string(value).map_err(|e| EncodeError::from_json_error(&e))
}

pub fn decode(payload: &str) -> Result<ParamValue, DecodeError> {
    serde_json::from_str(payload).map_err(|e| DecodeError::from_json_error(&e))
}

pub fn encode_record(key: &str, value: &ParamValue) -> Result<EncodedRecord, EncodeError> {
    encode(value).map(|payload| EncodedRecord::new(key, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn sample_tree() -> ParamValue {
        let mut limits = BTreeMap::new();
        limits.insert("min".to_string(), ParamValue::Double(-1.5));
        limits.insert("max".to_string(), ParamValue::Double(1e300));

        let mut root = BTreeMap::new();
        root.insert("enabled".to_string(), ParamValue::Bool(true));
        root.insert("count".to_string(), ParamValue::Int(i32::MIN));
        root.insert("name".to_string(), ParamValue::from("arm \"left\" \u{2603}"));
        root.insert(
            "stamp".to_string(),
            ParamValue::DateTime(Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap()),
        );
        root.insert("blob".to_string(), ParamValue::Binary(vec![0, 159, 146, 150, 255]));
        root.insert("limits".to_string(), ParamValue::Struct(limits));
        root.insert(
            "joints".to_string(),
            ParamValue::Array(vec![
                ParamValue::Int(3),
                ParamValue::Double(0.1 + 0.2),
                ParamValue::Array(vec![]),
                ParamValue::from("last"),
            ]),
        );
        ParamValue::Struct(root)
    }

    #[test]
    fn test_round_trip_nested_tree() {
        let value = sample_tree();

        let decoded = decode(&encode(&value).unwrap()).unwrap();

        assert_eq!(decoded, value);
    }

    #[test]
    fn test_round_trip_scalars() {
        let values = [
            ParamValue::Bool(false),
            ParamValue::Int(0),
            ParamValue::Int(i32::MAX),
            ParamValue::Double(-0.0),
            ParamValue::Double(f64::MIN_POSITIVE),
            ParamValue::Double(f64::INFINITY),
            ParamValue::String(String::new()),
            ParamValue::Binary(Vec::new()),
            ParamValue::Struct(BTreeMap::new()),
        ];

        for value in values {
            assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
        }
    }

    #[test]
    fn test_double_bits_survive_round_trip() {
        for v in [-0.0, 0.0, f64::MIN_POSITIVE, -f64::MAX, 0.1 + 0.2, f64::NEG_INFINITY] {
            match decode(&encode(&ParamValue::Double(v)).unwrap()).unwrap() {
                ParamValue::Double(back) => assert_eq!(back.to_bits(), v.to_bits(), "{:?}", v),
                other => panic!("expected a double for {:?}, got {:?}", v, other),
            }
        }
    }

    #[test]
    fn test_int_and_double_stay_distinct() {
        let int = encode(&ParamValue::Int(1)).unwrap();
        let double = encode(&ParamValue::Double(1.0)).unwrap();

        assert_ne!(int, double);
        assert_eq!(decode(&int).unwrap(), ParamValue::Int(1));
        assert_eq!(decode(&double).unwrap(), ParamValue::Double(1.0));
    }

    #[test]
    fn test_array_order_preserved() {
        let value = ParamValue::Array((0..20).rev().map(ParamValue::Int).collect());

        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_equal_structs_encode_identically() {
        let mut a = BTreeMap::new();
        a.insert("x".to_string(), ParamValue::Int(1));
        a.insert("y".to_string(), ParamValue::Int(2));
        let mut b = BTreeMap::new();
        b.insert("y".to_string(), ParamValue::Int(2));
        b.insert("x".to_string(), ParamValue::Int(1));

        assert_eq!(encode(&ParamValue::Struct(a)).unwrap(), encode(&ParamValue::Struct(b)).unwrap());
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        for payload in ["", "not json", "{\"int\":", "{\"float\":1.0}", "{\"int\":\"3\"}", "[1,2]"] {
            assert!(
                matches!(decode(payload), Err(DecodeError::Malformed { .. })),
                "payload {:?} should not decode",
                payload
            );
        }
    }

    #[test]
    fn test_encode_record_carries_key() {
        let record = encode_record("/robot/gain", &ParamValue::Int(7)).unwrap();

        assert_eq!(record.key, "/robot/gain");
        assert_eq!(decode(&record.payload).unwrap(), ParamValue::Int(7));
    }
}
