use chrono::{DateTime, Utc};
use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};
use turso_http::{decode, encode};

fn cell(value: JsonValue) -> JsonValue {
    json!({ "v": value })
}

proptest! {
    #[test]
    fn bool_rejects_strings_outside_the_accepted_encodings(text in "\\PC*") {
        prop_assume!(!matches!(text.as_str(), "1" | "0" | "TRUE" | "FALSE"));
        prop_assert!(decode::bool("v").decode_json(&cell(json!(text))).is_err());
    }

    #[test]
    fn bool_rejects_integers_other_than_one_and_zero(number in any::<i64>()) {
        prop_assume!(number != 0 && number != 1);
        prop_assert!(decode::bool("v").decode_json(&cell(json!(number))).is_err());
    }

    #[test]
    fn bool_round_trips_through_its_encoder(value in any::<bool>()) {
        let param = encode::bool("v", value);
        let wire = param.wire_value().map(str::to_owned);
        prop_assert_eq!(decode::bool("v").decode_json(&cell(json!(wire))), Ok(value));
    }

    #[test]
    fn int_round_trips_as_string_and_number(value in any::<i64>()) {
        let param = encode::int("v", value);
        let as_string = json!(param.wire_value());
        prop_assert_eq!(decode::int("v").decode_json(&cell(as_string)), Ok(value));
        prop_assert_eq!(decode::int("v").decode_json(&cell(json!(value))), Ok(value));
    }

    #[test]
    fn finite_float_round_trips_as_string_and_number(
        value in any::<f64>().prop_filter("finite", |value| value.is_finite())
    ) {
        let param = encode::float("v", value);
        let as_string = json!(param.wire_value());
        prop_assert_eq!(decode::float("v").decode_json(&cell(as_string)), Ok(value));
        prop_assert_eq!(decode::float("v").decode_json(&cell(json!(value))), Ok(value));
    }

    #[test]
    fn posix_round_trips_at_millisecond_precision(
        millis in -62_135_596_800_000i64..253_402_300_799_999i64
    ) {
        let at: DateTime<Utc> = DateTime::from_timestamp_millis(millis)
            .expect("years 1 to 9999 are representable");
        let param = encode::posix("v", at);
        let as_string = json!(param.wire_value());
        prop_assert_eq!(decode::posix("v").decode_json(&cell(as_string)), Ok(at));
        prop_assert_eq!(decode::posix("v").decode_json(&cell(json!(millis))), Ok(at));
    }
}

#[test]
fn bool_accepts_exactly_the_documented_encodings() {
    let decoder = decode::bool("v");
    for (value, expected) in [
        (json!(1), true),
        (json!(0), false),
        (json!("1"), true),
        (json!("0"), false),
        (json!("TRUE"), true),
        (json!("FALSE"), false),
    ] {
        assert_eq!(decoder.decode_json(&cell(value)), Ok(expected));
    }
    for rejected in [json!("true"), json!("yes"), json!(2), json!(true), JsonValue::Null] {
        assert!(decoder.decode_json(&cell(rejected)).is_err());
    }
}
