//! Property tests for the codec and equivalence rules.

use proptest::prelude::*;
use routeros_engine::codec::{CodecError, decode_bag, decode_value, encode_record, encode_value};
use routeros_engine::diff::Equivalence;
use routeros_engine::schema::{Attribute, Schema};
use routeros_engine::{Record, Value};

/// Items that survive a comma-joined device string: interior spaces and
/// punctuation, never a comma or surrounding whitespace.
fn item() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:._/-]([a-zA-Z0-9 :._/-]{0,8}[a-zA-Z0-9:._/-])?"
}

/// Anything a caller might put in a list, including blanks and commas.
fn any_item() -> impl Strategy<Value = String> {
    prop_oneof![item(), "[ ,a-z\t]{0,5}"]
}

/// Device text for a list: items joined by commas with optional padding.
fn raw_list() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (item(), prop::sample::select(vec![",", ", ", " ,", ",,", " , "])),
        1..6,
    )
    .prop_map(|parts| {
        let mut raw = String::new();
        for (i, (item, sep)) in parts.iter().enumerate() {
            if i > 0 {
                raw.push_str(sep);
            }
            raw.push_str(item);
        }
        raw
    })
}

fn scalar_case() -> impl Strategy<Value = (Attribute, Value)> {
    prop_oneof![
        item().prop_map(|s| (Attribute::string("s"), Value::String(s))),
        any::<bool>().prop_map(|b| (Attribute::bool("b"), Value::Bool(b))),
        any::<i64>().prop_map(|i| (Attribute::int("i"), Value::Int(i))),
        prop::collection::vec(item(), 1..6).prop_map(|v| (Attribute::list("l"), Value::List(v))),
        prop::collection::btree_set(item(), 1..6).prop_map(|v| (Attribute::set("t"), Value::Set(v))),
    ]
}

fn spellings(total_secs: u64) -> Vec<String> {
    let (w, rem) = (total_secs / 604_800, total_secs % 604_800);
    let (d, rem) = (rem / 86_400, rem % 86_400);
    let (h, rem) = (rem / 3_600, rem % 3_600);
    let (m, s) = (rem / 60, rem % 60);

    let mut units = String::new();
    for (amount, unit) in [(w, "w"), (d, "d"), (h, "h"), (m, "m"), (s, "s")] {
        if amount > 0 {
            units.push_str(&format!("{amount}{unit}"));
        }
    }
    if units.is_empty() {
        units.push_str("0s");
    }

    let clock_hours = total_secs / 3_600;
    vec![
        format!("{total_secs}"),
        format!("{total_secs}s"),
        format!("{}ms", total_secs * 1_000),
        format!("{clock_hours:02}:{m:02}:{s:02}"),
        units,
    ]
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode((attr, value) in scalar_case()) {
        let raw = encode_value(&attr, &value).unwrap();
        prop_assert_eq!(decode_value(&attr, &raw).unwrap(), Some(value));
    }

    #[test]
    fn prop_list_items_encode_only_when_they_decode_back(
        items in prop::collection::vec(any_item(), 0..5),
        as_set in any::<bool>(),
    ) {
        let (attr, value) = if as_set {
            (Attribute::set("t"), Value::set(items.clone()))
        } else {
            (Attribute::list("l"), Value::list(items.clone()))
        };
        let clean = items
            .iter()
            .all(|i| !i.trim().is_empty() && !i.contains(',') && i.trim() == i);

        match encode_value(&attr, &value) {
            Ok(raw) => {
                prop_assert!(clean, "{:?} encoded as {:?}", items, raw);
                let decoded = decode_value(&attr, &raw).unwrap();
                if items.is_empty() {
                    prop_assert_eq!(decoded, None);
                } else {
                    prop_assert_eq!(decoded, Some(value));
                }
            }
            Err(CodecError::UnencodableItem { .. }) => prop_assert!(!clean),
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn prop_list_text_reencodes_to_the_same_items(raw in raw_list()) {
        for attr in [Attribute::list("l"), Attribute::set("t")] {
            let decoded = decode_value(&attr, &raw).unwrap().unwrap();
            let reencoded = encode_value(&attr, &decoded).unwrap();
            prop_assert_eq!(decode_value(&attr, &reencoded).unwrap(), Some(decoded));
        }

        // Canonical list text comes back byte for byte.
        let list = Attribute::list("l");
        let canonical = encode_value(&list, &decode_value(&list, &raw).unwrap().unwrap()).unwrap();
        let again = encode_value(&list, &decode_value(&list, &canonical).unwrap().unwrap()).unwrap();
        prop_assert_eq!(again, canonical);
    }

    #[test]
    fn prop_bool_spellings_reencode_to_the_same_value(
        raw in prop::sample::select(vec!["true", "false", "yes", "no", " yes", "no "]),
    ) {
        let attr = Attribute::bool("b");
        let decoded = decode_value(&attr, raw).unwrap();
        let reencoded = encode_value(&attr, decoded.as_ref().unwrap()).unwrap();
        prop_assert!(reencoded == "true" || reencoded == "false");
        prop_assert_eq!(decode_value(&attr, &reencoded).unwrap(), decoded);
    }

    #[test]
    fn prop_duration_text_reencodes_equivalently(total in 0u64..5_000_000) {
        let attr = Attribute::string("hold_time").equivalence(Equivalence::Duration);
        for raw in spellings(total) {
            let decoded = decode_value(&attr, &raw).unwrap().unwrap();
            let reencoded = encode_value(&attr, &decoded).unwrap();
            prop_assert!(
                attr.equivalence_rule().equivalent(&reencoded, &raw),
                "{} !~ {}", reencoded, raw
            );
        }
    }

    #[test]
    fn prop_set_encoding_ignores_insertion_order(mut items in prop::collection::vec(item(), 1..8)) {
        let attr = Attribute::set("t");
        let forward = encode_value(&attr, &Value::set(items.clone())).unwrap();
        items.reverse();
        let backward = encode_value(&attr, &Value::set(items)).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_record_round_trips_through_bag(
        name in item(),
        multihop in any::<bool>(),
        allow_as in 0i64..=10,
        filter in prop::option::of(item()),
        families in prop::collection::btree_set(prop::sample::select(vec!["ip", "ipv6", "vpnv4"]), 1..3),
    ) {
        let schema = Schema::new([
            Attribute::string("name").required(),
            Attribute::bool("multihop"),
            Attribute::set("address_families"),
            Attribute::block(
                "input",
                Schema::new([Attribute::int("allow_as"), Attribute::string("filter")]),
            ),
        ]);
        let mut input = Record::new().with("allow_as", allow_as);
        if let Some(filter) = filter {
            input.insert("filter", filter);
        }
        let record = Record::new()
            .with("name", name)
            .with("multihop", multihop)
            .with("address_families", Value::set(families))
            .with("input", input);

        let bag = encode_record(&schema, &record).unwrap();
        prop_assert_eq!(decode_bag(&schema, &bag).unwrap(), record);
    }

    #[test]
    fn prop_duration_spellings_are_equivalent(total in 0u64..5_000_000) {
        let eq = Equivalence::Duration;
        let all = spellings(total);
        for a in &all {
            prop_assert!(eq.equivalent(a, a));
            for b in &all {
                prop_assert!(eq.equivalent(a, b), "{} !~ {}", a, b);
                prop_assert_eq!(eq.equivalent(a, b), eq.equivalent(b, a));
            }
        }
    }

    #[test]
    fn prop_different_durations_are_not_equivalent(a in 0u64..1_000_000, b in 0u64..1_000_000) {
        prop_assume!(a != b);
        let (left, right) = (format!("{a}s"), format!("{b}s"));
        prop_assert!(!Equivalence::Duration.equivalent(&left, &right));
    }

    #[test]
    fn prop_equivalence_is_transitive(
        a in "[a-zA-Z0-9]{1,4}",
        b in "[a-zA-Z0-9]{1,4}",
        c in "[a-zA-Z0-9]{1,4}",
    ) {
        for eq in [Equivalence::Exact, Equivalence::Duration, Equivalence::CaseInsensitive] {
            if eq.equivalent(&a, &b) && eq.equivalent(&b, &c) {
                prop_assert!(eq.equivalent(&a, &c));
            }
            prop_assert_eq!(eq.equivalent(&a, &b), eq.equivalent(&b, &a));
        }
    }
}
