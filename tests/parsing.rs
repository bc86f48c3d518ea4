use std::fs;
use std::io::BufReader;
use std::time::Instant;

use bytesize::ByteSize;
use chisel_jsonstream::errors::{Details, NumberFault, Stage};
use chisel_jsonstream::{Encoding, JsonValue, Parser, ParserOptions};
use rstest::rstest;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A document made up of `count` records, each a small object with a nested array
fn generated_document(count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id":{},"name":"record \"{}\"","ratio":{}.25,"flags":[true,false,null],"tags":{{"k":"v\/{}"}}}}"#,
                i, i, i, i
            )
        })
        .collect();
    format!("[{}]", records.join(",\n  "))
}

#[test]
fn should_parse_end_to_end_scenario() {
    init_logging();
    let parsed = Parser::new()
        .parse_str(r#"{"name":"Java","tags":["a","b"],"n":null,"ok":true,"score":1.8}"#)
        .unwrap();
    let object = parsed.as_object().unwrap();
    assert_eq!(object.len(), 5);
    assert_eq!(object["name"].as_str(), Some("Java"));
    assert_eq!(
        object["tags"],
        JsonValue::Array(vec!["a".into(), "b".into()])
    );
    assert!(object["n"].is_null());
    assert_eq!(object["ok"].as_bool(), Some(true));
    assert_eq!(object["score"], JsonValue::Float(1.8));
}

#[rstest]
#[case("9007199254740991", JsonValue::Integer(9_007_199_254_740_991))]
#[case("-9007199254740991", JsonValue::Integer(-9_007_199_254_740_991))]
#[case("9007199254740992.0", JsonValue::Float(9_007_199_254_740_992.0))]
fn should_accept_numbers_at_the_safe_bound(#[case] source: &str, #[case] expected: JsonValue) {
    assert_eq!(Parser::new().parse_str(source).unwrap(), expected);
}

#[test]
fn should_reject_integers_beyond_the_safe_bound() {
    let err = Parser::new().parse_str("[9007199254740992]").unwrap_err();
    assert_eq!(err.stage, Stage::Lexer);
    assert_eq!(
        err.details,
        Details::NumberFormat(NumberFault::IntegerTooLarge)
    );
}

#[test]
fn should_translate_escapes() {
    let parsed = Parser::new()
        .parse_str(r#"["\"\\\/\b\f\n\r\t", "Aé中", "𝄞"]"#)
        .unwrap();
    let values = parsed.as_array().unwrap();
    assert_eq!(values[0].as_str(), Some("\"\\/\u{8}\u{c}\n\r\t"));
    assert_eq!(values[1].as_str(), Some("Aé中"));
    assert_eq!(values[2].as_str(), Some("𝄞"));
}

#[rstest]
#[case(r#""\ud83d\n""#, "\u{fffd}\n")]
#[case(r#""\ud83d\u0041\ud83d\ude00""#, "\u{fffd}A😀")]
fn should_replace_unpaired_surrogates(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(Parser::new().parse_str(source).unwrap().as_str(), Some(expected));
}

#[rstest]
#[case(b"[1,2]\xff\xfegarbage")]
#[case(b"[\"a\xc3\"]")]
fn should_reject_invalid_utf8_bytes(#[case] bytes: &[u8]) {
    let err = Parser::new().parse_bytes(bytes).unwrap_err();
    assert_eq!(err.stage, Stage::Reader);
    assert!(matches!(err.details, Details::StreamFailure(_)));
}

#[test]
fn should_ignore_insignificant_whitespace() {
    let compact = Parser::new()
        .parse_str(r#"{"a":[1,2,{"b":false}],"c":"d"}"#)
        .unwrap();
    let spaced = Parser::new()
        .parse_str(" \r\n{ \"a\" :\t[ 1 ,\n2, { \"b\" : false } ] ,\r\n \"c\" : \"d\" }\n\n")
        .unwrap();
    assert_eq!(compact, spaced);
}

#[rstest]
#[case(r#"{"a":1 "b":2}"#)]
#[case("[1,2,]")]
#[case(r#"{"a":1,,"b":2}"#)]
#[case(r#"{"a"}"#)]
#[case("[]]")]
fn should_reject_malformed_structure(#[case] source: &str) {
    let err = Parser::new().parse_str(source).unwrap_err();
    assert_eq!(err.stage, Stage::Parser);
    assert!(matches!(err.details, Details::GrammarViolation(_)));
}

#[rstest]
#[case("{}", JsonValue::Object(Default::default()))]
#[case("[]", JsonValue::Array(vec![]))]
#[case("[{}, []]", JsonValue::Array(vec![JsonValue::Object(Default::default()), JsonValue::Array(vec![])]))]
fn should_parse_empty_containers(#[case] source: &str, #[case] expected: JsonValue) {
    assert_eq!(Parser::new().parse_str(source).unwrap(), expected);
}

#[test]
fn should_bound_nesting_depth() {
    let at_bound = format!("{}{}", "[".repeat(100), "]".repeat(100));
    let beyond_bound = format!("{}{}", "[".repeat(101), "]".repeat(101));
    assert!(Parser::new().parse_str(&at_bound).is_ok());
    let err = Parser::new().parse_str(&beyond_bound).unwrap_err();
    assert_eq!(err.details, Details::DepthExceeded(100));
    assert_eq!(err.coords.absolute, 101);
}

#[test]
fn should_parse_deep_documents_with_raised_bounds() {
    let depth = 2_000;
    let doc = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let parser = Parser::with_options(ParserOptions {
        max_depth: depth,
        ..Default::default()
    });
    assert!(parser.parse_str(&doc).is_ok());
}

#[test]
fn should_parse_generated_documents() {
    init_logging();
    let doc = generated_document(5_000);
    let start = Instant::now();
    let parsed = Parser::new().parse_bytes(doc.as_bytes()).unwrap();
    println!(
        "Parsed {} in {:?}",
        ByteSize(doc.len() as u64),
        start.elapsed()
    );
    let records = parsed.as_array().unwrap();
    assert_eq!(records.len(), 5_000);
    assert_eq!(records[4_999].get("id").unwrap().as_i64(), Some(4_999));
    assert_eq!(
        records[10].get("name").unwrap().as_str(),
        Some("record \"10\"")
    );
    assert_eq!(
        records[7].get("tags").unwrap().get("k").unwrap().as_str(),
        Some("v/7")
    );
}

#[test]
fn should_parse_files() {
    let path = std::env::temp_dir().join(format!("chisel-jsonstream-{}.json", std::process::id()));
    fs::write(&path, generated_document(10)).unwrap();
    let parsed = Parser::new().parse_file(&path);
    fs::remove_file(&path).unwrap();
    assert_eq!(parsed.unwrap().as_array().unwrap().len(), 10);
}

#[test]
fn should_parse_ascii_input() {
    let reader = BufReader::new(r#"{"plain":"ascii"}"#.as_bytes());
    let parsed = Parser::with_encoding(Encoding::Ascii)
        .parse_reader(reader)
        .unwrap();
    assert_eq!(parsed.get("plain").unwrap().as_str(), Some("ascii"));
}

#[test]
fn should_report_positions_across_lines() {
    let err = Parser::new()
        .parse_str("{\n  \"a\": trux}")
        .unwrap_err();
    assert_eq!(err.stage, Stage::Lexer);
    assert_eq!(err.coords.line, 2);
    assert!(err.to_string().starts_with("lexer error"));
}
