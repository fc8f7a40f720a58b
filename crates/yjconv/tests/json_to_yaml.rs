//! JSON → YAML conversion and round trips through both directions.

use pretty_assertions::assert_eq;
use rstest::rstest;
use yjconv::{DEFAULT_INDENT, ErrorKind, FormatOptions, json_to_yaml, json_to_yaml_with, yaml_to_json};

fn to_yaml(json: &str) -> String {
    String::from_utf8(json_to_yaml(json.as_bytes(), DEFAULT_INDENT).unwrap()).unwrap()
}

#[rstest]
#[case::null(r#"{"a":null}"#, "a: null\n")]
#[case::bool(r#"{"a":true,"b":false}"#, "a: true\nb: false\n")]
#[case::string(r#"{"a":"x"}"#, "a: x\n")]
#[case::int(r#"{"a":1}"#, "a: 1\n")]
#[case::float(r#"{"a":3.4028234663852886e+38}"#, "a: 3.4028234663852886e+38\n")]
#[case::timestamp(r#"{"a":"2001-12-15T02:59:43.1Z"}"#, "a: \"2001-12-15T02:59:43.1Z\"\n")]
#[case::impossible_date(r#"{"a":"2001-02-30"}"#, "a: \"2001-02-30\"\n")]
#[case::sequence(r#"{"a":["b","c"]}"#, "a:\n  - b\n  - c\n")]
#[case::map(
    r#"{"a":[{"b":"x1","c":"y1"},{"b":"x2","c":"y2"}]}"#,
    "a:\n  - b: x1\n    c: y1\n  - b: x2\n    c: y2\n"
)]
#[case::empty_collections(r#"{"a":[],"b":{}}"#, "a: []\nb: {}\n")]
#[case::nested_sequences(r#"[[1,2],[3]]"#, "- - 1\n  - 2\n- - 3\n")]
#[case::ambiguous_strings(
    r#"{"a":"1","b":"true","c":"null","d":"yes","e":""}"#,
    "a: \"1\"\nb: \"true\"\nc: \"null\"\nd: \"yes\"\ne: \"\"\n"
)]
#[case::indicators(r##"{"a":"- x","b":"k: v","#c":"d"}"##, "a: \"- x\"\nb: \"k: v\"\n\"#c\": d\n")]
#[case::multiline(r#"{"a":"y1\ny2\n","b":"y1\ny2"}"#, "a: |\n  y1\n  y2\nb: |-\n  y1\n  y2\n")]
#[case::scalar_root(r#""hello""#, "hello\n")]
#[case::empty_input("", "null\n")]
fn test_json_to_yaml(#[case] json: &str, #[case] expected: &str) {
    assert_eq!(to_yaml(json), expected);
}

#[test]
fn test_bad_format() {
    let err = json_to_yaml(b"[}", DEFAULT_INDENT).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CodecFailure);
    assert!(err.to_string().starts_with("json_to_yaml: parse YAML failed"), "{}", err);
}

#[test]
fn test_indent_width() {
    let options = FormatOptions::default().with_indent(4);
    let yaml = json_to_yaml_with(br#"{"a":{"b":["c"]}}"#, &options).unwrap();
    assert_eq!(String::from_utf8(yaml).unwrap(), "a:\n    b:\n        - c\n");
}

#[rstest]
#[case::bool(r#"{"a":true}"#)]
#[case::string(r#"{"a":"x y"}"#)]
#[case::null(r#"{"a":null}"#)]
#[case::sequence(r#"{"a":["b","c"]}"#)]
#[case::mapping(r#"{"a":{"b":"c","d":[{"e":"f"}]}}"#)]
#[case::quoted_number(r#"{"a":"1"}"#)]
#[case::multiline(r#"{"a":"line one\nline two\n","b":"x\n\n"}"#)]
#[case::escapes(r#"{"a":"tab\there","b":"quote \" and \\"}"#)]
#[case::unicode(r#"{"a":"héllo wörld"}"#)]
fn test_round_trip(#[case] json: &str) {
    let yaml = json_to_yaml(json.as_bytes(), DEFAULT_INDENT).unwrap();
    let back = yaml_to_json(&yaml).unwrap();
    assert_eq!(String::from_utf8(back).unwrap(), json);
}

#[test]
fn test_folded_block_round_trip() {
    let yaml = b"a: >\n  folded text\n  continues\n";
    let json = yaml_to_json(yaml).unwrap();
    assert_eq!(json, br#"{"a":"folded text continues\n"}"#);

    let back = json_to_yaml(&json, DEFAULT_INDENT).unwrap();
    assert_eq!(yaml_to_json(&back).unwrap(), json);
}

#[test]
fn test_long_key_round_trip() {
    let long = "k".repeat(1100);
    let json = format!(r#"{{"{long}":1,"nested":{{"{long}":[true]}}}}"#);
    let yaml = to_yaml(&json);
    assert!(yaml.starts_with(&format!("? {long}\n: 1\n")), "{}", yaml);

    let back = yaml_to_json(yaml.as_bytes()).unwrap();
    assert_eq!(String::from_utf8(back).unwrap(), json);
}

#[test]
fn test_tab_after_colon_is_rejected_by_parser() {
    let err = json_to_yaml(b"{\"a\":\t1}", DEFAULT_INDENT).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CodecFailure);
    assert!(err.to_string().starts_with("json_to_yaml: parse YAML failed"), "{}", err);
}
