use super::*;

use std::str;

use crate::{tests::some, unescape::unescape_trusted, Options};

use serde_json::json;

fn root(input: &[u8]) -> crate::Node {
    crate::from_bytes(input, Options::default())
}

#[test]
fn read_generated() {
    // debug builds are slow, so just run a handful of cases
    let iterations = {
        #[cfg(debug)]
        {
            100
        }

        #[cfg(not(debug))]
        {
            2000
        }
    };

    for _ in 0..iterations {
        // Check the lazy navigation against some randomly generated JSON data.
        // Fuzzing is good at finding bizarre and invalid almost-JSON but doesn't
        // discover valid JSON very often. This stampedes with a bunch of valid
        // combinations of JSON objects to make sure every corner of the grammar
        // is covered, not just the shapes a human would hand-write as a test case.
        let input = some::json_object();

        let expected: serde_json::Value = match serde_json::from_str(&input) {
            Ok(v) => v,
            Err(e) => {
                panic!("parsing `{}`: {}", input, e);
            }
        };

        let node = root(input.as_bytes());
        assert!(node.exists());
        assert_eq!(expected, node_to_json(&node));
    }
}

#[test]
fn read_empty_map() {
    let node = root(b"{}");
    assert_eq!(json!({}), node_to_json(&node));
}

#[test]
fn read_map_with_trailing_num() {
    let expected = json!({ "a": 123 });
    let node = root(b"{\"a\":123}");
    assert_eq!(expected, node_to_json(&node));
}

#[test]
fn read_arr_of_empty_maps() {
    let expected = json!({ "a": [{},{},{}] });
    let node = root(b"{\"a\":[{},{},{}]}");
    assert_eq!(expected, node_to_json(&node));
}

#[test]
fn read_arr_of_numbers() {
    let expected = json!({
        "a": [
            34785u64,
            78234.2f64,
        ]
    });
    let node = root(b"{\"a\":[34785,78234.2]}");
    assert_eq!(expected, node_to_json(&node));
}

#[test]
fn read_internal_whitespace_is_tolerated() {
    // unlike the scanner this was grounded on, internal whitespace around
    // structural characters is a valid part of the grammar, not a rejection case.
    let expected = json!({ "a": 42 });
    let node = root(b"{\"a\": 42}");
    assert_eq!(expected, node_to_json(&node));
}

#[test]
fn unescape_empty() {
    let input = "";

    let unescaped = unsafe { unescape_trusted(input) };

    assert_eq!(input, unescaped);
}

#[test]
fn unescape_no_escapes() {
    let input = "This string has no escapes";

    let unescaped = unsafe { unescape_trusted(input) };

    assert_eq!(input, unescaped);
}

#[test]
fn unescape_multibyte_content() {
    let input = "This string has a lot of content \u{1F604}\\nYou can think of it \\u58c1 like a really big stacktrace.\\nThere are so \\\"many\\\" errors \\ud83d\\ude04 and escaped \\\\ chars in it.\\n";
    let expected = "This string has a lot of content 😄\nYou can think of it 壁 like a really big stacktrace.\nThere are so \"many\" errors 😄 and escaped \\ chars in it.\n";

    let unescaped = unsafe { unescape_trusted(input) };

    assert_eq!(expected, unescaped);
}

#[test]
fn unescape_tiny() {
    let input = "\\\\";

    let unescaped = unsafe { unescape_trusted(input) };

    assert_eq!("\\", unescaped);
}

#[test]
fn unescape_simple() {
    let input = "this string is escaped\\nit has a newline in it";

    let unescaped = unsafe { unescape_trusted(input) };

    assert_eq!("this string is escaped\nit has a newline in it", unescaped);
}

#[test]
fn unescape_utf8() {
    let input = "\\u58c1";

    let unescaped = unsafe { unescape_trusted(input) };

    assert_eq!("壁", unescaped);
}

#[test]
fn unescape_surrogate_pair() {
    let input = "\\ud83d\\ude04";

    let unescaped = unsafe { unescape_trusted(input) };

    assert_eq!("😄", unescaped);
}
