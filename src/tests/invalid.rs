/*
The behavior of malformed inputs isn't fully guaranteed outside of `strict_mode`, but we want to
make sure we avoid:

- attempting to index out-of-bounds
- infinite loops when iterating or walking
- returning invalid UTF8 strings

everything else is fair game.

There are two kinds of tests here:

- `err_*` tests that are inputs `strict_mode` should reject outright.
- `invalid_*` tests that are malformed but accepted in the default (non-strict) mode, where
  we only care that navigating the resulting node doesn't panic or hang.

Many of these cases come from thinking through what a scanner that tolerates whitespace and
trusts its input does when that input lies about its own structure.
*/

use crate::{unescape::unescape_trusted, Options};

fn strict(input: &[u8]) -> crate::Node {
    crate::from_bytes(input, Options::default().with_strict_mode(true))
}

fn lenient(input: &[u8]) -> crate::Node {
    crate::from_bytes(input, Options::default())
}

fn walk_without_hanging(node: &crate::Node) {
    let mut visits = 0usize;
    node.walk(|_, _| {
        visits += 1;
        assert!(visits < 1_000_000, "walk looped past a sane bound");
        true
    });
}

#[test]
fn err_unterminated_string() {
    // a string that never closes eats the rest of the document, including the brace
    // that would have closed the containing object. strict_mode notices the imbalance.
    let input = b"{\"a\":\"this string is not finished}";
    assert!(!strict(input).exists());
}

#[test]
fn err_unterminated_object() {
    let input = b"{\"a\":1";
    assert!(!strict(input).exists());
}

#[test]
fn err_trailing_garbage() {
    let input = b"{\"a\":1} garbage";
    assert!(!strict(input).exists());
}

#[test]
fn invalid_unterminated_string_is_accepted_lenient() {
    let input = b"{\"a\":\"this string is not finished}";
    let node = lenient(input);
    // whatever this resolves to, navigating it must not panic.
    walk_without_hanging(&node);
    let _ = node.get("a").as_str();
}

#[test]
fn invalid_root_level_arr_terminate() {
    // an attempt to terminate an object early with `]` instead of `}`
    let node = lenient(b"{\"a\"],42}");
    walk_without_hanging(&node);
}

#[test]
fn invalid_map_terminated_as_arr() {
    // objects terminated with `]` instead of `}` aren't detected in lenient mode
    let node = lenient(b"{\"a\":{\"b\":123]}");
    walk_without_hanging(&node);
}

#[test]
fn invalid_arr_terminated_as_map() {
    let node = lenient(b"{\"a\":[\"b\",\"c\",\"d\"}}");
    walk_without_hanging(&node);
}

#[test]
fn invalid_arr_terminated_as_map_non_string() {
    let node = lenient(b"{\"a\":[{},{}}}");
    walk_without_hanging(&node);
}

#[test]
fn invalid_map_with_missing_key() {
    // a value where a key was expected
    let node = lenient(b"{:42e10}");
    walk_without_hanging(&node);
}

#[test]
fn invalid_deeply_nested_still_terminates() {
    let deep = "[".repeat(10_000) + &"]".repeat(10_000);
    let node = lenient(deep.as_bytes());
    walk_without_hanging(&node);
}

#[test]
fn invalid_unescape_unknown() {
    drop(unsafe { unescape_trusted("\\j") });
}

#[test]
fn invalid_unescape_unknown_multibyte() {
    drop(unsafe { unescape_trusted("\\😄 and some more") });
}

#[test]
fn invalid_unescape_utf8_truncated() {
    drop(unsafe { unescape_trusted("\\u58") });
}

#[test]
fn invalid_unescape_utf8_no_escape() {
    drop(unsafe { unescape_trusted("\\u") });
}

#[test]
fn invalid_unescape_utf8_non_digit() {
    drop(unsafe { unescape_trusted("\\u58\\r") });
}

#[test]
fn invalid_unescape_non_digit_multibyte() {
    drop(unsafe { unescape_trusted("\\u壁") });
}

#[test]
fn invalid_unescape_multibyte_non_digit_all_slash() {
    drop(unsafe { unescape_trusted("\\\\\\u\\\\") });
}

#[test]
fn invalid_unescape_surrogate_pair_truncated() {
    drop(unsafe { unescape_trusted("\\ud83d\\ude") });
}

#[test]
fn invalid_unescape_surrogate_pair_non_digit() {
    drop(unsafe { unescape_trusted("\\ud83d\\ude\\r") });
}

#[test]
fn invalid_unescape_surrogate_pair_split() {
    drop(unsafe { unescape_trusted("\\ud83dsome bytes \\ude04") });
}

#[test]
fn invalid_unescape_surrogate_pair() {
    drop(unsafe { unescape_trusted("\\uffff\\uffff") });
}
