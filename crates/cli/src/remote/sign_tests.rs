// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::sign::{concatenate, Digester, Md5Digester, Params, Signer};
use yare::parameterized;

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[parameterized(
    empty = { "", "d41d8cd98f00b204e9800998ecf8427e" },
    abc = { "abc", "900150983cd24fb0d6963f7d28e17f72" },
    fox = { "The quick brown fox jumps over the lazy dog", "9e107d9d372bb6826bd81d3542a419d6" },
)]
fn md5_known_vectors(input: &str, expected: &str) {
    assert_eq!(Md5Digester.digest_hex(input), expected);
}

#[test]
fn concatenation_sorts_names() {
    let p = params(&[("yxz", "foo"), ("feg", "bar"), ("abc", "baz")]);
    assert_eq!(concatenate(&p), "abcbazfegbaryxzfoo");
}

#[test]
fn signature_is_digest_of_secret_and_pairs() {
    let p = params(&[("yxz", "foo"), ("feg", "bar"), ("abc", "baz")]);
    let signer = Signer::new("BANANAS");
    assert_eq!(signer.sign(&p), Md5Digester.digest_hex("BANANASabcbazfegbaryxzfoo"));
}

#[test]
fn signature_ignores_insertion_order() {
    let forward = params(&[("a", "1"), ("b", "2"), ("c", "3")]);
    let backward = params(&[("c", "3"), ("b", "2"), ("a", "1")]);
    let signer = Signer::new("secret");
    assert_eq!(signer.sign(&forward), signer.sign(&backward));
}

#[parameterized(
    value = { "a", "9" },
    new_name = { "z", "1" },
)]
fn signature_changes_with_any_parameter(name: &str, value: &str) {
    let base = params(&[("a", "1"), ("b", "2")]);
    let mut changed = base.clone();
    changed.insert(name.to_string(), value.to_string());

    let signer = Signer::new("secret");
    assert_ne!(signer.sign(&base), signer.sign(&changed));
}

#[test]
fn signature_depends_on_secret() {
    let p = params(&[("a", "1")]);
    assert_ne!(Signer::new("one").sign(&p), Signer::new("two").sign(&p));
}

#[test]
fn debug_redacts_secret() {
    let debug = format!("{:?}", Signer::new("hunter2"));
    assert!(!debug.contains("hunter2"));
}
