use regex::Regex;
use symveil_core::hasher::{HashConfig, Hasher};
use symveil_core::mangle::{self, MangleCodec};
use symveil_core::salt::Salt;

fn hasher() -> Hasher {
    Hasher::new(HashConfig {
        salt: Salt::new("k"),
        ..HashConfig::default()
    })
    .expect("hasher")
}

/// Reads one length-prefixed token, returning `(token, bytes_consumed)`.
fn token(input: &str) -> Option<(&str, usize)> {
    let digits = input.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let length: usize = input[..digits].parse().ok()?;
    let end = digits + length;
    (end <= input.len()).then(|| (&input[digits..end], end))
}

#[test]
fn method_symbols_keep_the_nested_abi_shape() {
    let h = hasher();
    let mut codec = MangleCodec::new();

    let out = codec.obfuscate(&h, "_ZN6MyClass6methodEv");
    let shape = Regex::new(r"^_ZN[0-9]+C[0-9a-f]{10}[0-9]+M[0-9a-f]{10}Ev$").unwrap();
    assert!(shape.is_match(&out), "unexpected shape: {out}");
}

#[test]
fn sibling_methods_share_the_class_token() {
    let h = hasher();
    let mut codec = MangleCodec::new();

    let first = codec.obfuscate(&h, "_ZN6MyClass6methodEv");
    let second = codec.obfuscate(&h, "_ZN6MyClass7method2Ev");

    let class_token = |symbol: &str| token(&symbol[3..]).map(|(t, _)| t.to_string());
    assert_eq!(class_token(&first), class_token(&second));
}

#[test]
fn vtables_agree_with_method_symbols_on_the_class() {
    let h = hasher();
    let mut codec = MangleCodec::new();

    let method = codec.obfuscate(&h, "_ZN6MyClass6methodEv");
    let vtable = codec.obfuscate(&h, "_ZTV6MyClass");

    let shape = Regex::new(r"^_ZTV[0-9]+C[0-9a-f]{10}$").unwrap();
    assert!(shape.is_match(&vtable), "unexpected shape: {vtable}");
    assert_eq!(
        token(&method[3..]).map(|(t, _)| t.to_string()),
        token(&vtable[4..]).map(|(t, _)| t.to_string()),
    );
}

#[test]
fn special_prefixes_survive_obfuscation() {
    let h = hasher();
    let mut codec = MangleCodec::new();

    for (symbol, prefix) in [
        ("_ZTV6MyClass", "_ZTV"),
        ("_ZTI6MyClass", "_ZTI"),
        ("_ZTS6MyClass", "_ZTS"),
    ] {
        let out = codec.obfuscate(&h, symbol);
        assert!(out.starts_with(prefix), "{symbol} lost its prefix: {out}");
    }
}

#[test]
fn parameter_encodings_are_preserved_byte_for_byte() {
    let h = hasher();
    let mut codec = MangleCodec::new();

    let out = codec.obfuscate(&h, "_ZN3net6Socket4sendEPKcmi");
    assert!(out.ends_with("EPKcmi"), "parameters changed: {out}");

    let void = codec.obfuscate(&h, "_Z8shutdownv");
    assert!(void.ends_with('v'));
}

#[test]
fn deep_nesting_keeps_every_scope() {
    let h = hasher();
    let mut codec = MangleCodec::new();

    let out = codec.obfuscate(&h, "_ZN4core6detail5Inner5Klass5applyEi");
    let mut rest = &out[3..out.rfind('E').expect("nest terminator")];
    let mut count = 0;
    while !rest.is_empty() {
        let (_, consumed) = token(rest).expect("exact length prefixes");
        rest = &rest[consumed..];
        count += 1;
    }
    assert_eq!(count, 5, "a scope was collapsed: {out}");
}
