use std::collections::HashSet;
use symveil_core::hasher::{HashAlgorithm, HashConfig, Hasher, PrefixStyle};
use symveil_core::is_valid_identifier;
use symveil_core::salt::Salt;
use symveil_core::Error;

fn config(algorithm: HashAlgorithm, hash_length: usize, salt: &str) -> HashConfig {
    HashConfig {
        algorithm,
        hash_length,
        salt: Salt::new(salt),
        ..HashConfig::default()
    }
}

#[test]
fn independent_runs_agree_for_every_algorithm() {
    for algorithm in [
        HashAlgorithm::Sha256,
        HashAlgorithm::Blake2b,
        HashAlgorithm::SipHash,
    ] {
        let mut first = Hasher::new(config(algorithm, 12, "k")).expect("hasher");
        let mut second = Hasher::new(config(algorithm, 12, "k")).expect("hasher");
        for name in ["validate_password", "MASTER_PASSWORD", "x"] {
            assert_eq!(
                first.hash_function(name).expect("hash"),
                second.hash_function(name).expect("hash"),
                "{algorithm} diverged on {name}"
            );
        }
    }
}

#[test]
fn ten_thousand_names_stay_injective_at_minimum_length() {
    let mut hasher = Hasher::new(config(HashAlgorithm::Sha256, 4, "k")).expect("hasher");
    let mut used = HashSet::new();

    for i in 0..10_000 {
        let name = format!("sym_{i}");
        let out = hasher
            .unique(&name, &mut used, "f_")
            .expect("the namespace is far from saturated");
        assert!(is_valid_identifier(&out), "invalid identifier {out}");
    }
    assert_eq!(used.len(), 10_000, "two emitted names collided");
}

#[test]
fn saturated_namespace_raises_collision_exhausted() {
    let mut hasher = Hasher::new(config(HashAlgorithm::Sha256, 4, "k")).expect("hasher");

    // Fill the entire 4-hex-char output space so every probe collides.
    let mut used: HashSet<String> = (0u32..0x1_0000).map(|v| format!("f_{v:04x}")).collect();
    assert_eq!(used.len(), 0x1_0000);

    let err = hasher.unique("doomed", &mut used, "f_").unwrap_err();
    assert!(matches!(err, Error::CollisionExhausted(name) if name == "doomed"));
}

#[test]
fn every_prefix_style_emits_valid_c_identifiers() {
    for style in [PrefixStyle::None, PrefixStyle::Typed, PrefixStyle::Underscore] {
        let mut hasher = Hasher::new(HashConfig {
            prefix_style: style,
            salt: Salt::new("k"),
            ..HashConfig::default()
        })
        .expect("hasher");
        for i in 0..256 {
            let out = hasher.hash_variable(&format!("name{i}")).expect("hash");
            assert!(is_valid_identifier(&out), "{style:?} produced {out}");
        }
    }
}

#[test]
fn siphash_output_is_sixteen_zero_padded_hex_chars() {
    let hasher = Hasher::new(config(HashAlgorithm::SipHash, 16, "")).expect("hasher");
    let out = hasher.hash("some_symbol", "");
    assert_eq!(out.len(), 16);
    assert!(out.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}
