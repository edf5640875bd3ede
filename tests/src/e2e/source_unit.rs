use symveil_core::hasher::HashConfig;
use symveil_core::is_identifier_char;
use symveil_core::is_valid_identifier;
use symveil_core::preserve::PreservePolicy;
use symveil_core::salt::Salt;
use symveil_rename::{RenameConfig, RenameDriver};

const AUTH_SOURCE: &str = include_str!("../../fixtures/auth.c");

fn run(salt: &str) -> (String, RenameDriver) {
    let mut driver = RenameDriver::new(RenameConfig {
        hash: HashConfig {
            salt: Salt::new(salt),
            ..HashConfig::default()
        },
        policy: PreservePolicy::for_source(),
        ..RenameConfig::default()
    })
    .expect("driver");
    let out = driver
        .run_on_source(AUTH_SOURCE, "auth.c")
        .expect("obfuscation succeeds");
    (out, driver)
}

/// Whole-word residue check: no renamed original survives in the output
/// flanked the way it was flanked in the input.
#[test]
fn no_renamed_name_survives_as_an_identifier() {
    let (out, driver) = run("k");

    for entry in &driver.mapping().symbols {
        for (at, _) in out.match_indices(entry.original.as_str()) {
            let bytes = out.as_bytes();
            let standalone = (at == 0 || !is_identifier_char(bytes[at - 1] as char))
                && (at + entry.original.len() >= bytes.len()
                    || !is_identifier_char(bytes[at + entry.original.len()] as char));
            assert!(
                !standalone,
                "{} survived obfuscation as a whole word",
                entry.original
            );
        }
    }
}

#[test]
fn every_emitted_name_is_a_valid_c_identifier() {
    let (_, driver) = run("k");
    let map = driver.mapping();
    assert!(!map.is_empty());
    for entry in &map.symbols {
        assert!(
            is_valid_identifier(&entry.obfuscated),
            "invalid identifier: {}",
            entry.obfuscated
        );
    }
}

/// The mapping is injective: distinct originals never share a pseudonym.
#[test]
fn pseudonyms_are_unique_within_the_unit() {
    let (_, driver) = run("k");
    let map = driver.mapping();

    let mut seen = std::collections::HashSet::new();
    for entry in &map.symbols {
        assert!(
            seen.insert(entry.obfuscated.clone()),
            "duplicate pseudonym {}",
            entry.obfuscated
        );
    }
}

/// String literals and comments come through byte-identical.
#[test]
fn literals_and_comments_are_untouched() {
    let (out, _) = run("k");
    assert!(out.contains("\"tr0ub4dor&3\""));
    assert!(out.contains("\"access granted\\n\""));
    assert!(out.contains("\"usage: auth <password>\\n\""));
}
