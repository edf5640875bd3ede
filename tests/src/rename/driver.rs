use regex::Regex;
use symveil_core::hasher::{HashAlgorithm, HashConfig};
use symveil_core::preserve::PreservePolicy;
use symveil_core::salt::Salt;
use symveil_rename::{RenameConfig, RenameDriver};

const AUTH_SOURCE: &str = include_str!("../../fixtures/auth.c");

fn config(salt: &str) -> RenameConfig {
    RenameConfig {
        hash: HashConfig {
            algorithm: HashAlgorithm::Sha256,
            hash_length: 12,
            salt: Salt::new(salt),
            ..HashConfig::default()
        },
        policy: PreservePolicy::for_source(),
        ..RenameConfig::default()
    }
}

fn obfuscate(config: RenameConfig) -> (String, RenameDriver) {
    let mut driver = RenameDriver::new(config).expect("driver");
    let out = driver
        .run_on_source(AUTH_SOURCE, "auth.c")
        .expect("obfuscation succeeds");
    (out, driver)
}

#[test]
fn functions_and_globals_get_typed_pseudonyms() {
    let (out, driver) = obfuscate(config("k"));
    let map = driver.mapping();

    let function = map.lookup("validate_password").expect("renamed");
    let typed_function = Regex::new(r"^f_[0-9a-f]{12}$").unwrap();
    assert!(typed_function.is_match(&function.obfuscated));

    let global = map.lookup("MASTER_PASSWORD").expect("renamed");
    let typed_global = Regex::new(r"^v_[0-9a-f]{12}$").unwrap();
    assert!(typed_global.is_match(&global.obfuscated));

    assert!(!out.contains("validate_password"));
    assert!(!out.contains("MASTER_PASSWORD"));
}

#[test]
fn entry_point_and_stdlib_stay_untouched() {
    let (out, driver) = obfuscate(config("k"));

    assert!(out.contains("int main(int argc, char** argv)"));
    assert!(out.contains("printf("));
    assert!(out.contains("strcmp("));
    assert!(driver.mapping().lookup("main").is_none());
    assert!(driver.mapping().lookup("printf").is_none());
}

#[test]
fn no_preserve_main_renames_only_main() {
    let mut cfg = config("k");
    cfg.policy.set_preserve_main(false);
    let (out, driver) = obfuscate(cfg);

    let main_entry = driver.mapping().lookup("main").expect("main renamed");
    assert!(main_entry.obfuscated.starts_with("f_"));
    assert!(!out.contains("int main("));
    // Stdlib names remain preserved independently of the main toggle.
    assert!(out.contains("printf("));
}

#[test]
fn identical_configs_produce_identical_artifacts() {
    let (first_out, first_driver) = obfuscate(config("k"));
    let (second_out, second_driver) = obfuscate(config("k"));

    assert_eq!(first_out, second_out);
    assert_eq!(
        first_driver.mapping().to_json_pretty().expect("json"),
        second_driver.mapping().to_json_pretty().expect("json"),
    );
}

#[test]
fn a_new_salt_renames_every_symbol_differently() {
    let (_, keyed) = obfuscate(config("k"));
    let (_, rekeyed) = obfuscate(config("k2"));

    let keyed_map = keyed.mapping();
    let rekeyed_map = rekeyed.mapping();
    assert_eq!(keyed_map.len(), rekeyed_map.len());
    assert!(keyed_map.len() >= 4);

    for entry in &keyed_map.symbols {
        let other = rekeyed_map.lookup(&entry.original).expect("same symbol set");
        assert_ne!(entry.obfuscated, other.obfuscated, "{}", entry.original);
    }
}

#[test]
fn preserving_everything_is_the_identity() {
    let mut cfg = config("k");
    cfg.policy.add_pattern(".*").expect("pattern");
    let (out, driver) = obfuscate(cfg);

    assert_eq!(out, AUTH_SOURCE);
    assert!(driver.mapping().is_empty());
}

#[test]
fn mapping_records_locations_from_the_scanner() {
    let (_, driver) = obfuscate(config("k"));
    let entry = driver.mapping().lookup("validate_password").expect("entry");
    assert_eq!(entry.source_file.as_deref(), Some("auth.c"));
    assert_eq!(entry.line, Some(7));
}
