use regex::Regex;
use symveil_core::hasher::HashConfig;
use symveil_core::ir::IrModule;
use symveil_core::preserve::PreservePolicy;
use symveil_core::salt::Salt;
use symveil_core::symbol::Linkage;
use symveil_rename::pass::{lookup_pass, PIPELINE_NAME};
use symveil_rename::{RenameConfig, RenameDriver};

fn cpp_module() -> IrModule {
    let mut module = IrModule::new("widget.cpp", "widget.cpp");
    module.declare_function("printf");
    module.declare_function("__cxa_atexit");
    module.define_function("_ZN6Widget4showEv", Linkage::External, &["printf", "_ZTV6Widget"]);
    module.define_function("_ZN6Widget4hideEv", Linkage::External, &[]);
    module.define_function("_ZN6WidgetC1Ev", Linkage::External, &["_ZTV6Widget"]);
    module.define_function("helper_toggle", Linkage::Internal, &["_ZN6Widget4showEv"]);
    module.define_function("main", Linkage::External, &["_ZN6WidgetC1Ev", "helper_toggle"]);
    module.define_global("_ZTV6Widget", Linkage::External, 40);
    module.define_global("_ZTI6Widget", Linkage::External, 16);
    module.define_global("widget_count", Linkage::External, 4);
    module.define_alias("show_widget", "_ZN6Widget4showEv");
    module
}

fn config(salt: &str) -> RenameConfig {
    RenameConfig {
        hash: HashConfig {
            salt: Salt::new(salt),
            ..HashConfig::default()
        },
        policy: PreservePolicy::default(),
        ..RenameConfig::default()
    }
}

#[test]
fn no_reference_dangles_after_renaming() {
    let mut module = cpp_module();
    let mut driver = RenameDriver::new(config("k")).expect("driver");
    let summary = driver.run_on_module(&mut module).expect("run");

    assert!(summary.renamed >= 7);
    for reference in module.referenced_names() {
        assert!(
            module.resolves(reference),
            "dangling reference: {reference}"
        );
    }
}

#[test]
fn mangled_definitions_keep_their_abi_shape() {
    let mut module = cpp_module();
    let mut driver = RenameDriver::new(config("k")).expect("driver");
    driver.run_on_module(&mut module).expect("run");
    let map = driver.mapping();

    let method = map.lookup("_ZN6Widget4showEv").expect("renamed");
    let nested = Regex::new(r"^_ZN[0-9]+C[0-9a-f]{10}[0-9]+M[0-9a-f]{10}Ev$").unwrap();
    assert!(nested.is_match(&method.obfuscated), "{}", method.obfuscated);

    let ctor = map.lookup("_ZN6WidgetC1Ev").expect("renamed");
    assert!(ctor.obfuscated.contains("C1Ev"), "{}", ctor.obfuscated);

    let vtable = map.lookup("_ZTV6Widget").expect("renamed");
    assert!(vtable.obfuscated.starts_with("_ZTV"));
    let typeinfo = map.lookup("_ZTI6Widget").expect("renamed");
    assert!(typeinfo.obfuscated.starts_with("_ZTI"));

    // The vtable and the methods agree on the renamed class token.
    let class_token = |mangled: &str, skip: usize| {
        let rest = &mangled[skip..];
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let length: usize = rest[..digits].parse().unwrap();
        rest[digits..digits + length].to_string()
    };
    assert_eq!(
        class_token(&method.obfuscated, 3),
        class_token(&vtable.obfuscated, 4),
    );
}

#[test]
fn declarations_and_preserved_names_are_untouched() {
    let mut module = cpp_module();
    let mut driver = RenameDriver::new(config("k")).expect("driver");
    driver.run_on_module(&mut module).expect("run");

    assert!(module.resolves("printf"), "declaration must not rename");
    assert!(module.resolves("__cxa_atexit"), "ABI symbol must not rename");
    assert!(module.resolves("main"), "entry point must not rename");
    assert!(!module.resolves("widget_count"));
    assert!(!module.resolves("show_widget"));
}

#[test]
fn flat_names_and_aliases_get_typed_prefixes() {
    let mut module = cpp_module();
    let mut driver = RenameDriver::new(config("k")).expect("driver");
    driver.run_on_module(&mut module).expect("run");
    let map = driver.mapping();

    assert!(map.lookup("helper_toggle").unwrap().obfuscated.starts_with("f_"));
    assert!(map.lookup("widget_count").unwrap().obfuscated.starts_with("v_"));
    assert!(map.lookup("show_widget").unwrap().obfuscated.starts_with("a_"));
}

#[test]
fn preserving_every_symbol_leaves_names_identical() {
    let mut module = cpp_module();
    let before: Vec<String> = module.symbols().iter().map(|s| s.name.clone()).collect();

    let mut cfg = config("k");
    cfg.policy.add_pattern(".*").expect("pattern");
    let mut driver = RenameDriver::new(cfg).expect("driver");
    let summary = driver.run_on_module(&mut module).expect("run");

    assert_eq!(summary.renamed, 0);
    let after: Vec<String> = module.symbols().iter().map(|s| s.name.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn the_pass_registers_under_its_pipeline_name() {
    let pass = lookup_pass(PIPELINE_NAME).expect("pass is registered");
    let mut module = cpp_module();
    let changed = pass.run(&mut module).expect("pass runs");
    assert!(changed, "renaming must report that nothing is preserved");
}
