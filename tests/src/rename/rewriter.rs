use symveil_core::is_identifier_char;
use symveil_rename::rewriter;

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

#[test]
fn prefix_names_do_not_clip_longer_names() {
    let source = "foo(); foo_bar(); int foo_bar_result = foo_bar();";
    let out = rewriter::apply(source, &pairs(&[("foo", "f_aaaa"), ("foo_bar", "f_bbbb")]));

    assert_eq!(out, "f_aaaa(); f_bbbb(); int foo_bar_result = f_bbbb();");
    // No partially substituted residue of the shorter name inside the longer.
    assert!(!out.contains("f_aaaa_bar"));
}

#[test]
fn no_renamed_symbol_survives_as_a_whole_word() {
    let source = "int alpha; int beta; alpha = beta + alpha;";
    let mapping = pairs(&[("alpha", "v_1111"), ("beta", "v_2222")]);
    let out = rewriter::apply(source, &mapping);

    for (original, _) in &mapping {
        for (at, _) in out.match_indices(original.as_str()) {
            let bytes = out.as_bytes();
            let before_ok = at == 0 || !is_identifier_char(bytes[at - 1] as char);
            let after = at + original.len();
            let after_ok = after >= bytes.len() || !is_identifier_char(bytes[after] as char);
            assert!(
                !(before_ok && after_ok),
                "whole-word occurrence of {original} survived in: {out}"
            );
        }
    }
}

#[test]
fn substitution_respects_masked_regions() {
    let source = concat!(
        "/* alpha is the first counter */\n",
        "int alpha = 0;\n",
        "const char* label = \"alpha\";\n",
        "#define ALPHA_SEED alpha\n",
    );
    let out = rewriter::apply(source, &pairs(&[("alpha", "v_1111")]));

    assert!(out.contains("/* alpha is the first counter */"));
    assert!(out.contains("\"alpha\""));
    assert!(out.contains("#define ALPHA_SEED alpha"));
    assert!(out.contains("int v_1111 = 0;"));
}
