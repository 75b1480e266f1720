#[test]
fn test() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui-pass/basic.rs");
    t.pass("tests/ui-pass/options.rs");
    t.compile_fail("tests/ui-fail/wrong_name.rs");
    t.compile_fail("tests/ui-fail/with_arguments.rs");
    t.compile_fail("tests/ui-fail/async_plugin.rs");
    t.compile_fail("tests/ui-fail/unknown_knob.rs");
    t.compile_fail("tests/ui-fail/duplicate_hostname.rs");
    t.compile_fail("tests/ui-fail/empty_hostname.rs");
    t.compile_fail("tests/ui-fail/invalid_init_subscriber.rs");
}
