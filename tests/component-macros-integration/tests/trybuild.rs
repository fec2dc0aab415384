//! trybuild compile-time tests for the AutoInjectable derive

#[test]
fn trybuild_auto_injectable() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/injectable_ok.rs");
    t.pass("tests/trybuild/injectable_generic_ok.rs");
}
