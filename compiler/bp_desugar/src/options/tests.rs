use super::*;

// The only test touching `BACKPORT_VAR_PREFIX`, so it cannot race.
#[test]
fn prefix_from_environment() {
    std::env::set_var(VAR_PREFIX_ENV, "_bp_");
    assert_eq!(DesugarOptions::from_env().var_prefix, "_bp_");

    // Empty falls back to the default.
    std::env::set_var(VAR_PREFIX_ENV, "");
    assert_eq!(DesugarOptions::from_env().var_prefix, "__");

    std::env::remove_var(VAR_PREFIX_ENV);
    assert_eq!(DesugarOptions::from_env(), DesugarOptions::default());
}

#[test]
fn builders_override_defaults() {
    let options = DesugarOptions::default()
        .with_var_prefix("x_")
        .with_validation(true);
    assert_eq!(options.var_prefix, "x_");
    assert!(options.validate);
}
