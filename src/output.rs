use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

fn quiet_from_env() -> bool {
    std::env::var("RESCOPE_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Fix quiet mode for the process: `--quiet` or `RESCOPE_QUIET=1`. Has no
/// effect once `is_quiet` has been read.
pub fn set_quiet(quiet: bool) {
    let _ = QUIET.set(quiet || quiet_from_env());
}

/// Quiet mode suppresses status lines; results are still printed
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(quiet_from_env)
}
