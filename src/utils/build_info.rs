/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub commit: &'static str,
    pub built_at: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("BORDERO_BUILD_COMMIT").unwrap_or("unknown"),
        built_at: option_env!("BORDERO_BUILD_DATE").unwrap_or("unknown"),
        profile: option_env!("BORDERO_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("BORDERO_BUILD_RUSTC").unwrap_or("unknown"),
    }
}
