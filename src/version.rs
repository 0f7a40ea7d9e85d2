// Crate identity baked in at build time; reported on /version and sent as User-Agent

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `nexus-dashboard/<version>`.
pub fn user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}
