//! Configuration resolver trait for layered overrides.
//!
//! ```text
//! ConfigLoader.load()  →  PermwardConfig (base)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()
//!                              │
//!                              ▼
//!                     PermwardConfig (final)
//! ```

use super::PermwardConfig;

/// Trait for applying configuration overrides.
///
/// Separates config loading (files, env) from runtime overrides such as
/// CLI flags.
pub trait ConfigResolver {
    /// Applies overrides to the given configuration.
    ///
    /// Only values that were actually specified should be applied.
    fn apply(&self, config: &mut PermwardConfig);
}

/// No-op resolver that makes no changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut PermwardConfig) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn noop_resolver_does_nothing() {
        let mut config = PermwardConfig::default();
        let original = config.clone();

        NoOpResolver.apply(&mut config);

        assert_eq!(config, original);
    }

    #[test]
    fn custom_resolver() {
        struct TestResolver {
            work_dir: Option<PathBuf>,
        }

        impl ConfigResolver for TestResolver {
            fn apply(&self, config: &mut PermwardConfig) {
                if let Some(ref dir) = self.work_dir {
                    config.paths.work_dir = Some(dir.clone());
                }
            }
        }

        let mut config = PermwardConfig::default();
        let resolver = TestResolver {
            work_dir: Some(PathBuf::from("/opt/app")),
        };
        resolver.apply(&mut config);

        assert_eq!(config.paths.work_dir, Some(PathBuf::from("/opt/app")));
    }
}
