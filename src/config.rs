use crate::database::Database;
use crate::statement::BindPolicy;

/// Options for a [`Database`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseOptions {
    pub bind_policy: BindPolicy,
    /// Check the 16-byte file signature before `open`.
    pub verify_header: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            bind_policy: BindPolicy::SkipUnmatched,
            verify_header: true,
        }
    }
}

/// Fluent builder for database options.
#[derive(Debug, Clone, Default)]
pub struct DatabaseOptionsBuilder {
    opts: DatabaseOptions,
}

impl DatabaseOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bind_policy(mut self, bind_policy: BindPolicy) -> Self {
        self.opts.bind_policy = bind_policy;
        self
    }

    #[must_use]
    pub fn verify_header(mut self, verify_header: bool) -> Self {
        self.opts.verify_header = verify_header;
        self
    }

    #[must_use]
    pub fn finish(self) -> DatabaseOptions {
        self.opts
    }

    /// Build a closed [`Database`] with these options.
    #[must_use]
    pub fn build(self) -> Database {
        Database::with_options(self.finish())
    }
}
