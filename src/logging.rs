//! Logger setup.
//!
//! The terminal belongs to the glyph presenter while running, so logs can
//! be redirected to a file instead of stderr.

use env_logger::{Builder, Env, Target};
use std::fs::File;
use std::io;
use std::path::Path;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "glyphwave=info";

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder.format_timestamp_millis();
    builder
}

/// Initialise the global logger, writing to `log_file` when given
///
/// A second call is a no-op.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = builder();
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    // already initialised (tests, embedding) is not an error
    let _ = builder.try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphwave.log");
        init(Some(&path)).unwrap();
        assert!(path.exists());
        // second init does not fail
        init(None).unwrap();
    }

    #[test]
    fn test_unwritable_log_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("glyphwave.log");
        assert!(init(Some(&path)).is_err());
    }
}
