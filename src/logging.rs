//! Tracing subscriber setup. Native hosts log to stderr and honour `RUST_LOG`;
//! in the browser the same formatter writes to the developer console.

use crate::errors::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Maps a numeric verbosity (0 = errors only) to a tracing level.
pub fn level_from_verbosity(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`Error::Config`] if a global subscriber is already installed.
pub fn init(level: tracing::Level) -> Result<(), Error> {
    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = fmt().with_env_filter(env_filter).with_target(false);

    #[cfg(target_arch = "wasm32")]
    let builder = builder
        .without_time()
        .with_writer(console::ConsoleWriter::default);

    builder
        .try_init()
        .map_err(|err| Error::Config(format!("failed to install logger: {err}")))
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    /// Buffers one formatted event and hands it to `console.log` on drop.
    #[derive(Default)]
    pub(super) struct ConsoleWriter {
        buffer: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.buffer);
            let line = line.trim_end();
            if !line.is_empty() {
                web_sys::console::log_1(&line.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::level_from_verbosity;
    use tracing::Level;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_from_verbosity(0), Level::ERROR);
        assert_eq!(level_from_verbosity(1), Level::WARN);
        assert_eq!(level_from_verbosity(2), Level::INFO);
        assert_eq!(level_from_verbosity(3), Level::DEBUG);
        assert_eq!(level_from_verbosity(4), Level::TRACE);
        assert_eq!(level_from_verbosity(200), Level::TRACE);
    }

    #[test]
    fn second_init_is_reported() {
        let _ = super::init(Level::WARN);

        assert!(super::init(Level::WARN).is_err());
    }
}
