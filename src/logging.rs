use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl Level {
    fn as_level_filter(&self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
            Self::Off => LevelFilter::OFF,
        }
    }
}

/// Installs the global subscriber. Events go to `file` (appended) when given,
/// otherwise to stderr.
pub fn set_up_logging(level: Level, file: Option<&Path>) -> std::io::Result<()> {
    let builder = tracing_subscriber::fmt().with_max_level(level.as_level_filter());

    let result = match file {
        Some(path) => {
            let writer = File::options().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(writer))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(std::io::Error::other)?;

    tracing::debug!("logging configured");
    Ok(())
}
