//! Error types
//!
//! Rasterization and hull construction are total and never fail. Errors only
//! come from the edges of the program: configuration files, the SDL window,
//! the control socket and the MQTT broker.

use thiserror::Error;

/// Errors surfaced by the viewer and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values that parse but make no sense
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// SDL reported an error while creating or presenting the window
    #[error("SDL error: {0}")]
    Sdl(String),

    /// The remote control socket could not be set up
    #[error("Control socket error: {0}")]
    Socket(String),

    /// MQTT subscription or connection failure
    #[error("MQTT error: {0}")]
    Mqtt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
