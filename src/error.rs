//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    Image(image::ImageError),
    InvalidColor(String),
    InvalidConfigurationValue(String),
    InvalidCoordinate(String),
    InvalidGeoUri(String),
    Io(std::io::Error),
    MessageTooLong(usize),
    NoLocationProvider,
    Other(String),
    UnknownServiceHandler(String),
    Yaml(serde_yaml::Error),
}

impl convert::From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Error {
        Error::Image(err)
    }
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Image(e) => write!(f, "{}", e),
            Error::InvalidColor(value) => write!(
                f,
                "Invalid color '{}', expected a hex RGB value such as #00a000",
                value
            ),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::InvalidCoordinate(msg) => write!(f, "Invalid coordinate: {}", msg),
            Error::InvalidGeoUri(uri) => write!(f, "Could not decode geo URI: '{}'", uri),
            Error::Io(e) => write!(f, "{}", e),
            Error::MessageTooLong(length) => write!(
                f,
                "Message is {} characters long. Please reduce it to {} characters or less.",
                length,
                crate::message::MAX_MESSAGE_LENGTH
            ),
            Error::NoLocationProvider => {
                write!(f, "Neither the GPS nor the network location provider is enabled")
            }
            Error::Other(msg) => write!(f, "{}", msg),
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
            Error::Yaml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}
