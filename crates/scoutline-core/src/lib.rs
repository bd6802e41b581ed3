//! Core types and configuration for the Scoutline talent marketplace

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod types;

/// Message-carrying error for the binaries' `main`
pub mod context_error {
    use std::{error::Error as StdError, fmt};

    /// Startup or shutdown failure with an optional underlying cause
    #[derive(Debug)]
    pub struct ContextError {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    }

    impl ContextError {
        /// Error with only a message
        pub fn new(message: impl Into<String>) -> Self {
            Self {
                message: message.into(),
                source: None,
            }
        }

        /// Error describing `cause`
        pub fn wrap<E>(cause: E, message: impl Into<String>) -> Self
        where
            E: StdError + Send + Sync + 'static,
        {
            Self {
                message: message.into(),
                source: Some(Box::new(cause)),
            }
        }
    }

    impl fmt::Display for ContextError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match &self.source {
                Some(cause) => write!(f, "{}: {cause}", self.message),
                None => f.write_str(&self.message),
            }
        }
    }

    impl StdError for ContextError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source
                .as_deref()
                .map(|cause| cause as &(dyn StdError + 'static))
        }
    }

    /// `Result` for binaries
    pub type Result<T> = std::result::Result<T, ContextError>;

    /// Build a [`ContextError`] from a literal or a format string
    #[macro_export]
    macro_rules! context_error {
        ($msg:literal) => {
            $crate::context_error::ContextError::new($msg)
        };
        ($fmt:expr, $($arg:tt)*) => {
            $crate::context_error::ContextError::new(format!($fmt, $($arg)*))
        };
    }

    /// Attach a message to any error result
    pub trait ResultExt<T> {
        /// Wrap the error with the message produced by `message`
        fn context<F, S>(self, message: F) -> Result<T>
        where
            F: FnOnce() -> S,
            S: Into<String>;
    }

    impl<T, E> ResultExt<T> for std::result::Result<T, E>
    where
        E: StdError + Send + Sync + 'static,
    {
        fn context<F, S>(self, message: F) -> Result<T>
        where
            F: FnOnce() -> S,
            S: Into<String>,
        {
            self.map_err(|e| ContextError::wrap(e, message()))
        }
    }

    impl From<std::io::Error> for ContextError {
        fn from(err: std::io::Error) -> Self {
            Self::wrap(err, "I/O error")
        }
    }

    impl From<crate::Error> for ContextError {
        fn from(err: crate::Error) -> Self {
            Self::new(err.to_string())
        }
    }
}

pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    MediaAttachment, NewOrder, NewProfile, Order, OrderStatus, PaymentMetrics, Plan, Profile,
    ProfileKind, ProfileStatus, ProfileUpdate, SeoSettings, Settings, validate_birth_date,
    validate_country_code, validate_first_name, validate_key_segment, validate_last_name,
};

/// Initialize the logging system from the logging configuration
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(logging: &config::LoggingConfig) -> context_error::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    context_error::ResultExt::context(result, || "Failed to initialize logging")
}
