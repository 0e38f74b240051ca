use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    /// A parameter or count is outside its admissible range.
    Configuration(String),
    /// An environment or transition model broke its contract.
    ContractViolation(String),
    Parse(String),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        Error::ContractViolation(msg.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Error::ContractViolation(msg) => write!(f, "environment contract violation: {msg}"),
            Error::Parse(msg) => write!(f, "parse error: {msg}"),
            Error::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Parse(value.to_string())
    }
}

pub(crate) fn check_discount(gamma: f64) -> Result<()> {
    if gamma > 0. && gamma <= 1. {
        Ok(())
    } else {
        Err(Error::config(format!("discount must be in (0, 1], got {gamma}")))
    }
}

pub(crate) fn check_epsilon(epsilon: f64) -> Result<()> {
    if (0. ..=1.).contains(&epsilon) {
        Ok(())
    } else {
        Err(Error::config(format!("epsilon must be in [0, 1], got {epsilon}")))
    }
}

pub(crate) fn check_learning_rate(alpha: f64) -> Result<()> {
    if alpha > 0. && alpha <= 1. {
        Ok(())
    } else {
        Err(Error::config(format!("learning rate must be in (0, 1], got {alpha}")))
    }
}

pub(crate) fn check_spaces(n_s: usize, n_a: usize) -> Result<()> {
    if n_s == 0 || n_a == 0 {
        Err(Error::config(format!(
            "state and action counts must be non-zero, got n_s = {n_s}, n_a = {n_a}"
        )))
    } else {
        Ok(())
    }
}
