use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::error::Error as StdError;
use std::fmt;

mod component;
mod control;
mod dom;
mod harness;
mod registry;

pub use component::QuantityChange;
pub use control::{ButtonStates, CurrentValues, QuantityPolicy};
pub use harness::Harness;
pub use registry::{CART_QUANTITY_SELECTOR_TAG, ComponentRegistry, QUANTITY_SELECTOR_TAG};

pub(crate) use component::{ControlBinding, StepEvent};
pub(crate) use dom::{Dom, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    MalformedNumber {
        field: String,
        raw: String,
    },
    InvalidArgument(String),
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::MalformedNumber { field, raw } => {
                write!(f, "malformed number in {field}: {raw:?}")
            }
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}"
            ),
        }
    }
}

impl StdError for Error {}
