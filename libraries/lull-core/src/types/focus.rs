//! Audio focus negotiation types

use serde::{Deserialize, Serialize};

/// Immediate answer to a focus request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusRequestResult {
    /// Output may start now
    Granted,

    /// Output must not start
    Denied,

    /// The platform will resolve the request later
    Delayed,
}

/// Focus change reported after a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusChange {
    /// Focus (re)gained
    Gain,

    /// Another app holds output temporarily
    TransientLoss,

    /// Another app took output for good
    PermanentLoss,
}
