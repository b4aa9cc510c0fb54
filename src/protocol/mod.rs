//! Protocol Module
//!
//! The text-service catalog built on the packet engine, plus stream framing.
//!
//! ## Request Format
//! ```text
//! ┌──────────┬───────────────┬──────────────────────────────────────┐
//! │ Size (4) │ Command (16)  │  Argument packets, any order         │
//! └──────────┴───────────────┴──────────────────────────────────────┘
//! ```
//!
//! ### Commands
//! - `AddTextCmd`     - Arguments: one `TextArg`
//! - `GetAllTextsCmd` - Arguments: none
//!
//! ### Responses
//! - `AddTextRes`     - Arguments: one `ResultCodeArg`
//! - `GetAllTextsRes` - Arguments: zero or more `TextArg`, in store order
//!
//! ### Result Codes
//! - 0:          OK
//! - negative:   failure (see [`STATUS_STORE_FULL`])

mod args;
mod codec;
mod command;
mod response;

pub use args::{ResultCodeArg, TextArg, STATUS_OK, STATUS_STORE_FULL};
pub use codec::{
    read_packet, read_request, read_response, write_packet, write_request, write_response,
};
pub use command::{AddTextCmd, GetAllTextsCmd, Request};
pub use response::{AddTextRes, GetAllTextsRes, Response};
