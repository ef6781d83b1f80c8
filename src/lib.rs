//! A streaming HTTP codec core: an RFC 7541 HPACK encoder with a bounded
//! dynamic table, and a resumable HTTP/1.x message decoder.
//!
//! The two halves are independent and can be used separately; [`error`]
//! exists only to let a caller embedding both report either kind of failure
//! through one type.

#[macro_use]
mod macros;

mod buffer;
mod error;
mod helper;
pub mod hpack;
pub mod http1;

pub use buffer::Buffer;
pub use error::{CodecError, CodecResult};
pub use helper::Helper;
