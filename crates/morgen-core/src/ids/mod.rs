//! Identifier virtualization layer
//!
//! Morgen issues long composite identifiers (base64-packed JSON tuples)
//! that are expensive to echo through a model and easy to mangle in
//! transit. This module maps them to short virtual identifiers and back:
//!
//! - [`VirtualIdRegistry`] keeps the bidirectional real/virtual mapping
//!   for the lifetime of the process.
//! - [`codec`] decodes and re-encodes the composite tuple format, so the
//!   owning account and calendar of any event can be derived without a
//!   single API call.
//!
//! The registry knows nothing about identifier structure and the codec
//! knows nothing about virtual mappings.

pub mod codec;
pub mod error;
pub mod registry;

pub use codec::{
    account_from_calendar, decode_tuple, encode_tuple, ids_from_event, CalendarIdParts,
    EventIdParts,
};
pub use error::{IdError, IdResult};
pub use registry::VirtualIdRegistry;
