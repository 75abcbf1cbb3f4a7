//! Gateway protocol definitions
//!
//! Op codes, the message envelope, close codes and the payloads of the
//! handshake messages.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{intents, HelloPayload, IdentifyPayload, IdentifyProperties, ResumePayload};
