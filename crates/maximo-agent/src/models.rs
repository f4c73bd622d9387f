//! The objects passed between the chat front-end, the model provider and
//! the tool bridge.
//!
//! Providers each have their own wire format (OpenAI chat completions,
//! Gemini generateContent); incoming and outgoing payloads are converted to
//! these internal structs at the provider boundary so the relay loop only
//! ever sees one shape.

pub mod message;
pub mod role;
pub mod tool;
