//! Multipost channel: owns the push channel and turns its byte stream into
//! typed job events.
mod channel;
mod decode;
mod sse;
mod transport;

pub use channel::UploadChannel;
pub use decode::decode_frame;
pub use sse::{SseFrame, SseParser};
pub use transport::{
    endpoint_url, ByteStream, ChannelError, ChannelSettings, ReqwestTransport, StreamTransport,
};
