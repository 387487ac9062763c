pub mod delivery;
pub mod twilio;

pub use delivery::{deliver_with_fallback, Delivery, NEWS_AUDIO_BODY};
pub use twilio::{TwilioClient, TwilioOptions};

pub mod prelude {
    pub use super::delivery::{deliver_with_fallback, Delivery};
    pub use super::twilio::{TwilioClient, TwilioOptions};
    pub use nta_core::{ChannelKind, MessageChannel, OutgoingMessage, Result, Error};
}
