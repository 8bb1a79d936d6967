pub mod requests;
pub mod responses;

pub use requests::VoompWebhookPayload;
pub use responses::{VoompWebhookOutcome, VoompWebhookResponse};
