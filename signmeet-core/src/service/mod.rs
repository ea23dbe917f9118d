pub mod captions;
pub mod chat;
pub mod connections;
pub mod hub;
pub mod presence;
pub mod registry;
pub mod signaling;

pub use captions::{CaptionPipeline, Prediction, CONFIDENCE_THRESHOLD};
pub use chat::ChatService;
pub use connections::{ConnectionSession, ConnectionSessionTable};
pub use hub::MessageHub;
pub use presence::PresenceBroadcaster;
pub use registry::RoomRegistry;
pub use signaling::SignalingRouter;
