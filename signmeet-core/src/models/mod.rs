pub mod caption;
pub mod id;
pub mod participant;
pub mod room;

pub use caption::Caption;
pub use id::{generate_id, CaptionId, ConnectionId, ParticipantId, RoomId};
pub use participant::Participant;
pub use room::{Room, DEFAULT_MAX_PARTICIPANTS};
