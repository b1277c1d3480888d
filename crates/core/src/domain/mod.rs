mod types;

pub use types::{
    ChatMessage, ChatRoom, Hospital, HospitalVisit, MessageSender, User, WeekDay,
    DEFAULT_ROOM_TITLE,
};
