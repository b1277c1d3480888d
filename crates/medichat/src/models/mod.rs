mod chat;
mod hospital;

pub use chat::{
    Answer, AskQuestion, ChatMessageDto, ChatRoomSummary, CreatedChatRoom, RenameChatRoom,
};
pub use hospital::{CreateVisit, HospitalDto, SearchHospitals, VisitDto};
