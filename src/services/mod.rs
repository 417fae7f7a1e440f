pub mod chat_service;
pub mod note_service;
pub mod subject_service;
pub mod user_service;

pub use chat_service::{ChatRequest, ChatResponse};
pub use note_service::NoteService;
pub use subject_service::{SubjectInput, SubjectService};
pub use user_service::{LoginRequest, ProfileUpdate, RegisterRequest, TokenResponse, UserService};
