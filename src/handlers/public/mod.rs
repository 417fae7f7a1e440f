pub mod chatbot;
pub mod users;
