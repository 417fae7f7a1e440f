// handlers/mod.rs - HTTP handlers grouped by security level
//
// public/    - no token required (register, login, chatbot)
// protected/ - bearer token required; `require_user` injects `CurrentUser`
// root       - frontend entry point and health probe

pub mod protected;
pub mod public;
pub mod root;
