//! triton-web — contact form and chat assistant backend.

pub mod chat;
pub mod config;
pub mod contact;
pub mod error;
pub mod server;
