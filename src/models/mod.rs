pub mod audit_event;
pub mod client;
pub mod lead;
pub mod project;
pub mod user;

pub use audit_event::AuditEvent;
pub use client::{Client, ClientStatus, ClientWrite};
pub use lead::{Lead, LeadStatus, LeadWrite};
pub use project::{Project, ProjectStatus, ProjectWrite};
pub use user::User;
