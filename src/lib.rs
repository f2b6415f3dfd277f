//! # Mergington (Activity Signup Service)
//!
//! `mergington` lists the extracurricular activities offered at Mergington High
//! School and lets a signed-in teacher enroll students by email.
//!
//! ## Registry
//!
//! The activity registry is held in process memory and seeded with nine fixed
//! activities at startup. Nothing is persisted; a restart resets enrollment.
//! Capacity (`max_participants`) is informational and is not enforced on signup.
//!
//! ## Teachers & Sessions
//!
//! Teacher credentials live in a JSON file of Argon2 PHC hashes that is re-read
//! on every check. A successful login sets a `session` cookie whose value is the
//! teacher's username. The cookie is not signed and does not expire, so it only
//! identifies a teacher, it does not prove one.
//!
//! Signup requires a teacher session. Unregister does not.

pub mod activities;
pub mod api;
pub mod cli;
pub mod credentials;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
