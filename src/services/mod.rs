//! Collaborators that sit outside the frame loop: door transitions, session
//! persistence and the debug console.

pub mod debug;
pub mod door_transition;
pub mod persistence;
