// Workspace-scoped lead lists, the one feature that owns its state locally.
// Membership is unique per (list, person); bulk adds report how many of the
// requested ids were new versus already present.

pub mod handlers;
pub mod push;
pub mod store;
