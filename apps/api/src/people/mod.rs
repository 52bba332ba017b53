// People search and lookup, proxied to HQ (read-only).

pub mod handlers;
