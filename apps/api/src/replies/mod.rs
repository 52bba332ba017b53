// Reply inbox and response dispatch, proxied to EmailBison.

pub mod handlers;
