// Operator authentication: credentials are provisioned through config,
// sessions live in Postgres and are presented back as opaque bearer tokens.

pub mod credentials;
pub mod handlers;
pub mod session;

pub use session::CurrentOperator;
