// Sender mailbox listing, proxied to EmailBison.

pub mod handlers;
