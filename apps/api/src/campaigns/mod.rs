// Campaign CRUD, proxied to EmailBison under the workspace resolved from the
// path slug.

pub mod handlers;
