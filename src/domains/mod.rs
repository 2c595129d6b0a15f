//! Domains module containing business logic organized by bounded contexts.
//!
//! The toolkit has a single domain, `tools`, covering everything from
//! validator descriptions to dispatch.

pub mod tools;
