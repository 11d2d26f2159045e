pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod local;
pub(crate) mod questions;
pub(crate) mod results;
pub(crate) mod router;
pub(crate) mod sessions;
pub(crate) mod settings;
