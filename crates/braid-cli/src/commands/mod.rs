//! CLI command implementations

pub(crate) mod abort_if_pending;
pub(crate) mod common;
pub(crate) mod dump;
pub(crate) mod forward;
pub(crate) mod load;
pub(crate) mod migrate;
pub(crate) mod redo;
pub(crate) mod rollback;
pub(crate) mod status;
pub(crate) mod up_down;
pub(crate) mod version;
