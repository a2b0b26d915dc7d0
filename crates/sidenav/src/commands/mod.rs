//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod render;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;
