pub(crate) mod vec2d;
pub(crate) mod viewport;
