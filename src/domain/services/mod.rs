mod controller;
mod identity;
mod normalizer;
mod pdf;
mod plan_render;
mod transcript;

pub use controller::*;
pub use identity::*;
pub use normalizer::*;
pub use pdf::*;
pub use plan_render::*;
pub use transcript::*;
