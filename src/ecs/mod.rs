pub mod world;

pub use world::{Death, KindRegistry, TickReport, World};
