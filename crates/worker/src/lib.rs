//! Worker primitives shared by the spellmark engine.
//!
//! Every task the engine starts goes through [`spawn`] so it carries a
//! [`TaskClass`] in its trace output, and every scan session draws its
//! identity from a [`GenerationClock`].

mod class;
mod clock;
mod spawn;

pub use class::TaskClass;
pub use clock::GenerationClock;
pub use spawn::spawn;
