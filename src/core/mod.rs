mod clock;
mod debounce;

pub use clock::{Clock, FrameTick};
pub use debounce::Debounce;
