pub mod compose;
pub mod model;
pub mod normalize;
pub mod quote;
pub mod thread;
