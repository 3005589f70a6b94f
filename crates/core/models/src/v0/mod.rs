mod example;

pub use example::*;
