mod geometry;
pub use geometry::*;

mod selector;
pub use selector::*;

mod operator;
pub use operator::*;

mod terminal_operator;
pub use terminal_operator::*;
