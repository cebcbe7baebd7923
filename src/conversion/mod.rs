mod options;
pub use options::*;

mod batch_result;
pub use batch_result::*;

mod dispatcher;
pub use dispatcher::*;

mod batch_runner;
pub use batch_runner::*;
