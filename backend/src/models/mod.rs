pub mod horizon;
pub mod macros;
pub mod target;
pub mod telescope;
pub mod time;

pub use horizon::*;
pub use target::*;
pub use telescope::*;
pub use time::*;
