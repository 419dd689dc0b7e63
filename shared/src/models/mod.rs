//! Domain models and computation engines

pub mod debt;
pub mod medicine;
pub mod payment;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod stock_log;

pub use debt::*;
pub use medicine::*;
pub use payment::*;
pub use purchase::*;
pub use report::*;
pub use sale::*;
pub use stock_log::*;
