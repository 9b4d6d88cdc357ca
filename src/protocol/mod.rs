//! Wire protocol for ICT-style bill acceptors.
//!
//! The device speaks a single-frame protocol with no checksums: the host
//! sends one command byte, the device answers with a short status frame.

mod bill_type;
mod command;
mod fault;
mod response;

pub use bill_type::BillType;
pub use command::Command;
pub use fault::FaultCode;
pub use response::Response;
