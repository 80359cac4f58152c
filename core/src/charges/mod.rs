pub mod charge;
pub mod set;

pub use charge::Charge;
pub use set::ChargeSet;
