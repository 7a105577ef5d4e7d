//! Closed-form interest formulas: compound growth, APY, present value,
//! simple interest and simple-interest installment loans.

pub mod compound;
pub mod simple;
