//! Background loops for continuous processing.

pub mod position_loop;
