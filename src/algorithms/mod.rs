pub mod a_star;
pub mod common;
pub mod optimizer;
pub mod reference;
