pub mod alias;
pub mod cd;
