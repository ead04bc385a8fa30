pub mod assignment;
pub mod brute;
pub mod dpll;
