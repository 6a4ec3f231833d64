pub mod carts;
pub mod customers;
pub mod ingredients;
pub mod orders;
pub mod recipes;
