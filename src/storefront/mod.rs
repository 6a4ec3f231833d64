//! The shopper-facing side of the system: a catalogue/cart/checkout state
//! machine (`app`), the in-memory cart itself (`cart`) and the REST client
//! (`client`) that mirrors cart changes to the service.

pub mod app;
pub mod cart;
pub mod client;

pub use app::{Storefront, View};
pub use cart::{Cart, CartLine, LineSync};
pub use client::{Customer, CustomerDetails, Recipe, StorefrontClient};
