//! Domain models for the document store.
//!
//! Each entity type maps to one collection snapshot. Inputs (`New*`) and
//! patches (`*Patch`) are typed structs: required fields are non-optional,
//! so presence is checked by definedness during deserialization, and patch
//! structs simply have no `id` field - identifiers are immutable.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{NewUser, PublicUser, UserPatch, UserRecord};
