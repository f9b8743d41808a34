//! Business rules that do not touch the database.

pub mod delivery;
pub mod menu;
pub mod promo;
pub mod status;

pub use delivery::{Coordinates, DeliveryZone};
pub use menu::{MenuCategory, PaymentMethod};
pub use promo::DiscountType;
pub use status::{DeliveryMethod, OrderStatus};
