pub mod audit_logs;
pub mod banners;
pub mod delivery_zones;
pub mod main_banners;
pub mod menu_items;
pub mod news;
pub mod order_items;
pub mod orders;
pub mod promo_codes;
pub mod settings;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use banners::Entity as Banners;
pub use delivery_zones::Entity as DeliveryZones;
pub use main_banners::Entity as MainBanners;
pub use menu_items::Entity as MenuItems;
pub use news::Entity as News;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use promo_codes::Entity as PromoCodes;
pub use settings::Entity as Settings;
pub use users::Entity as Users;
