use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{
        Coordinates, DeliveryMethod, DeliveryZone, DiscountType, MenuCategory, OrderStatus,
        PaymentMethod, status::StatusStep,
    },
    dto::{
        auth::{CreateUserRequest, LoginRequest, LoginResponse},
        content::{
            BannerList, CreateBannerRequest, CreateMainBannerRequest, CreateNewsRequest,
            MainBannerList, NewsList, UpdateBannerRequest, UpdateMainBannerRequest,
            UpdateNewsRequest,
        },
        delivery::{CheckAddressRequest, DeliveryQuote, ZoneList},
        menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
        orders::{
            CreateOrderRequest, CreatedOrder, NotifyPendingRequest, OrderAddress, OrderItemInput,
            OrderList, OrderWithItems, OrdersSince, StatusTable, SweepReport,
            UpdateOrderStatusRequest,
        },
        promo_codes::{
            CreatePromoCodeRequest, MarkPromoCodeUsedRequest, PromoCodeList, PromoValidation,
            UpdatePromoCodeRequest, ValidatePromoCodeRequest,
        },
        settings::UpdateSettingsRequest,
    },
    models::{Banner, MainBanner, MenuItem, News, Order, OrderItem, PromoCode, Settings, User},
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, content, dashboard, delivery, health, menu, orders, params, promo_codes,
        settings,
    },
    services::{analytics_service::AnalyticsReport, upload_service::UploadedImage},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::me,
        auth::create_user,
        menu::list_menu,
        menu::list_categories,
        menu::get_menu_item,
        menu::list_all_items,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
        orders::create_order,
        orders::get_order,
        orders::status_table,
        orders::orders_since,
        orders::order_events,
        orders::cron_check_orders,
        orders::notify_pending,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::delete_order,
        admin::advance_order_status,
        admin::update_order_status,
        promo_codes::validate_promo_code,
        promo_codes::mark_promo_code_used,
        promo_codes::list_promo_codes,
        promo_codes::get_promo_code,
        promo_codes::create_promo_code,
        promo_codes::update_promo_code,
        promo_codes::delete_promo_code,
        delivery::check_address,
        delivery::list_zones,
        delivery::replace_zones,
        settings::get_settings,
        settings::update_settings,
        content::list_banners,
        content::create_banner,
        content::update_banner,
        content::delete_banner,
        content::list_main_banners,
        content::create_main_banner,
        content::update_main_banner,
        content::delete_main_banner,
        content::list_news,
        content::create_news,
        content::update_news,
        content::delete_news,
        dashboard::upload_image,
        dashboard::analytics
    ),
    components(
        schemas(
            User,
            MenuItem,
            Order,
            OrderItem,
            PromoCode,
            Settings,
            Banner,
            MainBanner,
            News,
            MenuCategory,
            PaymentMethod,
            DeliveryMethod,
            OrderStatus,
            DiscountType,
            Coordinates,
            DeliveryZone,
            StatusStep,
            LoginRequest,
            LoginResponse,
            CreateUserRequest,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuList,
            OrderItemInput,
            OrderAddress,
            CreateOrderRequest,
            CreatedOrder,
            OrderList,
            OrderWithItems,
            UpdateOrderStatusRequest,
            StatusTable,
            OrdersSince,
            NotifyPendingRequest,
            SweepReport,
            ValidatePromoCodeRequest,
            MarkPromoCodeUsedRequest,
            PromoValidation,
            CreatePromoCodeRequest,
            UpdatePromoCodeRequest,
            PromoCodeList,
            CheckAddressRequest,
            DeliveryQuote,
            ZoneList,
            UpdateSettingsRequest,
            CreateBannerRequest,
            UpdateBannerRequest,
            CreateMainBannerRequest,
            UpdateMainBannerRequest,
            CreateNewsRequest,
            UpdateNewsRequest,
            BannerList,
            MainBannerList,
            NewsList,
            UploadedImage,
            AnalyticsReport,
            health::HealthData,
            params::Pagination,
            params::OrderListQuery,
            params::MenuQuery,
            Meta,
            ApiResponse<MenuList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<CreatedOrder>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Panel login"),
        (name = "Menu", description = "Public menu"),
        (name = "Orders", description = "Order placement and customer status lookup"),
        (name = "Notifications", description = "Staff notifications for new and stale orders"),
        (name = "Promo codes", description = "Promo code validation"),
        (name = "Delivery", description = "Delivery area and pricing"),
        (name = "Settings", description = "Restaurant settings"),
        (name = "Content", description = "Banners and news"),
        (name = "Admin", description = "Admin panel endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
