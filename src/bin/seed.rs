use restaurant_ordering_api::{
    config::AppConfig,
    db::run_migrations,
    middleware::auth::{ROLE_ADMIN, ROLE_STAFF},
    services::auth_service::hash_password,
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    run_migrations(&config.database_url).await?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await?;

    let admin_password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());
    let admin_id = ensure_user(&pool, "admin@example.com", &admin_password, ROLE_ADMIN).await?;
    let staff_id = ensure_user(&pool, "staff@example.com", "staff123", ROLE_STAFF).await?;
    seed_menu(&pool).await?;
    seed_zones(&pool).await?;
    seed_settings(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Staff ID: {staff_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // (name, description, category, price in grosze, recommended)
    let items = vec![
        ("Margherita", "Tomato sauce, mozzarella, basil", "PIZZA", 3200, true),
        ("Diavola", "Spicy salami, chilli, mozzarella", "PIZZA", 3900, false),
        ("Spaghetti Carbonara", "Guanciale, egg yolk, pecorino", "PASTA", 3600, true),
        ("Classic Burger", "Beef patty, cheddar, pickles", "BURGERS", 3400, false),
        ("Caesar Salad", "Romaine, parmesan, croutons", "SALADS", 2800, false),
        ("Tomato Soup", "Roasted tomatoes, cream", "SOUPS", 1800, false),
        ("Bruschetta", "Grilled bread, tomatoes, garlic", "APPETIZERS", 1900, false),
        ("Tiramisu", "Mascarpone, espresso, cocoa", "DESSERTS", 2200, true),
        ("Lemonade", "Fresh lemons, mint", "DRINKS", 1200, false),
    ];

    for (name, desc, category, price, recommended) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, name, description, category, price, is_recommended, is_on_main_page)
            SELECT $1, $2, $3, $4, $5, $6, $6
            WHERE NOT EXISTS (SELECT 1 FROM menu_items WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(category)
        .bind(price as i64)
        .bind(recommended)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu");
    Ok(())
}

async fn seed_zones(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM delivery_zones")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("Delivery zones already configured");
        return Ok(());
    }

    for (min, max, price) in [(0.0_f64, 7.0_f64, 500_i64), (7.0, 15.0, 1000)] {
        sqlx::query(
            "INSERT INTO delivery_zones (id, min_radius_km, max_radius_km, price) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(min)
        .bind(max)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded delivery zones");
    Ok(())
}

async fn seed_settings(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (id, ordering_open, order_wait_minutes, pizza_available_from, pizza_available_until)
        VALUES (1, TRUE, 45, '12:00', '22:00')
        ON CONFLICT (id) DO UPDATE
        SET pizza_available_from = COALESCE(settings.pizza_available_from, EXCLUDED.pizza_available_from),
            pizza_available_until = COALESCE(settings.pizza_available_until, EXCLUDED.pizza_available_until)
        "#,
    )
    .execute(pool)
    .await?;

    println!("Seeded settings");
    Ok(())
}
