use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    services::product_service::slugify,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_admin(&pool, "admin@ecommerce.com", "admin123").await?;
    let category_ids = seed_categories(&pool).await?;
    seed_products(&pool, &category_ids).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    println!("Admin credentials: admin@ecommerce.com / admin123");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, 'admin')
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("Admin User")
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch its id.
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

    println!("Ensured admin user {email}");
    Ok(user_id)
}

async fn seed_categories(pool: &sqlx::PgPool) -> anyhow::Result<Vec<Uuid>> {
    let categories = [
        ("Électronique", "Appareils électroniques et gadgets"),
        ("Vêtements", "Mode et accessoires"),
        ("Maison & Jardin", "Articles pour la maison et le jardin"),
        ("Sports & Loisirs", "Équipements sportifs et de loisirs"),
    ];

    let mut ids = Vec::with_capacity(categories.len());
    for (name, description) in categories {
        let slug = slugify(name);
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO categories (id, name, slug, description, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (slug) DO UPDATE SET description = EXCLUDED.description
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("Seeded {} categories", ids.len());
    Ok(ids)
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: f64,
    compare_price: Option<f64>,
    category: usize,
    stock: i32,
    sku: &'static str,
    tags: &'static [&'static str],
    is_featured: bool,
}

async fn seed_products(pool: &sqlx::PgPool, category_ids: &[Uuid]) -> anyhow::Result<()> {
    let products = [
        SeedProduct {
            name: "Smartphone Samsung Galaxy",
            description: "Smartphone dernière génération avec écran AMOLED 6.5 pouces, appareil photo 108MP et batterie longue durée.",
            price: 699.99,
            compare_price: Some(799.99),
            category: 0,
            stock: 25,
            sku: "PHONE-SAM-001",
            tags: &["smartphone", "samsung", "android"],
            is_featured: true,
        },
        SeedProduct {
            name: "MacBook Pro 13\"",
            description: "Ordinateur portable Apple avec puce M2, 8GB RAM, 256GB SSD. Parfait pour le travail et la créativité.",
            price: 1299.99,
            compare_price: Some(1399.99),
            category: 0,
            stock: 15,
            sku: "LAPTOP-APPLE-001",
            tags: &["laptop", "apple", "macbook"],
            is_featured: true,
        },
        SeedProduct {
            name: "T-shirt Premium Coton Bio",
            description: "T-shirt en coton biologique, coupe moderne et confortable. Disponible en plusieurs couleurs.",
            price: 29.99,
            compare_price: Some(39.99),
            category: 1,
            stock: 50,
            sku: "TSHIRT-BIO-001",
            tags: &["t-shirt", "coton", "bio"],
            is_featured: false,
        },
        SeedProduct {
            name: "Casque Audio Bluetooth",
            description: "Casque sans fil avec réduction de bruit active, autonomie 30h et son haute qualité.",
            price: 149.99,
            compare_price: Some(199.99),
            category: 0,
            stock: 30,
            sku: "HEADPHONE-BT-001",
            tags: &["casque", "bluetooth", "audio"],
            is_featured: true,
        },
        SeedProduct {
            name: "Chaise de Bureau Ergonomique",
            description: "Chaise de bureau avec support lombaire, accoudoirs réglables et roulettes silencieuses.",
            price: 199.99,
            compare_price: None,
            category: 2,
            stock: 20,
            sku: "CHAIR-OFFICE-001",
            tags: &["chaise", "bureau", "ergonomique"],
            is_featured: false,
        },
        SeedProduct {
            name: "Montre Connectée Sport",
            description: "Montre intelligente avec GPS, moniteur cardiaque et résistance à l'eau. Idéale pour le sport.",
            price: 249.99,
            compare_price: Some(299.99),
            category: 3,
            stock: 35,
            sku: "WATCH-SPORT-001",
            tags: &["montre", "sport", "gps"],
            is_featured: true,
        },
        SeedProduct {
            name: "Cafetière Expresso Automatique",
            description: "Machine à café expresso avec broyeur intégré, écran tactile et système de mousse de lait.",
            price: 599.99,
            compare_price: None,
            category: 2,
            stock: 12,
            sku: "COFFEE-AUTO-001",
            tags: &["café", "expresso", "automatique"],
            is_featured: false,
        },
        SeedProduct {
            name: "Vélo Électrique Urbain",
            description: "Vélo électrique avec autonomie 80km, moteur silencieux et design moderne pour la ville.",
            price: 1299.99,
            compare_price: Some(1499.99),
            category: 3,
            stock: 8,
            sku: "BIKE-ELEC-001",
            tags: &["vélo", "électrique", "urbain"],
            is_featured: true,
        },
    ];

    let count = products.len();
    for product in products {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, slug, description, price, compare_price, category_id,
                 stock, sku, tags, is_active, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE, $11)
            ON CONFLICT (sku) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(slugify(product.name))
        .bind(product.description)
        .bind(product.price)
        .bind(product.compare_price)
        .bind(category_ids[product.category])
        .bind(product.stock)
        .bind(product.sku)
        .bind(serde_json::json!(product.tags))
        .bind(product.is_featured)
        .execute(pool)
        .await?;
    }

    println!("Seeded {count} products");
    Ok(())
}
