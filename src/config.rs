use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub seller: SellerInfo,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);
        Ok(Self {
            database_url,
            host,
            port,
            seller: SellerInfo::from_env(),
        })
    }
}

/// Seller identity printed on invoices. Injected into the renderer at
/// construction time instead of living as a module-level constant.
#[derive(Debug, Clone)]
pub struct SellerInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    pub siret: String,
    pub tva: String,
}

impl SellerInfo {
    pub fn from_env() -> Self {
        Self {
            name: var_or("SELLER_NAME", "E-Commerce Store"),
            address: var_or("SELLER_ADDRESS", "123 Rue du Commerce"),
            city: var_or("SELLER_CITY", "75001 Paris, France"),
            phone: var_or("SELLER_PHONE", "+33 1 23 45 67 89"),
            email: var_or("SELLER_EMAIL", "contact@ecommerce-store.fr"),
            siret: var_or("SELLER_SIRET", "12345678901234"),
            tva: var_or("SELLER_TVA", "FR12345678901"),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
