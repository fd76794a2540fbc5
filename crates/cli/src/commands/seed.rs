//! Seed the catalog with the reference herbs and their products.
//!
//! Idempotent: does nothing when any plant already exists. Products are
//! linked to plants by name so the seed works whatever ids the database
//! assigns.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::CommandError;

struct SeedPlant {
    name: &'static str,
    scientific_name: &'static str,
    category: &'static str,
    overview: &'static str,
    medicinal_uses: &'static str,
    cultivation: &'static str,
    slug: &'static str,
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    /// Price in cents
    price_cents: i64,
    plant: &'static str,
    stock: i32,
    image: &'static str,
}

const PLANTS: &[SeedPlant] = &[
    SeedPlant {
        name: "Ashwagandha",
        scientific_name: "Withania somnifera",
        category: "Adaptogen",
        overview: "Ashwagandha, also known as Indian ginseng, is a powerful adaptogenic herb used in Ayurvedic medicine for over 3,000 years. It is known for its rejuvenating and stress-relieving properties.",
        medicinal_uses: "Reduces stress and anxiety, improves brain function, lowers blood sugar and cortisol levels, helps fight symptoms of depression, boosts testosterone and fertility in men, increases muscle mass and strength, reduces inflammation, and improves heart health.",
        cultivation: "Grows well in dry regions with moderate temperatures (20-35°C). Requires well-drained sandy loam soil with pH 7.5-8.0. Plant spacing: 60x30 cm. Harvesting after 150-180 days when leaves turn yellow.",
        slug: "ashwagandha",
    },
    SeedPlant {
        name: "Tulsi",
        scientific_name: "Ocimum sanctum",
        category: "Immunity Booster",
        overview: "Tulsi, or Holy Basil, is considered the \"Queen of Herbs\" in Ayurveda. It has been revered for its medicinal properties and spiritual significance for thousands of years.",
        medicinal_uses: "Boosts immunity, fights respiratory infections, reduces fever, alleviates stress, supports digestive health, has anti-inflammatory properties, helps regulate blood sugar, and protects against infections.",
        cultivation: "Grows in tropical and subtropical regions. Prefers warm climate (25-35°C) and well-drained loamy soil. Requires full sunlight and regular watering. Can be grown from seeds or cuttings. Harvest leaves regularly for continuous growth.",
        slug: "tulsi",
    },
    SeedPlant {
        name: "Neem",
        scientific_name: "Azadirachta indica",
        category: "Purifier",
        overview: "Neem is known as the \"Village Pharmacy\" in India. Every part of the neem tree has been used in Ayurvedic and Unani medicine for centuries.",
        medicinal_uses: "Purifies blood, fights bacterial infections, treats skin diseases, boosts immunity, improves oral health, controls diabetes, promotes liver health, and has anti-cancer properties.",
        cultivation: "Hardy tree that grows in tropical and semi-tropical regions. Tolerates drought and poor soil. Prefers temperatures of 21-32°C. Grows best in deep, well-drained soil. Minimal maintenance required once established.",
        slug: "neem",
    },
    SeedPlant {
        name: "Brahmi",
        scientific_name: "Bacopa monnieri",
        category: "Brain Tonic",
        overview: "Brahmi is a renowned brain tonic in Ayurveda, traditionally used to enhance memory, learning, and concentration.",
        medicinal_uses: "Improves memory and cognitive function, reduces anxiety and stress, treats epilepsy, lowers blood pressure, has antioxidant effects, reduces inflammation, and supports healthy aging.",
        cultivation: "Aquatic or semi-aquatic plant that grows in wetlands. Requires moist, marshy soil and partial shade. Can be grown in pots with water. Propagates easily from cuttings. Harvest leaves after 3-4 months.",
        slug: "brahmi",
    },
    SeedPlant {
        name: "Turmeric",
        scientific_name: "Curcuma longa",
        category: "Anti-inflammatory",
        overview: "Turmeric, the golden spice of India, has been used in Ayurvedic medicine for over 4,000 years. Its active compound curcumin is extensively researched for medicinal properties.",
        medicinal_uses: "Powerful anti-inflammatory, strong antioxidant, improves brain function, lowers risk of heart disease, helps prevent cancer, useful in treating Alzheimer's, helps with arthritis, and fights depression.",
        cultivation: "Grows in tropical regions with high rainfall. Requires temperatures of 20-30°C. Prefers well-drained, fertile soil rich in organic matter. Plant rhizomes 5 cm deep. Harvest after 7-10 months when leaves turn yellow.",
        slug: "turmeric",
    },
    SeedPlant {
        name: "Amla",
        scientific_name: "Phyllanthus emblica",
        category: "Vitamin C Source",
        overview: "Amla, or Indian Gooseberry, is one of the most important herbs in Ayurveda. It is extremely rich in Vitamin C and antioxidants.",
        medicinal_uses: "Rich source of Vitamin C, boosts immunity, improves digestion, enhances hair growth, improves eyesight, regulates blood sugar, supports heart health, and has anti-aging properties.",
        cultivation: "Deciduous tree that grows in tropical and subtropical regions. Prefers dry climate with temperatures 10-46°C. Grows in various soil types but prefers sandy loam. Drought-resistant once established. Fruits after 4-5 years.",
        slug: "amla",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct { name: "Ashwagandha Capsules", description: "Pure Ashwagandha extract capsules for stress relief", price_cents: 2499, plant: "Ashwagandha", stock: 50, image: "ashwagandha-capsules" },
    SeedProduct { name: "Ashwagandha Powder", description: "Organic Ashwagandha root powder - 100g", price_cents: 1899, plant: "Ashwagandha", stock: 75, image: "ashwagandha-powder" },
    SeedProduct { name: "Tulsi Tea", description: "Organic Holy Basil tea for immunity - 50 bags", price_cents: 1299, plant: "Tulsi", stock: 100, image: "tulsi-tea" },
    SeedProduct { name: "Tulsi Drops", description: "Concentrated Tulsi extract drops", price_cents: 1599, plant: "Tulsi", stock: 60, image: "tulsi-drops" },
    SeedProduct { name: "Neem Face Wash", description: "Natural Neem face wash for clear skin", price_cents: 999, plant: "Neem", stock: 80, image: "neem-facewash" },
    SeedProduct { name: "Neem Capsules", description: "Pure Neem leaf capsules for blood purification", price_cents: 1999, plant: "Neem", stock: 45, image: "neem-capsules" },
    SeedProduct { name: "Brahmi Memory Tonic", description: "Brahmi syrup for enhanced memory and focus", price_cents: 2299, plant: "Brahmi", stock: 40, image: "brahmi-tonic" },
    SeedProduct { name: "Turmeric Powder", description: "Organic turmeric powder - 200g", price_cents: 899, plant: "Turmeric", stock: 120, image: "turmeric-powder" },
    SeedProduct { name: "Curcumin Capsules", description: "High-potency curcumin extract capsules", price_cents: 2999, plant: "Turmeric", stock: 55, image: "curcumin-capsules" },
    SeedProduct { name: "Amla Juice", description: "Pure Amla juice for immunity - 500ml", price_cents: 1499, plant: "Amla", stock: 70, image: "amla-juice" },
    SeedProduct { name: "Amla Candy", description: "Sweet and tangy Amla candy - 250g", price_cents: 699, plant: "Amla", stock: 90, image: "amla-candy" },
];

/// Insert the reference catalog if the `plants` table is empty.
///
/// # Errors
///
/// Returns an error if a query fails; nothing is written in that case.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plants")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!(plants = existing, "Catalog already seeded, skipping");
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let mut plant_ids: HashMap<&str, i32> = HashMap::new();

    for plant in PLANTS {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO plants
                (name, scientific_name, category, overview, medicinal_uses, cultivation,
                 image_url, model_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(plant.name)
        .bind(plant.scientific_name)
        .bind(plant.category)
        .bind(plant.overview)
        .bind(plant.medicinal_uses)
        .bind(plant.cultivation)
        .bind(format!("/static/images/{}.jpg", plant.slug))
        .bind(format!("/static/models/{}.glb", plant.slug))
        .fetch_one(&mut *tx)
        .await?;
        plant_ids.insert(plant.name, id);
    }

    for product in PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO products (name, description, price, plant_id, stock, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(Decimal::new(product.price_cents, 2))
        .bind(plant_ids.get(product.plant).copied())
        .bind(product.stock)
        .bind(format!("/static/images/{}.jpg", product.image))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        plants = PLANTS.len(),
        products = PRODUCTS.len(),
        "Catalog seeded"
    );
    Ok(())
}
