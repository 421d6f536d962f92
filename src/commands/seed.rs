//! Seed command - an admin account plus a small demo catalog.
//!
//! Safe to re-run: existing rows are found by email or slug and left alone.

use rust_decimal::Decimal;

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::domain::{slugify, NewCategory, NewProduct, NewUser, Password, UserRole};
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    /// Minor units
    price: i64,
    stock: i32,
}

struct DemoCategory {
    name: &'static str,
    description: &'static str,
    products: &'static [DemoProduct],
}

const DEMO_CATALOG: &[DemoCategory] = &[
    DemoCategory {
        name: "Electronics",
        description: "Gadgets and accessories",
        products: &[
            DemoProduct {
                name: "Wireless Headphones",
                description: "Over-ear, noise cancelling",
                price: 5999,
                stock: 25,
            },
            DemoProduct {
                name: "USB-C Charger",
                description: "65W, two ports",
                price: 2499,
                stock: 100,
            },
        ],
    },
    DemoCategory {
        name: "Home & Garden",
        description: "For the house and the yard",
        products: &[
            DemoProduct {
                name: "Desk Lamp",
                description: "Dimmable LED",
                price: 3450,
                stock: 40,
            },
            DemoProduct {
                name: "Watering Can",
                description: "Five litres, galvanized steel",
                price: 1800,
                stock: 15,
            },
        ],
    },
];

/// What a seed run created
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub admin_promoted: bool,
    pub categories_created: usize,
    pub products_created: usize,
}

pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let uow = Persistence::new(db.get_connection());

    let report = seed(&uow, &args.admin_email, &args.admin_password).await?;
    tracing::info!(?report, "Seeding finished");
    println!(
        "admin {}, {} categories and {} products created",
        if report.admin_created {
            "created"
        } else if report.admin_promoted {
            "promoted"
        } else {
            "unchanged"
        },
        report.categories_created,
        report.products_created
    );

    Ok(())
}

/// Insert whatever part of the seed data is missing.
///
/// Products are only added together with a newly created category, so a
/// catalog edited by hand is never topped up again.
pub async fn seed<U: UnitOfWork>(
    uow: &U,
    admin_email: &str,
    admin_password: &str,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    match uow.users().find_by_email(admin_email).await? {
        Some(user) if user.is_admin() => {}
        Some(user) => {
            uow.users().update_role(user.id, UserRole::Admin).await?;
            report.admin_promoted = true;
        }
        None => {
            let password_hash = Password::new(admin_password)?.into_string();
            uow.users()
                .create(NewUser {
                    email: admin_email.to_lowercase(),
                    password_hash: Some(password_hash),
                    name: Some("Administrator".to_string()),
                    role: UserRole::Admin,
                })
                .await?;
            report.admin_created = true;
        }
    }

    for demo in DEMO_CATALOG {
        let slug = slugify(demo.name);
        if uow.categories().find_by_slug(&slug).await?.is_some() {
            tracing::debug!(%slug, "Demo category already present");
            continue;
        }

        let category = uow
            .categories()
            .create(NewCategory {
                name: demo.name.to_string(),
                slug,
                description: Some(demo.description.to_string()),
            })
            .await?;
        report.categories_created += 1;

        for product in demo.products {
            uow.products()
                .create(NewProduct {
                    name: product.name.to_string(),
                    description: product.description.to_string(),
                    price: Decimal::new(product.price, 2),
                    stock: product.stock,
                    images: vec![],
                    category_id: category.id,
                })
                .await?;
            report.products_created += 1;
        }
    }

    Ok(report)
}
