use super::*;
use crate::auth::{CustomerPrincipal, StaffPrincipal};
use crate::db::DbService;
use crate::db::repository::{customer, dining_table, product, staff};
use shared::models::{
    CustomerRegister, DiningTableCreate, OrderStatusUpdate, PaymentMethod, PaymentRequest,
    PlaceOrder, Product, ProductCategory, ProductCreate, TableItemAdd,
};

/// In-memory database with a manager on top
struct Fixture {
    db: DbService,
    manager: OrdersManager,
}

async fn fixture() -> Fixture {
    let db = DbService::open_in_memory().await.unwrap();
    let manager = OrdersManager::new(db.pool.clone());
    Fixture { db, manager }
}

impl Fixture {
    async fn product(&self, name: &str, price: f64) -> Product {
        product::create(
            &self.db.pool,
            ProductCreate {
                name: name.to_string(),
                description: None,
                price,
                category: ProductCategory::Food,
                image_url: None,
                is_available: None,
            },
        )
        .await
        .unwrap()
    }

    async fn table(&self, name: &str) -> i64 {
        dining_table::create(
            &self.db.pool,
            DiningTableCreate {
                name: name.to_string(),
                capacity: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn customer(&self, name: &str) -> CustomerPrincipal {
        let email = format!("{}@example.com", name.to_lowercase());
        let c = customer::create(
            &self.db.pool,
            &CustomerRegister {
                email,
                name: name.to_string(),
                phone: None,
            },
        )
        .await
        .unwrap();
        CustomerPrincipal {
            id: c.id,
            name: c.name,
            email: c.email,
        }
    }

    async fn staff(&self) -> StaffPrincipal {
        let s = staff::create(&self.db.pool, "chef@example.com", "Chef", "not-a-real-hash")
            .await
            .unwrap();
        StaffPrincipal {
            id: s.id,
            name: s.name,
            email: s.email,
        }
    }

    async fn is_occupied(&self, table_id: i64) -> bool {
        dining_table::find_by_id(&self.db.pool, table_id)
            .await
            .unwrap()
            .unwrap()
            .is_occupied
    }

    async fn payment_count(&self, order_id: i64) -> i64 {
        payment::count_by_order(&self.db.pool, order_id).await.unwrap()
    }

    /// Cart with `qty` × `product_id`, placed on `table_id`
    async fn placed_order(
        &self,
        who: &CustomerPrincipal,
        product_id: i64,
        qty: i64,
        table_id: i64,
    ) -> OrderDetail {
        self.manager
            .add_to_cart(who, product_id, Some(qty))
            .await
            .unwrap();
        self.manager
            .place_order(
                who,
                PlaceOrder {
                    order_id: None,
                    table_id: Some(table_id),
                },
            )
            .await
            .unwrap()
    }
}

fn cash() -> PaymentRequest {
    PaymentRequest {
        method: PaymentMethod::Cash,
        card_number: None,
        invoice_email: None,
    }
}

fn as_customer(c: &CustomerPrincipal) -> Principal {
    Principal::Customer(c.clone())
}

fn as_staff(s: &StaffPrincipal) -> Principal {
    Principal::Staff(s.clone())
}

mod test_placement;
mod test_tables;
