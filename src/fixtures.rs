//! Built-in round orders.
//!
//! Round 0 is a practice round with no order. Rounds 1-5 grow from a plain
//! order to promotions, customer info, and finally split payments with
//! table service.

use xprint_types::{
    CustomerInfo, Fixture, FixtureSource, ItemPromotion, OrderItem, OrderPromotion, SplitPayment,
    TableInfo,
};

/// 2024-03-15T12:00:00Z; each round is stamped one hour after the last.
const BASE_TIMESTAMP: i64 = 1_710_504_000_000;
const HOUR_MS: i64 = 3_600_000;

pub const LAST_ROUND: u32 = 5;

/// Fixed fixtures for rounds 1 through 5.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFixtures;

impl StaticFixtures {
    pub fn new() -> Self {
        Self
    }
}

impl FixtureSource for StaticFixtures {
    fn get_fixture(&self, round: u32) -> Option<Fixture> {
        match round {
            1 => Some(round_1()),
            2 => Some(round_2()),
            3 => Some(round_3()),
            4 => Some(round_4()),
            5 => Some(round_5()),
            _ => None,
        }
    }
}

fn stamp(round: i64) -> i64 {
    BASE_TIMESTAMP + (round - 1) * HOUR_MS
}

fn order(
    order_id: &str,
    store_number: &str,
    store_name: &str,
    round: i64,
    items: Vec<OrderItem>,
    totals: (f64, f64, f64, f64),
) -> Fixture {
    let (subtotal, tax_rate, tax_amount, total_amount) = totals;
    Fixture {
        order_id: order_id.to_string(),
        store_number: store_number.to_string(),
        store_name: store_name.to_string(),
        timestamp: stamp(round),
        items,
        subtotal,
        tax_rate,
        tax_amount,
        total_amount,
        item_promotions: Vec::new(),
        order_promotions: Vec::new(),
        customer_info: None,
        payment_method: None,
        split_payments: Vec::new(),
        table_info: None,
    }
}

fn item_promo(sku: &str, name: &str, discount: f64) -> ItemPromotion {
    ItemPromotion {
        item_sku: sku.to_string(),
        promotion_name: name.to_string(),
        discount_amount: discount,
    }
}

fn order_promo(name: &str, discount: f64, kind: &str) -> OrderPromotion {
    OrderPromotion {
        promotion_name: name.to_string(),
        discount_amount: discount,
        promotion_type: kind.to_string(),
    }
}

fn customer(id: &str, name: &str, status: &str, points: i64, since: &str) -> CustomerInfo {
    CustomerInfo {
        customer_id: id.to_string(),
        name: name.to_string(),
        member_status: status.to_string(),
        loyalty_points: points,
        member_since: since.to_string(),
    }
}

fn split(payer: &str, amount: f64, method: &str, tip: f64, items: &[&str]) -> SplitPayment {
    SplitPayment {
        payer_name: payer.to_string(),
        amount,
        method: method.to_string(),
        tip,
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

// Round 1: plain order
fn round_1() -> Fixture {
    order(
        "A-0042",
        "001",
        "BYTE BURGERS",
        1,
        vec![
            OrderItem::new("Cheeseburger", 2, 8.99, 17.98, "BURG-001", "BURGERS"),
            OrderItem::new("French Fries", 1, 3.99, 3.99, "SIDE-001", "SIDES"),
            OrderItem::new("Soft Drink", 2, 2.99, 5.98, "DRINK-001", "BEVERAGES"),
        ],
        (27.95, 0.08, 2.24, 30.19),
    )
}

// Round 2: promotions
fn round_2() -> Fixture {
    let mut fixture = order(
        "B-1337",
        "002",
        "JAVA JUNCTION",
        2,
        vec![
            OrderItem::new("Large Latte", 2, 5.99, 11.98, "COFF-002", "HOT DRINKS"),
            OrderItem::new("Chocolate Croissant", 2, 4.50, 9.00, "BAKE-003", "BAKERY"),
            OrderItem::new("Breakfast Sandwich", 1, 7.99, 7.99, "FOOD-001", "FOOD"),
        ],
        (28.97, 0.0875, 2.53, 26.50),
    );
    fixture.item_promotions = vec![item_promo("COFF-002", "Buy One Get One 50% Off", 3.00)];
    fixture.order_promotions = vec![order_promo("Morning Rush Special", 2.00, "FIXED")];
    fixture
}

// Round 3: loyalty customer
fn round_3() -> Fixture {
    let mut fixture = order(
        "C-2024",
        "003",
        "PIZZA PALACE",
        3,
        vec![
            OrderItem::new("Large Pepperoni Pizza", 1, 18.99, 18.99, "PIZZ-001", "PIZZA"),
            OrderItem::new("Garlic Breadsticks", 2, 6.99, 13.98, "SIDE-005", "SIDES"),
            OrderItem::new("2-Liter Soda", 1, 3.99, 3.99, "DRINK-003", "BEVERAGES"),
        ],
        (36.96, 0.08, 2.96, 39.92),
    );
    fixture.customer_info = Some(customer("CUST-8826", "John Doe", "GOLD", 1247, "2019-03-15"));
    fixture.payment_method = Some("VISA ****1234".to_string());
    fixture
}

// Round 4: promotions and customer together
fn round_4() -> Fixture {
    let mut fixture = order(
        "D-9999",
        "004",
        "TECH TREATS",
        4,
        vec![
            OrderItem::new("Quantum Quiche", 2, 12.99, 25.98, "TECH-001", "MAINS"),
            OrderItem::new("Binary Brownie", 3, 4.50, 13.50, "DESS-001", "DESSERTS"),
            OrderItem::new("Cloud Coffee", 2, 5.99, 11.98, "DRINK-007", "BEVERAGES"),
            OrderItem::new("RAM Ramen", 1, 14.99, 14.99, "TECH-003", "MAINS"),
        ],
        (66.45, 0.09, 4.55, 55.05),
    );
    fixture.item_promotions = vec![
        item_promo("TECH-001", "Tech Tuesday Special", 5.00),
        item_promo("DESS-001", "Sweet Deal", 2.00),
    ];
    fixture.order_promotions = vec![
        order_promo("Member Appreciation", 10.0, "PERCENTAGE"),
        order_promo("App Order Discount", 3.00, "FIXED"),
    ];
    fixture.customer_info = Some(customer(
        "CUST-1337",
        "Ada Lovelace",
        "PLATINUM",
        3847,
        "2018-01-01",
    ));
    fixture.payment_method = Some("APPLE PAY".to_string());
    fixture
}

// Round 5: split payment and table service
fn round_5() -> Fixture {
    let mut fixture = order(
        "SPLIT-8847",
        "777",
        "THE FINAL FEAST",
        5,
        vec![
            OrderItem::new("Wagyu Steak", 1, 89.99, 89.99, "LUX-001", "ENTREES").with_modifiers(&[
                "Medium Rare",
                "Extra Butter",
                "Side: Mashed Potatoes",
            ]),
            OrderItem::new("Lobster Risotto", 1, 45.99, 45.99, "LUX-002", "ENTREES")
                .with_modifiers(&["Extra Parmesan", "Side: Asparagus"]),
            OrderItem::new("Caesar Salad", 2, 12.99, 25.98, "APP-001", "APPETIZERS")
                .with_modifiers(&["No Anchovies", "Extra Croutons"]),
            OrderItem::new("Truffle Fries", 1, 18.99, 18.99, "APP-002", "APPETIZERS"),
            OrderItem::new("Chocolate Soufflé", 2, 14.99, 29.98, "DES-001", "DESSERTS")
                .with_modifiers(&["Extra Vanilla Ice Cream"]),
            OrderItem::new("Vintage Wine", 1, 125.00, 125.00, "WINE-001", "BEVERAGES")
                .with_modifiers(&["2019 Cabernet Sauvignon"]),
        ],
        (335.93, 0.095, 31.91, 362.84),
    );
    fixture.item_promotions = vec![item_promo("DES-001", "Dessert Happy Hour", 5.00)];
    fixture.customer_info = Some(customer(
        "GROUP-4452",
        "Table 12 - Chen Party",
        "VIP",
        15420,
        "2020-03-15",
    ));
    fixture.payment_method = Some("SPLIT".to_string());
    fixture.split_payments = vec![
        split(
            "Alice Chen",
            156.43,
            "VISA ****7823",
            25.00,
            &["Wagyu Steak", "Truffle Fries"],
        ),
        split(
            "Bob Martinez",
            89.54,
            "MASTERCARD ****9921",
            15.00,
            &["Lobster Risotto", "Caesar Salad (1)"],
        ),
        split(
            "Carol Wu",
            121.87,
            "AMEX ****3345",
            20.00,
            &["Vintage Wine", "Caesar Salad (1)", "Chocolate Soufflé (2)"],
        ),
    ];
    fixture.table_info = Some(TableInfo {
        table_number: "12".to_string(),
        server_name: "Jennifer K.".to_string(),
        guest_count: 3,
        service_rating: 5,
    });
    fixture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_zero_and_out_of_range_absent() {
        let fixtures = StaticFixtures::new();
        assert!(fixtures.get_fixture(0).is_none());
        assert!(fixtures.get_fixture(LAST_ROUND + 1).is_none());
        assert!(fixtures.get_fixture(u32::MAX).is_none());
    }

    #[test]
    fn test_rounds_are_fixed() {
        let fixtures = StaticFixtures::new();
        for round in 1..=LAST_ROUND {
            assert_eq!(fixtures.get_fixture(round), fixtures.get_fixture(round));
        }
        let ids: Vec<String> = (1..=LAST_ROUND)
            .filter_map(|r| fixtures.get_fixture(r))
            .map(|f| f.order_id)
            .collect();
        assert_eq!(ids, vec!["A-0042", "B-1337", "C-2024", "D-9999", "SPLIT-8847"]);
    }

    #[test]
    fn test_round_features_grow() {
        let fixtures = StaticFixtures::new();
        let r1 = fixtures.get_fixture(1).unwrap();
        assert!(r1.item_promotions.is_empty() && r1.customer_info.is_none());

        let r2 = fixtures.get_fixture(2).unwrap();
        assert_eq!(r2.order_promotions[0].promotion_type, "FIXED");

        let r3 = fixtures.get_fixture(3).unwrap();
        assert_eq!(r3.customer_info.unwrap().member_status, "GOLD");

        let r5 = fixtures.get_fixture(5).unwrap();
        assert_eq!(r5.split_payments.len(), 3);
        assert_eq!(r5.table_info.unwrap().guest_count, 3);
        assert_eq!(r5.items[0].modifiers.len(), 3);
        assert_eq!(r5.timestamp, BASE_TIMESTAMP + 4 * HOUR_MS);
    }
}
