use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub in_stock: bool,
    pub category: String,
}

const CATALOG: &[(&str, &str, i64, bool, &str)] = &[
    ("P101", "Laptop", 55000, true, "Electronics"),
    ("P102", "Headphones", 2500, false, "Accessories"),
    ("P103", "Smartwatch", 9999, true, "Wearables"),
];

/// The fixed product listing.
pub fn all_products() -> Vec<Product> {
    CATALOG
        .iter()
        .map(|&(id, name, price, in_stock, category)| Product {
            product_id: id.into(),
            name: name.into(),
            price,
            in_stock,
            category: category.into(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_serializes_in_camel_case() {
        let json = serde_json::to_value(all_products()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[0]["productId"], "P101");
        assert_eq!(json[1]["inStock"], false);
        assert_eq!(json[2]["price"], 9999);
    }
}
