//! Canonical test data for the DemoBlaze product store.
//!
//! One data set serves both the scenario cases and the Gherkin steps.

use serde::Serialize;

/// Entry URL of the storefront
pub const BASE_URL: &str = "https://www.demoblaze.com/index.html";

/// A product listed in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Product {
    /// Display name, also the product's identity
    pub name: &'static str,
    /// Price on the home listing, e.g. `$360`
    pub list_price: &'static str,
    /// Price on the details screen, e.g. `$360 *includes tax`
    pub price_with_tax: &'static str,
    /// Leading fragment of the product description
    pub description_fragment: &'static str,
}

impl Product {
    /// Numeric price as shown in cart rows, e.g. `360`
    #[must_use]
    pub fn cart_price(&self) -> &'static str {
        self.list_price.trim_start_matches('$')
    }

    /// Numeric price value
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.cart_price().parse().unwrap_or(0)
    }
}

/// Samsung galaxy s6
pub const SAMSUNG_GALAXY_S6: Product = Product {
    name: "Samsung galaxy s6",
    list_price: "$360",
    price_with_tax: "$360 *includes tax",
    description_fragment: "The Samsung Galaxy S6 is",
};

/// Nokia lumia 1520
pub const NOKIA_LUMIA_1520: Product = Product {
    name: "Nokia lumia 1520",
    list_price: "$820",
    price_with_tax: "$820 *includes tax",
    description_fragment: "The Nokia Lumia 1520 is",
};

/// Nexus 6
pub const NEXUS_6: Product = Product {
    name: "Nexus 6",
    list_price: "$650",
    price_with_tax: "$650 *includes tax",
    description_fragment: "The Motorola Google Nexus 6",
};

/// Samsung galaxy s7
pub const SAMSUNG_GALAXY_S7: Product = Product {
    name: "Samsung galaxy s7",
    list_price: "$800",
    price_with_tax: "$800 *includes tax",
    description_fragment: "The Samsung Galaxy S7 is",
};

/// Iphone 6 32gb
pub const IPHONE_6_32GB: Product = Product {
    name: "Iphone 6 32gb",
    list_price: "$790",
    price_with_tax: "$790 *includes tax",
    description_fragment: "It comes with 1GB of RAM. The",
};

/// Sony xperia z5
pub const SONY_XPERIA_Z5: Product = Product {
    name: "Sony xperia z5",
    list_price: "$320",
    price_with_tax: "$320 *includes tax",
    description_fragment: "Sony Xperia Z5 Dual",
};

/// Every product the suite knows, in home-listing order
pub static PRODUCTS: [Product; 6] = [
    SAMSUNG_GALAXY_S6,
    NOKIA_LUMIA_1520,
    NEXUS_6,
    SAMSUNG_GALAXY_S7,
    IPHONE_6_32GB,
    SONY_XPERIA_Z5,
];

/// Look a product up by exact name
#[must_use]
pub fn product(name: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.name == name)
}

/// Dialog and confirmation texts shown by the store
pub mod alerts {
    /// After "Add to cart"; the live store appends a period
    pub const PRODUCT_ADDED: &str = "Product added";
    /// Contact form sent
    pub const MESSAGE_SENT: &str = "Thanks for the message!!";
    /// Contact form without email
    pub const FILL_OUT_EMAIL: &str = "Please fill out Email.";
    /// Contact form without name
    pub const FILL_OUT_NAME: &str = "Please fill out Name.";
    /// Contact form without message
    pub const FILL_OUT_MESSAGE: &str = "Please fill out Message.";
    /// Order form without name or card
    pub const FILL_OUT_ORDER: &str = "Please fill out Name and Creditcard.";
    /// Heading of the purchase confirmation
    pub const PURCHASE_THANK_YOU: &str = "Thank you for your purchase!";
}

/// Checkout form values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    /// Customer name
    pub name: String,
    /// Country
    pub country: String,
    /// City
    pub city: String,
    /// Credit card number
    pub card: String,
    /// Expiry month
    pub month: String,
    /// Expiry year
    pub year: String,
}

impl OrderDetails {
    /// The valid order used by the checkout scenarios
    #[must_use]
    pub fn valid() -> Self {
        Self {
            name: "Emmanuel Arhu".into(),
            country: "Ghana".into(),
            city: "Takoradi".into(),
            card: "123456789".into(),
            month: "12".into(),
            year: "2030".into(),
        }
    }

    /// Structurally odd values the store accepts anyway
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            name: "Test User".into(),
            country: "Test Country".into(),
            city: "1234567890-".into(),
            card: "1234567890-".into(),
            month: "1234567890-".into(),
            year: "1234567890-".into(),
        }
    }

    /// All fields empty
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            country: String::new(),
            city: String::new(),
            card: String::new(),
            month: String::new(),
            year: String::new(),
        }
    }
}

/// Contact form values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    /// Sender email
    pub email: String,
    /// Sender name
    pub name: String,
    /// Message body
    pub message: String,
}

impl ContactMessage {
    /// A complete, valid message
    #[must_use]
    pub fn valid() -> Self {
        Self {
            email: "emmanuel@example.com".into(),
            name: "Emmanuel Arhu".into(),
            message: "This is a Selenide test please ignore".into(),
        }
    }

    /// Garbage in every field; the store does not validate
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            email: "1234567890-".into(),
            name: "1234567890-".into(),
            message: "1234567890-".into(),
        }
    }

    /// All fields empty
    #[must_use]
    pub fn empty() -> Self {
        Self {
            email: String::new(),
            name: String::new(),
            message: String::new(),
        }
    }

    /// An inquiry used by the Gherkin contact feature
    #[must_use]
    pub fn inquiry() -> Self {
        Self {
            email: "test@example.com".into(),
            name: "Test User".into(),
            message: "Test inquiry about your products".into(),
        }
    }
}
