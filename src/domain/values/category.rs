use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product category of a trade. Each category carries a fixed list of
/// item names that may be selected for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Stationery,
    Appliances,
    Food,
}

const STATIONERY_ITEMS: &[&str] = &["notebook", "pen", "eraser", "ruler", "stapler"];
const APPLIANCE_ITEMS: &[&str] = &[
    "hair dryer",
    "vacuum cleaner",
    "microwave",
    "rice cooker",
    "electric fan",
];
const FOOD_ITEMS: &[&str] = &["apple", "bread", "coffee", "chocolate", "milk"];

impl Category {
    pub const ALL: [Category; 3] = [Category::Stationery, Category::Appliances, Category::Food];

    /// Item names selectable for this category.
    pub fn items(&self) -> &'static [&'static str] {
        match self {
            Category::Stationery => STATIONERY_ITEMS,
            Category::Appliances => APPLIANCE_ITEMS,
            Category::Food => FOOD_ITEMS,
        }
    }

    pub fn allows_item(&self, item_name: &str) -> bool {
        self.items().contains(&item_name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Stationery => write!(f, "stationery"),
            Category::Appliances => write!(f, "appliances"),
            Category::Food => write!(f, "food"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stationery" => Ok(Category::Stationery),
            "appliances" => Ok(Category::Appliances),
            "food" => Ok(Category::Food),
            _ => Err(format!("Unknown category: {s}")),
        }
    }
}
