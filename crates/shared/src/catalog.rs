//! Product catalog and price computation.
//!
//! The catalog is read-only reference data: the configurator looks options up
//! by id for labels, colors and prices and never mutates it.

use serde::{Deserialize, Serialize};

use crate::{DeskConfig, DeskSize, PartId};

/// Price of the bare desk before any option
pub const BASE_PRICE: i64 = 999;
/// Flat surcharge for a made-to-order footprint
pub const CUSTOM_SIZE_SURCHARGE: i64 = 500;
/// Area of the reference footprint (140 x 70 cm)
pub const STANDARD_AREA: f64 = 140.0 * 70.0;
/// Price per cm² of custom area above the reference footprint
pub const CUSTOM_AREA_RATE: f64 = 0.15;

/// How an option is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Color,
    Image,
    #[default]
    Text,
    Button,
}

/// One purchasable option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: PartId,
    pub label: String,
    /// Price delta in whole currency units (may be negative)
    pub price: i64,
    #[serde(default, rename = "type")]
    pub kind: OptionKind,
    /// Hex color for color options, size id for sizes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductOption {
    fn new(id: &str, label: &str, price: i64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            price,
            kind: OptionKind::Text,
            value: None,
            description: None,
        }
    }

    fn color(id: &str, label: &str, price: i64, hex: &str) -> Self {
        Self {
            kind: OptionKind::Color,
            value: Some(hex.to_string()),
            ..Self::new(id, label, price)
        }
    }

    fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn valued(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Parse a `#RRGGBB` value into RGB bytes
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.value.as_deref()?.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?])
    }
}

/// Option categories, in the order the configuration steps present them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Size,
    TopColor,
    FrameType,
    FrameColor,
    Accessory,
    Addon,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Size,
        Category::TopColor,
        Category::FrameType,
        Category::FrameColor,
        Category::Accessory,
        Category::Addon,
    ];

    /// Categories whose options can carry a model override
    pub const OVERRIDABLE: [Category; 4] = [
        Category::Size,
        Category::FrameType,
        Category::Accessory,
        Category::Addon,
    ];

    pub fn allows_multiple(self) -> bool {
        matches!(self, Category::Accessory | Category::Addon)
    }
}

/// Ordered option lists per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sizes: Vec<ProductOption>,
    pub colors: Vec<ProductOption>,
    pub frame_types: Vec<ProductOption>,
    pub frame_colors: Vec<ProductOption>,
    pub accessories: Vec<ProductOption>,
    pub addons: Vec<ProductOption>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The standard desk product line
    pub fn standard() -> Self {
        Self {
            sizes: vec![
                ProductOption::new("120x60", "120 x 60 cm", 0).valued("120x60"),
                ProductOption::new("140x70", "140 x 70 cm", 150).valued("140x70"),
                ProductOption::new("160x80", "160 x 80 cm", 300).valued("160x80"),
                ProductOption::new("custom", "Custom", CUSTOM_SIZE_SURCHARGE)
                    .valued("custom")
                    .described("Made-to-order footprint"),
            ],
            colors: vec![
                ProductOption::color("oak", "Natural oak", 0, "#C29A6E"),
                ProductOption::color("walnut", "Walnut", 50, "#5D4037"),
                ProductOption::color("white", "White", 0, "#F3F4F6"),
                ProductOption::color("black", "Black", 50, "#1F2937"),
            ],
            frame_types: vec![
                ProductOption::new("manual", "Manual frame", 0).described("Crank height adjustment"),
                ProductOption::new("electric", "Electric frame", 800)
                    .described("Smooth motorized height adjustment"),
                ProductOption::new("fixed", "Fixed frame", -200).described("Fixed 75 cm height"),
            ],
            frame_colors: vec![
                ProductOption::color("black", "Black", 0, "#1F2937"),
                ProductOption::color("white", "White", 0, "#F3F4F6"),
                ProductOption::color("silver", "Silver", 0, "#9CA3AF"),
            ],
            accessories: vec![
                ProductOption::new("grommet", "Cable grommet", 49).described("Round, left/right"),
                ProductOption::new("mediaport", "Media port", 199).described("2x USB, 1x 230V"),
                ProductOption::new("wireless_charger", "Wireless charger", 149)
                    .described("Built into the top"),
            ],
            addons: vec![
                ProductOption::new("cable_tray", "Cable tray", 89).described("Under-desk organizer"),
                ProductOption::new("drawer", "Under-desk drawer", 249).described("Discreet storage"),
            ],
        }
    }

    pub fn options(&self, category: Category) -> &[ProductOption] {
        match category {
            Category::Size => &self.sizes,
            Category::TopColor => &self.colors,
            Category::FrameType => &self.frame_types,
            Category::FrameColor => &self.frame_colors,
            Category::Accessory => &self.accessories,
            Category::Addon => &self.addons,
        }
    }

    pub fn find(&self, category: Category, id: &str) -> Option<&ProductOption> {
        self.options(category).iter().find(|o| o.id == id)
    }

    /// Label for an id, falling back to the id itself
    pub fn label<'a>(&'a self, category: Category, id: &'a str) -> &'a str {
        self.find(category, id).map(|o| o.label.as_str()).unwrap_or(id)
    }

    fn price_of(&self, category: Category, id: &str) -> i64 {
        self.find(category, id).map(|o| o.price).unwrap_or(0)
    }

    /// Price contribution of the size selection
    pub fn size_price(&self, config: &DeskConfig) -> i64 {
        match config.size {
            DeskSize::Custom => {
                let area = config.clamped_custom_width() * config.clamped_custom_depth();
                let area_factor = ((area - STANDARD_AREA) * CUSTOM_AREA_RATE).max(0.0);
                CUSTOM_SIZE_SURCHARGE + area_factor.round() as i64
            }
            size => self.price_of(Category::Size, &size.id()),
        }
    }

    /// Total price of a configuration; unknown ids contribute nothing
    pub fn total_price(&self, config: &DeskConfig) -> i64 {
        let mut total = BASE_PRICE + self.size_price(config);
        total += self.price_of(Category::TopColor, &config.top_color);
        total += self.price_of(Category::FrameType, &config.frame_type);
        total += self.price_of(Category::FrameColor, &config.frame_color);
        total += config
            .accessories
            .iter()
            .map(|id| self.price_of(Category::Accessory, id))
            .sum::<i64>();
        total += config
            .addons
            .iter()
            .map(|id| self.price_of(Category::Addon, id))
            .sum::<i64>();
        total
    }
}
