use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use uuid::Uuid;

/// A catalog product, owned by the product store and read-only for the
/// recommendation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Price in minor currency units (cents)
    pub price: i64,
    pub discount_price: i64,
    pub category_id: Uuid,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single scored recommendation produced by one generation cycle
///
/// Never persisted by the core itself; the cache layer stores the full list
/// as an opaque TTL-bounded JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: Uuid,
    /// Higher = more relevant, comparable across generators
    pub score: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub reason_details: HashMap<String, serde_json::Value>,
}

impl Recommendation {
    pub fn new(product_id: Uuid, score: f64, reason: impl Into<String>) -> Self {
        Self {
            product_id,
            score,
            reason: reason.into(),
            reason_details: HashMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.reason_details.insert(key.into(), value);
        self
    }
}

/// Append-only user activity event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserInteraction {
    pub id: i64,
    pub user_id: i64,
    pub product_id: Uuid,
    pub action_type: ActionType,
    pub weight: i64,
    pub timestamp: DateTime<Utc>,
}

/// Kind of user activity, each carrying a fixed importance weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ActionType {
    View,
    Wishlist,
    Cart,
    Purchase,
    Review,
    /// Catch-all for action strings this build does not recognize
    #[serde(other)]
    Unknown,
}

impl ActionType {
    /// Importance weight used when aggregating interaction signals
    pub fn weight(&self) -> i64 {
        match self {
            ActionType::View => 1,
            ActionType::Wishlist => 10,
            ActionType::Cart => 5,
            ActionType::Purchase => 50,
            ActionType::Review => 15,
            ActionType::Unknown => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSegment {
    HighValue,
    Browser,
    WishlistCollector,
    NewUser,
    Vip,
}

/// Point-in-time contextual snapshot conditioning a generation cycle
///
/// Derived, never persisted; recomputed on every cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub timestamp: DateTime<Utc>,
    pub season: Season,
    pub time_of_day: TimeOfDay,
    pub day_of_week: String,
    pub region: String,
    pub device: DeviceType,
    pub user_segment: UserSegment,
    pub is_holiday: bool,
}

/// Aggregate view of a user, maintained by the profile store
///
/// Consumed by segmentation once it is wired into generation; the core never
/// mutates it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub total_purchases: i64,
    pub total_spent: f64,
    pub favorite_categories: Vec<String>,
    pub segment: UserSegment,
    pub last_interaction_at: DateTime<Utc>,
}
