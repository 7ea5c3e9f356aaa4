use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use uuid::Uuid;

/// Activity categories. Ids are stable and travel on the wire in place of
/// the variant name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    Food,
    Exercise,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Food, Category::Exercise];

    pub fn id(self) -> u8 {
        match self {
            Category::Food => 1,
            Category::Exercise => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Category> {
        match id {
            1 => Some(Category::Food),
            2 => Some(Category::Exercise),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Exercise => "Exercise",
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.id())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = u8::deserialize(deserializer)?;
        Category::from_id(id).ok_or_else(|| de::Error::custom(format!("unknown category id: {id}")))
    }
}

/// A single tracked entry. The id is assigned at draft creation and never
/// changes afterwards.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub category: Category,
    pub name: String,
    pub calories: u32,
}

impl Activity {
    /// Fresh, empty record with a newly generated id.
    pub fn draft() -> Self {
        Self {
            id: Uuid::new_v4(),
            category: Category::default(),
            name: String::new(),
            calories: 0,
        }
    }
}
