use serde::{Deserialize, Serialize};

/// Seat-count buckets offered by the add form, in display order
pub const SEAT_CHOICES: [&str; 5] = ["0-10", "10-20", "20-30", "30-40", "50+"];

/// A stored cafe record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cafe {
    /// Identifier assigned by the store on insertion
    pub id: i64,
    pub name: String,
    /// Link to the cafe on a map service
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    /// Power outlets available
    pub has_sockets: bool,
    pub has_toilet: bool,
    pub has_wifi: bool,
    /// Phone calls are acceptable
    pub can_take_calls: bool,
    /// Seat-count bucket, free text
    pub seats: String,
    /// Coffee price, free text
    pub coffee_price: String,
}

/// A cafe that has not been stored yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub has_sockets: bool,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub can_take_calls: bool,
    pub seats: String,
    pub coffee_price: String,
}

impl NewCafe {
    /// Attach the identifier the store assigned
    pub fn with_id(self, id: i64) -> Cafe {
        Cafe {
            id,
            name: self.name,
            map_url: self.map_url,
            img_url: self.img_url,
            location: self.location,
            has_sockets: self.has_sockets,
            has_toilet: self.has_toilet,
            has_wifi: self.has_wifi,
            can_take_calls: self.can_take_calls,
            seats: self.seats,
            coffee_price: self.coffee_price,
        }
    }
}

/// Whether `value` is one of the form's seat buckets
pub fn is_seat_choice(value: &str) -> bool {
    SEAT_CHOICES.contains(&value)
}
