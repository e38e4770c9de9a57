use serde::Serialize;

/// Static identity of a circuit in the catalog.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CircuitIdentity {
    pub id: &'static str,
    pub name: &'static str,
    pub location: &'static str,
    pub country: &'static str,
    pub length_km: f64,
    pub corners: u32,
    pub image_ref: &'static str,
}

impl CircuitIdentity {
    /// True when `key` is either the catalog id or the display name.
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.name == key
    }

    /// Case-insensitive substring match on name or country.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.country.to_lowercase().contains(&needle)
    }

    /// First word of the display name, used for compact chart labels.
    pub fn short_name(&self) -> &'static str {
        self.name.split(' ').next().unwrap_or(self.name)
    }
}
