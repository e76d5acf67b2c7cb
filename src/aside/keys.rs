//! Cache key namespace shared by all entity kinds.

/// `<kind>:<id>`
pub fn entity(kind: &str, id: i64) -> String {
    format!("{}:{}", kind, id)
}

/// `<kind>:all`
pub fn collection(kind: &str) -> String {
    format!("{}:all", kind)
}

/// `<kind>:<field>:<value>`
pub fn lookaside(kind: &str, field: &str, value: &str) -> String {
    format!("{}:{}:{}", kind, field, value)
}
