use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod content;
pub mod delivery;
pub mod menu;
pub mod orders;
pub mod promo_codes;
pub mod settings;

/// With `#[serde(default)]`: absent key -> `None`, `null` -> `Some(None)`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::settings::UpdateSettingsRequest;

    #[test]
    fn nullable_distinguishes_null_from_absent() {
        let absent: UpdateSettingsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.delivery_cost_fallback, None);

        let cleared: UpdateSettingsRequest =
            serde_json::from_str(r#"{"delivery_cost_fallback": null}"#).unwrap();
        assert_eq!(cleared.delivery_cost_fallback, Some(None));

        let set: UpdateSettingsRequest =
            serde_json::from_str(r#"{"delivery_cost_fallback": 900}"#).unwrap();
        assert_eq!(set.delivery_cost_fallback, Some(Some(900)));
    }
}
