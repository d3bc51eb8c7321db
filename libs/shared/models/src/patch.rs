use serde::{Deserialize, Deserializer};

/// Deserializer for partial-update fields that may be cleared.
///
/// Combined with `#[serde(default)]`, an absent key stays `None`, an explicit
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        driver: Option<Option<i64>>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"driver": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"driver": 7}"#).unwrap();

        assert_eq!(absent.driver, None);
        assert_eq!(cleared.driver, Some(None));
        assert_eq!(set.driver, Some(Some(7)));
    }
}
