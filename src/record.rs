use serde::{Deserialize, Serialize};

/// A single delivery fixture as it appears in the input array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub postcode: String,
    #[serde(rename = "recipe")]
    pub recipe_name: String,
    #[serde(rename = "delivery")]
    pub delivery_window: String,
}

impl Record {
    pub fn new(
        postcode: impl Into<String>,
        recipe_name: impl Into<String>,
        delivery_window: impl Into<String>,
    ) -> Self {
        Self {
            postcode: postcode.into(),
            recipe_name: recipe_name.into(),
            delivery_window: delivery_window.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_fixture_field_names() {
        let record: Record = serde_json::from_str(
            r#"{"postcode":"10224","recipe":"Creamy Dill Chicken","delivery":"Wednesday 1AM - 7PM"}"#,
        )
        .unwrap();
        assert_eq!(record.postcode, "10224");
        assert_eq!(record.recipe_name, "Creamy Dill Chicken");
        assert_eq!(record.delivery_window, "Wednesday 1AM - 7PM");
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let record: Record = serde_json::from_str(
            r#"{"postcode":"1","recipe":"A","delivery":"9AM - 1PM","courier":"bike"}"#,
        )
        .unwrap();
        assert_eq!(record, Record::new("1", "A", "9AM - 1PM"));
    }

    #[test]
    fn test_record_requires_all_fields() {
        let result = serde_json::from_str::<Record>(r#"{"postcode":"1","recipe":"A"}"#);
        assert!(result.is_err());
    }
}
