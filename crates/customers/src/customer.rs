use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use clientele_core::CustomerId;

/// Customer record.
///
/// `id` is supplied by the caller on create and never changes afterwards.
/// `birthday` is a calendar date and serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub birthday: NaiveDate,
}

/// Mutable fields of a customer (everything except `id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub birthday: NaiveDate,
}

impl Customer {
    /// Replace every mutable field; `id` is left untouched.
    pub fn apply(&mut self, details: CustomerDetails) {
        self.name = details.name;
        self.address = details.address;
        self.phone = details.phone;
        self.birthday = details.birthday;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> Customer {
        Customer {
            id: CustomerId::new(1),
            name: "John Doe".to_string(),
            address: "123 Main St".to_string(),
            phone: "555-1234".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        }
    }

    #[test]
    fn json_shape_uses_plain_date() {
        let value = serde_json::to_value(john()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "name": "John Doe",
                "address": "123 Main St",
                "phone": "555-1234",
                "birthday": "1990-01-01",
            })
        );
    }

    #[test]
    fn datetime_birthday_is_rejected() {
        let raw = r#"{"id":1,"name":"a","address":"b","phone":"c","birthday":"1990-01-01T00:00:00"}"#;
        assert!(serde_json::from_str::<Customer>(raw).is_err());
    }

    #[test]
    fn apply_replaces_mutable_fields_and_keeps_id() {
        let mut customer = john();
        customer.apply(CustomerDetails {
            name: "Updated Name".to_string(),
            address: "Updated Address".to_string(),
            phone: "Updated Phone".to_string(),
            birthday: NaiveDate::from_ymd_opt(1991, 2, 3).unwrap(),
        });

        assert_eq!(customer.id, CustomerId::new(1));
        assert_eq!(customer.name, "Updated Name");
        assert_eq!(customer.address, "Updated Address");
        assert_eq!(customer.phone, "Updated Phone");
        assert_eq!(customer.birthday, NaiveDate::from_ymd_opt(1991, 2, 3).unwrap());
    }
}
