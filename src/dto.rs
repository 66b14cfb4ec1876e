//! Data Transfer Objects.
//!
//! Request and response shapes exchanged over HTTP. Field names are the
//! wire contract and are serialized in camelCase. Shape checks (lengths,
//! email format) live here as `validator` rules; entity invariants are
//! checked again when the entity is built.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::id::{SemesterId, SpecializationId, UserId};
use crate::model::{User, Wallet};

/// Body to create or update a blockchain activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityDto {
    #[validate(length(min = 1, max = 100, message = "Name must contain 1 to 100 characters."))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description is too long."))]
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub reward_amount: Decimal,
    pub is_active: bool,
}

/// Academic term, as sent and received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SemesterDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SemesterId>,
    #[validate(length(min = 1, max = 100, message = "Name must contain 1 to 100 characters."))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, max = 20, message = "School year must contain 1 to 20 characters."))]
    pub school_year: String,
    pub is_active: bool,
}

/// Staff account provisioning request.
///
/// The password is plaintext on input only: it is hashed before storage,
/// wiped from memory on drop and redacted from `Debug`.
#[derive(Clone, Serialize, Deserialize, Validate, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffDto {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Full name must contain 1 to 100 characters."))]
    pub full_name: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: String,
}

impl fmt::Debug for CreateStaffDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateStaffDto")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Catalog item, as sent and received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[validate(length(min = 1, max = 100, message = "Name must contain 1 to 100 characters."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Description is too long."))]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    #[validate(length(max = 2048, message = "Image reference is too long."))]
    pub image_url: Option<String>,
}

/// Session issued after a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expiration: DateTime<Utc>,
    pub user: User,
    pub wallet: Wallet,
}

/// Credentials for `POST /login`.
#[derive(Clone, Serialize, Deserialize, Validate, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(min = 1, message = "Missing password."))]
    pub password: String,
}

impl fmt::Debug for LoginDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginDto")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpecializationDto {
    #[validate(length(min = 1, max = 16, message = "Major code must contain 1 to 16 characters."))]
    pub major_code: String,
    #[validate(length(min = 1, max = 100, message = "Name must contain 1 to 100 characters."))]
    pub name: String,
}

/// Moves a user into a specialization; `null` removes the assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignSpecializationDto {
    #[serde(default)]
    pub specialization_id: Option<SpecializationId>,
}

/// Designates the user a reward or a redemption applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserRefDto {
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use serde::de::DeserializeOwned;
    use serde_json::json;

    use super::*;
    use crate::clock::SystemClock;
    use crate::id::SequentialIds;
    use crate::model::Role;

    fn round_trip<T>(value: &T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let text = serde_json::to_string(value).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_activity_wire_names() {
        let dto: UpdateActivityDto = serde_json::from_value(json!({
            "name": "Attend seminar",
            "description": "Join the blockchain seminar.",
            "rewardAmount": "12.500",
            "isActive": true,
        }))
        .unwrap();

        assert_eq!(dto.reward_amount, Decimal::new(12500, 3));
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["rewardAmount"], "12.500");
        assert_eq!(json["isActive"], true);
        assert_eq!(round_trip(&dto), dto);
    }

    #[test]
    fn test_semester_round_trip() {
        let dto = SemesterDto {
            id: None,
            name: "Fall 2024".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
            school_year: "2024-2025".into(),
            is_active: true,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["startDate"], "2024-09-01");
        assert_eq!(json["schoolYear"], "2024-2025");
        assert!(json.get("id").is_none());
        assert_eq!(round_trip(&dto), dto);

        let with_id = SemesterDto {
            id: Some(SemesterId::generate(&SequentialIds::new())),
            ..dto
        };
        assert_eq!(round_trip(&with_id), with_id);
    }

    #[test]
    fn test_semester_validation() {
        let dto = SemesterDto {
            id: None,
            name: String::new(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
            school_year: "2024-2025".into(),
            is_active: false,
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_staff_round_trip_and_redaction() {
        let dto = CreateStaffDto {
            email: "grace@school.edu".into(),
            full_name: "Grace Hopper".into(),
            password: "C0b0l-is-fine".into(),
        };

        let back = round_trip(&dto);
        assert_eq!(back.email, dto.email);
        assert_eq!(back.full_name, dto.full_name);
        assert_eq!(back.password, dto.password);
        assert!(!format!("{dto:?}").contains("C0b0l"));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_staff_validation() {
        let dto = CreateStaffDto {
            email: "grace".into(),
            full_name: "Grace Hopper".into(),
            password: "short".into(),
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_product_round_trip() {
        let dto = ProductDto {
            name: "Hoodie".into(),
            description: Some("School hoodie".into()),
            price: Decimal::new(4999, 2),
            stock: 12,
            image_url: None,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["price"], "49.99");
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
        assert_eq!(round_trip(&dto), dto);

        let minimal: ProductDto = serde_json::from_value(json!({
            "name": "Sticker",
            "price": "0",
            "stock": 0,
        }))
        .unwrap();
        assert!(minimal.description.is_none());
        assert!(minimal.image_url.is_none());
    }

    #[test]
    fn test_auth_response_round_trip() {
        let ids = SequentialIds::new();
        let user = User::new(&ids, &SystemClock, "ada@school.edu", "Ada", Role::Student, "$argon2id$x".into())
            .unwrap();
        let wallet = Wallet::open(&ids, &SystemClock, user.id());
        let response = AuthResponse {
            token: "abcd".into(),
            expiration: Utc::now(),
            user,
            wallet,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("expiration").is_some());
        assert_eq!(json["wallet"]["balance"], "0");

        let back = round_trip(&response);
        assert_eq!(back, response);
        assert_eq!(back.user.email(), "ada@school.edu");
        assert_eq!(back.wallet.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_assign_specialization_accepts_null() {
        let dto: AssignSpecializationDto =
            serde_json::from_value(json!({ "specializationId": null })).unwrap();
        assert!(dto.specialization_id.is_none());
        let dto: AssignSpecializationDto = serde_json::from_value(json!({})).unwrap();
        assert!(dto.specialization_id.is_none());
    }
}
