use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "discount_type")]
pub enum DiscountType {
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "percentage")]
    Percentage,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discount_code")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Stored uppercase; lookups uppercase the input first
    #[sea_orm(unique)]
    pub code: String,
    pub discount_type: DiscountType,
    pub value: i64,
    pub is_active: bool,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| exp.with_timezone(&Utc) < Utc::now())
            .unwrap_or(false)
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .map(|limit| self.used_count >= limit)
            .unwrap_or(false)
    }

    /// Redeemable: active, not past its expiry, and not used up.
    pub fn is_valid(&self) -> bool {
        self.is_active && !self.is_expired() && !self.is_exhausted()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn code(is_active: bool, usage_limit: Option<i32>, used_count: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            code: "WELCOME10".to_string(),
            discount_type: DiscountType::Percentage,
            value: 10,
            is_active,
            usage_limit,
            used_count,
            expires_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_active_unlimited_code_is_valid() {
        assert!(code(true, None, 1000).is_valid());
    }

    #[test]
    fn test_inactive_code_is_invalid() {
        assert!(!code(false, None, 0).is_valid());
    }

    #[test]
    fn test_exhausted_code_is_invalid() {
        let c = code(true, Some(5), 5);
        assert!(c.is_exhausted());
        assert!(!c.is_valid());

        let c = code(true, Some(5), 4);
        assert!(!c.is_exhausted());
        assert!(c.is_valid());
    }

    #[test]
    fn test_expired_code_is_invalid() {
        let mut c = code(true, None, 0);
        c.expires_at = Some((Utc::now() - Duration::days(1)).into());
        assert!(c.is_expired());
        assert!(!c.is_valid());

        c.expires_at = Some((Utc::now() + Duration::days(1)).into());
        assert!(!c.is_expired());
        assert!(c.is_valid());
    }
}
