//! Household registry business logic.
//!
//! Provides functions for creating, retrieving, updating, and deleting
//! households. House codes are unique; a collision surfaces as
//! [`Error::DuplicateHouseCode`] rather than a raw store error. Deleting a
//! household cascades to its payment rows at the store level.

use crate::{
    entities::{Household, household},
    errors::{Error, Result},
    session::Session,
};
use sea_orm::{Condition, QueryOrder, Set, SqlErr, prelude::*};
use tracing::info;

const STATUS_ACTIVE: &str = "active";
const STATUS_INACTIVE: &str = "inactive";

/// Input for creating or updating a household.
#[derive(Debug, Clone)]
pub struct HouseholdInput {
    /// Unique house number/code
    pub house_code: String,
    /// Name of the head of household
    pub head_name: String,
    /// Number of household members
    pub member_count: i32,
    /// Contact phone number
    pub phone: Option<String>,
    /// Contact email address
    pub email: Option<String>,
    /// Date the household joined the community
    pub joined_on: Date,
    /// `"active"` or `"inactive"`
    pub status: String,
}

fn validate_input(input: &HouseholdInput) -> Result<()> {
    if input.house_code.trim().is_empty() {
        return Err(Error::Validation {
            message: "house code cannot be empty".to_string(),
        });
    }
    if input.head_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "head of household name cannot be empty".to_string(),
        });
    }
    if input.member_count < 1 {
        return Err(Error::Validation {
            message: format!("member count must be at least 1, got {}", input.member_count),
        });
    }
    if input.status != STATUS_ACTIVE && input.status != STATUS_INACTIVE {
        return Err(Error::Validation {
            message: format!("unknown household status '{}'", input.status),
        });
    }
    Ok(())
}

/// Creates a new household. Admin only.
///
/// # Errors
/// `DuplicateHouseCode` when the house code is already registered;
/// `Validation` for empty names or a member count below 1.
pub async fn create_household(
    db: &DatabaseConnection,
    session: &Session,
    input: HouseholdInput,
) -> Result<household::Model> {
    session.require_admin()?;
    validate_input(&input)?;

    let household = household::ActiveModel {
        house_code: Set(input.house_code.trim().to_string()),
        head_name: Set(input.head_name.trim().to_string()),
        member_count: Set(input.member_count),
        phone: Set(input.phone),
        email: Set(input.email),
        joined_on: Set(input.joined_on),
        status: Set(input.status),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match household.insert(db).await {
        Ok(model) => {
            info!(house_code = %model.house_code, "registered household");
            Ok(model)
        }
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(Error::DuplicateHouseCode {
                code: input.house_code.trim().to_string(),
            }),
            _ => Err(err.into()),
        },
    }
}

/// Rewrites every editable field of an existing household. Admin only.
pub async fn update_household(
    db: &DatabaseConnection,
    session: &Session,
    household_id: i64,
    input: HouseholdInput,
) -> Result<household::Model> {
    session.require_admin()?;
    validate_input(&input)?;

    let existing = Household::find_by_id(household_id)
        .one(db)
        .await?
        .ok_or(Error::HouseholdNotFound { id: household_id })?;

    let mut active: household::ActiveModel = existing.into();
    active.house_code = Set(input.house_code.trim().to_string());
    active.head_name = Set(input.head_name.trim().to_string());
    active.member_count = Set(input.member_count);
    active.phone = Set(input.phone);
    active.email = Set(input.email);
    active.joined_on = Set(input.joined_on);
    active.status = Set(input.status);

    match active.update(db).await {
        Ok(model) => Ok(model),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(Error::DuplicateHouseCode {
                code: input.house_code.trim().to_string(),
            }),
            _ => Err(err.into()),
        },
    }
}

/// Deletes a household; its payment rows go with it via the cascade.
/// Admin only.
pub async fn delete_household(
    db: &DatabaseConnection,
    session: &Session,
    household_id: i64,
) -> Result<()> {
    session.require_admin()?;

    let result = Household::delete_by_id(household_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::HouseholdNotFound { id: household_id });
    }
    info!(household_id, "deleted household and its payments");
    Ok(())
}

/// Finds a household by its unique ID.
pub async fn get_household_by_id(
    db: &DatabaseConnection,
    household_id: i64,
) -> Result<Option<household::Model>> {
    Household::find_by_id(household_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves households ordered by house code, optionally restricted to
/// active ones.
pub async fn get_all_households(
    db: &DatabaseConnection,
    active_only: bool,
) -> Result<Vec<household::Model>> {
    let mut query = Household::find().order_by_asc(household::Column::HouseCode);
    if active_only {
        query = query.filter(household::Column::Status.eq(STATUS_ACTIVE));
    }
    query.all(db).await.map_err(Into::into)
}

/// Keyword search over house code and head-of-household name.
pub async fn search_households(
    db: &DatabaseConnection,
    keyword: &str,
) -> Result<Vec<household::Model>> {
    if keyword.trim().is_empty() {
        return get_all_households(db, true).await;
    }

    Household::find()
        .filter(
            Condition::any()
                .add(household::Column::HouseCode.contains(keyword.trim()))
                .add(household::Column::HeadName.contains(keyword.trim())),
        )
        .order_by_asc(household::Column::HouseCode)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_household_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let session = admin_session();

        let mut input = test_household_input("A-01");
        input.house_code = String::new();
        let result = create_household(&db, &session, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut input = test_household_input("A-01");
        input.head_name = "   ".to_string();
        let result = create_household(&db, &session, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut input = test_household_input("A-01");
        input.member_count = 0;
        let result = create_household(&db, &session, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut input = test_household_input("A-01");
        input.status = "dormant".to_string();
        let result = create_household(&db, &session, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_household_requires_admin() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let result = create_household(&db, &user_session(), test_household_input("A-01")).await;
        assert!(matches!(result, Err(Error::AdminRequired)));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_house_code_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let session = admin_session();

        create_household(&db, &session, test_household_input("A-01")).await?;
        let result = create_household(&db, &session, test_household_input("A-01")).await;

        assert!(matches!(
            result,
            Err(Error::DuplicateHouseCode { code }) if code == "A-01"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_household_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let session = admin_session();
        let household = create_test_household(&db, "A-01").await?;

        let mut input = test_household_input("A-01");
        input.head_name = "New Head".to_string();
        input.member_count = 5;
        input.status = "inactive".to_string();
        let updated = update_household(&db, &session, household.id, input).await?;

        assert_eq!(updated.head_name, "New Head");
        assert_eq!(updated.member_count, 5);
        assert_eq!(updated.status, "inactive");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_household() -> Result<()> {
        let db = setup_test_db().await?;
        let result =
            update_household(&db, &admin_session(), 999, test_household_input("Z-99")).await;
        assert!(matches!(result, Err(Error::HouseholdNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_household() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_household(&db, &admin_session(), 999).await;
        assert!(matches!(result, Err(Error::HouseholdNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_active_only_listing() -> Result<()> {
        let db = setup_test_db().await?;
        let session = admin_session();

        create_test_household(&db, "A-01").await?;
        let mut inactive = test_household_input("A-02");
        inactive.status = "inactive".to_string();
        create_household(&db, &session, inactive).await?;

        let active = get_all_households(&db, true).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].house_code, "A-01");

        let all = get_all_households(&db, false).await?;
        assert_eq!(all.len(), 2);
        // Ordered by house code
        assert_eq!(all[0].house_code, "A-01");
        assert_eq!(all[1].house_code, "A-02");
        Ok(())
    }

    #[tokio::test]
    async fn test_search_matches_code_and_name() -> Result<()> {
        let db = setup_test_db().await?;
        let session = admin_session();

        let mut input = test_household_input("A-01");
        input.head_name = "Siti Rahayu".to_string();
        create_household(&db, &session, input).await?;
        create_test_household(&db, "B-07").await?;

        let by_code = search_households(&db, "B-0").await?;
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].house_code, "B-07");

        let by_name = search_households(&db, "Rahayu").await?;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].house_code, "A-01");
        Ok(())
    }
}
