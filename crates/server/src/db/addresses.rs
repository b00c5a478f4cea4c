//! Address repository.

use chrono::Utc;
use sqlx::SqlitePool;

use trikart_core::{AddressId, City, UserId};

use super::RepositoryError;
use crate::models::Address;

/// Fields for inserting or replacing an address.
#[derive(Debug)]
pub struct NewAddress<'a> {
    pub label: &'a str,
    pub house: &'a str,
    pub street: &'a str,
    pub landmark: Option<&'a str>,
    pub line2: Option<&'a str>,
    pub city: City,
}

/// Repository for delivery addresses.
///
/// Every operation is scoped to the owning user; a row belonging to
/// someone else behaves exactly like a missing row.
pub struct AddressRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an address for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn create(
        &self,
        user_id: UserId,
        address: &NewAddress<'_>,
    ) -> Result<Address, RepositoryError> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Address>(
            "INSERT INTO addresses (user_id, label, house, street, landmark, line2, city, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id, user_id, label, house, street, landmark, line2, city, created_at, updated_at",
        )
        .bind(user_id)
        .bind(address.label)
        .bind(address.house)
        .bind(address.street)
        .bind(address.landmark)
        .bind(address.line2)
        .bind(address.city)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// List a user's addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT id, user_id, label, house, street, landmark, line2, city, created_at, updated_at
             FROM addresses WHERE user_id = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(addresses)
    }

    /// Fetch one address if it exists and belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn get_for_user(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(
            "SELECT id, user_id, label, house, street, landmark, line2, city, created_at, updated_at
             FROM addresses WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }

    /// Replace an address's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist
    /// or belongs to another user.
    pub async fn update(
        &self,
        id: AddressId,
        user_id: UserId,
        address: &NewAddress<'_>,
    ) -> Result<Address, RepositoryError> {
        let updated = sqlx::query_as::<_, Address>(
            "UPDATE addresses
             SET label = ?, house = ?, street = ?, landmark = ?, line2 = ?, city = ?, updated_at = ?
             WHERE id = ? AND user_id = ?
             RETURNING id, user_id, label, house, street, landmark, line2, city, created_at, updated_at",
        )
        .bind(address.label)
        .bind(address.house)
        .bind(address.street)
        .bind(address.landmark)
        .bind(address.line2)
        .bind(address.city)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(updated)
    }

    /// Delete an address unless an order still references it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist
    /// or belongs to another user, and `RepositoryError::Conflict` if any
    /// order references it.
    pub async fn delete(&self, id: AddressId, user_id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<i64> =
            sqlx::query_scalar("SELECT id FROM addresses WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        if owned.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let order_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE address_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if order_count > 0 {
            return Err(RepositoryError::Conflict(
                "Address is used by existing orders and cannot be deleted".to_owned(),
            ));
        }

        sqlx::query("DELETE FROM addresses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::db::users::{NewUser, UserRepository};
    use trikart_core::{Email, Role};

    async fn seed_user(pool: &SqlitePool, email: &str) -> UserId {
        let email = Email::parse(email).unwrap();
        UserRepository::new(pool)
            .create(NewUser {
                name: "Addr Tester",
                phone: "9800000000",
                email: &email,
                password_hash: "x",
                city: City::Chandigarh,
                role: Role::User,
            })
            .await
            .unwrap()
            .id
    }

    fn home() -> NewAddress<'static> {
        NewAddress {
            label: "Home",
            house: "1203",
            street: "Sector 22B",
            landmark: Some("Near Rose Garden"),
            line2: None,
            city: City::Chandigarh,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "a@example.com").await;
        let repo = AddressRepository::new(&pool);

        let created = repo.create(user_id, &home()).await.unwrap();
        assert_eq!(created.label, "Home");
        assert_eq!(created.landmark.as_deref(), Some("Near Rose Garden"));

        let listed = repo.list_for_user(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn test_other_users_address_is_invisible() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let stranger = seed_user(&pool, "stranger@example.com").await;
        let repo = AddressRepository::new(&pool);

        let created = repo.create(owner, &home()).await.unwrap();

        let fetched = repo.get_for_user(created.id, stranger).await.unwrap();
        assert!(fetched.is_none());

        let update = repo.update(created.id, stranger, &home()).await;
        assert!(matches!(update, Err(RepositoryError::NotFound)));

        let delete = repo.delete(created.id, stranger).await;
        assert!(matches!(delete, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "u@example.com").await;
        let repo = AddressRepository::new(&pool);
        let created = repo.create(user_id, &home()).await.unwrap();

        let updated = repo
            .update(
                created.id,
                user_id,
                &NewAddress {
                    label: "Office",
                    house: "SCO 17",
                    street: "Phase 7 Industrial Area",
                    landmark: None,
                    line2: Some("2nd floor"),
                    city: City::Mohali,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.label, "Office");
        assert_eq!(updated.city, City::Mohali);
        assert!(updated.landmark.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "d@example.com").await;
        let repo = AddressRepository::new(&pool);
        let created = repo.create(user_id, &home()).await.unwrap();

        repo.delete(created.id, user_id).await.unwrap();
        assert!(repo.list_for_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_referenced_by_order_is_conflict() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "ref@example.com").await;
        let repo = AddressRepository::new(&pool);
        let created = repo.create(user_id, &home()).await.unwrap();

        sqlx::query(
            "INSERT INTO orders (user_id, address_id, status, payment_method, subtotal, delivery_fee, tax, total)
             VALUES (?, ?, 'pending', 'cod', '200', '99', '36', '335')",
        )
        .bind(user_id)
        .bind(created.id)
        .execute(&pool)
        .await
        .unwrap();

        let result = repo.delete(created.id, user_id).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }
}
