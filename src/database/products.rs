//! Product catalog and redemptions.

use crate::database::Database;
use crate::dto::ProductDto;
use crate::id::{ProductId, UserId};
use crate::model::{DomainError, Product, Result, Wallet};

impl Database {
    pub async fn insert_product(&self, product: Product) -> Result<Product> {
        self.tables
            .write()
            .await
            .products
            .insert(product.id(), product.clone());
        Ok(product)
    }

    /// All products, ordered by name.
    pub async fn products(&self) -> Vec<Product> {
        let mut list = self
            .tables
            .read()
            .await
            .products
            .values()
            .cloned()
            .collect::<Vec<_>>();
        list.sort_by(|a, b| a.name().cmp(b.name()));
        list
    }

    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        self.tables
            .read()
            .await
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    pub async fn update_product(
        &self,
        id: &ProductId,
        body: &ProductDto,
    ) -> Result<Product> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("product", id))?;

        product.update(body)?;
        Ok(product.clone())
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.tables
            .write()
            .await
            .products
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    /// Exchange one unit of a product against its price.
    ///
    /// Either both the stock and the wallet change, or neither does.
    pub async fn redeem_product(
        &self,
        id: &ProductId,
        user: &UserId,
    ) -> Result<Wallet> {
        let mut tables = self.tables.write().await;

        let mut product = tables
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", id))?;
        if !tables.users.contains_key(user) {
            return Err(DomainError::not_found("user", user));
        }
        let mut wallet = tables.wallet_mut(user)?.clone();

        product.take_stock(1)?;
        if !product.price().is_zero() {
            wallet.debit(product.price(), self.clock.as_ref())?;
        }

        tables.products.insert(product.id(), product.clone());
        *tables.wallet_mut(user)? = wallet.clone();

        tracing::info!(
            product_id = %id,
            user_id = %user,
            price = %product.price(),
            "product redeemed"
        );
        Ok(wallet)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::dto::UpdateActivityDto;
    use crate::clock::SystemClock;
    use crate::id::SequentialIds;
    use crate::model::{BlockchainActivity, Role, User};

    fn body(name: &str, price: i64, stock: i32) -> ProductDto {
        ProductDto {
            name: name.into(),
            description: None,
            price: Decimal::new(price, 0),
            stock,
            image_url: None,
        }
    }

    async fn funded_student(db: &Database, ids: &SequentialIds, amount: i64) -> User {
        let user = User::new(ids, &SystemClock, "a@school.edu", "Ada", Role::Student, String::new()).unwrap();
        let (user, _) = db.insert_user(ids, user).await.unwrap();
        let activity = db
            .insert_activity(
                BlockchainActivity::new(ids, &UpdateActivityDto {
                    name: "Quiz".into(),
                    description: String::new(),
                    reward_amount: Decimal::new(amount, 0),
                    is_active: true,
                })
                .unwrap(),
            )
            .await
            .unwrap();
        db.grant_reward(&activity.id(), &user.id()).await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_catalog() {
        let db = Database::new();
        let ids = SequentialIds::new();
        let mug = db.insert_product(Product::new(&ids, &body("Mug", 5, 10)).unwrap()).await.unwrap();
        db.insert_product(Product::new(&ids, &body("Cap", 8, 2)).unwrap()).await.unwrap();

        let names = db
            .products()
            .await
            .iter()
            .map(|p| p.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Cap", "Mug"]);

        let updated = db.update_product(&mug.id(), &body("Mug", 6, 9)).await.unwrap();
        assert_eq!(updated.price(), Decimal::new(6, 0));
        assert!(db.update_product(&mug.id(), &body("Mug", -1, 9)).await.is_err());
        assert_eq!(db.product(&mug.id()).await.unwrap().price(), Decimal::new(6, 0));

        db.delete_product(&mug.id()).await.unwrap();
        assert!(db.product(&mug.id()).await.is_err());
    }

    #[tokio::test]
    async fn test_redeem() {
        let db = Database::new();
        let ids = SequentialIds::new();
        let user = funded_student(&db, &ids, 10).await;
        let mug = db.insert_product(Product::new(&ids, &body("Mug", 4, 1)).unwrap()).await.unwrap();

        let wallet = db.redeem_product(&mug.id(), &user.id()).await.unwrap();
        assert_eq!(wallet.balance(), Decimal::new(6, 0));
        assert_eq!(db.product(&mug.id()).await.unwrap().stock(), 0);

        assert!(matches!(
            db.redeem_product(&mug.id(), &user.id()).await,
            Err(DomainError::Validation { field: "stock", .. })
        ));
    }

    #[tokio::test]
    async fn test_redeem_free_product() {
        let db = Database::new();
        let ids = SequentialIds::new();
        let user = User::new(&ids, &SystemClock, "a@school.edu", "Ada", Role::Student, String::new()).unwrap();
        let (user, _) = db.insert_user(&ids, user).await.unwrap();
        let sticker = db.insert_product(Product::new(&ids, &body("Sticker", 0, 5)).unwrap()).await.unwrap();

        let wallet = db.redeem_product(&sticker.id(), &user.id()).await.unwrap();
        assert_eq!(wallet.balance(), Decimal::ZERO);
        assert_eq!(db.product(&sticker.id()).await.unwrap().stock(), 4);
    }

    #[tokio::test]
    async fn test_redeem_insufficient_balance_changes_nothing() {
        let db = Database::new();
        let ids = SequentialIds::new();
        let user = funded_student(&db, &ids, 3).await;
        let cap = db.insert_product(Product::new(&ids, &body("Cap", 8, 2)).unwrap()).await.unwrap();

        assert!(matches!(
            db.redeem_product(&cap.id(), &user.id()).await,
            Err(DomainError::Validation { field: "balance", .. })
        ));
        assert_eq!(db.product(&cap.id()).await.unwrap().stock(), 2);
        assert_eq!(
            db.wallet_of(&user.id()).await.unwrap().balance(),
            Decimal::new(3, 0)
        );
    }
}
