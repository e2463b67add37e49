//! Admin-only product CRUD.

use crate::auth::CurrentUser;
use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::forms::admin::ProductFormPayload;
use crate::repository::{ProductListQuery, ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult};

fn ensure_admin(user: &CurrentUser) -> ServiceResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Full catalog in insertion order for the admin table.
pub fn list_products<R>(user: &CurrentUser, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    ensure_admin(user)?;
    match repo.list_products(ProductListQuery::default()) {
        Ok(products) => Ok(products),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Load one product for the edit/delete forms.
pub fn get_product<R>(
    product_id: ProductId,
    user: &CurrentUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: ProductReader,
{
    ensure_admin(user)?;
    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_product<R>(
    payload: ProductFormPayload,
    user: &CurrentUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: ProductWriter,
{
    ensure_admin(user)?;
    match repo.create_product(&payload.into_new_product()) {
        Ok(product) => Ok(product),
        Err(e) => {
            log::error!("Failed to create product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn update_product<R>(
    product_id: ProductId,
    payload: ProductFormPayload,
    user: &CurrentUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
{
    ensure_admin(user)?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load product {product_id}: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.update_product(product_id, &payload.into_new_product()) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a product. Products that appear on an order are protected by the
/// foreign key and reported back as a form-level message.
pub fn delete_product<R>(
    product_id: ProductId,
    user: &CurrentUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProductWriter,
{
    ensure_admin(user)?;
    match repo.delete_product(product_id) {
        Ok(_) => Ok(()),
        Err(e) if e.is_foreign_key_violation() => Err(ServiceError::Form(
            "Cannot delete a product that has been ordered.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to delete product {product_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DiscountPercent, Price, ProductName, Role};
    use crate::repository::test::TestRepository;
    use rust_decimal_macros::dec;

    fn admin() -> CurrentUser {
        CurrentUser {
            id: 1,
            name: "Admin".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
        }
    }

    fn customer() -> CurrentUser {
        CurrentUser {
            id: 2,
            name: "Customer".into(),
            email: "c@example.com".into(),
            role: Role::Customer,
        }
    }

    fn payload(price: rust_decimal::Decimal, pct: Option<rust_decimal::Decimal>) -> ProductFormPayload {
        ProductFormPayload {
            name: ProductName::new("Webcam").unwrap(),
            description: None,
            price: Price::new(price).unwrap(),
            discount_percent: pct.map(|p| DiscountPercent::new(p).unwrap()),
            stock_qty: 3,
            image_url: None,
        }
    }

    #[test]
    fn non_admins_are_rejected() {
        let repo = TestRepository::new(vec![], vec![]);
        assert_eq!(
            create_product(payload(dec!(10), None), &customer(), &repo).unwrap_err(),
            ServiceError::Forbidden
        );
        assert_eq!(
            list_products(&customer(), &repo).unwrap_err(),
            ServiceError::Forbidden
        );
    }

    #[test]
    fn create_derives_discounted_price() {
        let repo = TestRepository::new(vec![], vec![]);
        let product =
            create_product(payload(dec!(200), Some(dec!(25))), &admin(), &repo).unwrap();
        assert_eq!(product.discounted_price.unwrap().get(), dec!(150.00));
        assert_eq!(product.effective_unit_price(), dec!(150.00));
    }

    #[test]
    fn update_recomputes_discounted_price() {
        let repo = TestRepository::new(vec![], vec![]);
        let product =
            create_product(payload(dec!(200), Some(dec!(25))), &admin(), &repo).unwrap();

        // price drops, discount stays: stored discounted price must follow
        update_product(product.id, payload(dec!(100), Some(dec!(25))), &admin(), &repo)
            .unwrap();

        let updated = get_product(product.id, &admin(), &repo).unwrap();
        assert_eq!(updated.price.get(), dec!(100));
        assert_eq!(updated.discounted_price.unwrap().get(), dec!(75.00));
    }

    #[test]
    fn update_of_missing_product_is_not_found() {
        let repo = TestRepository::new(vec![], vec![]);
        assert_eq!(
            update_product(
                ProductId::new(9).unwrap(),
                payload(dec!(10), None),
                &admin(),
                &repo
            )
            .unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn delete_removes_the_product() {
        let repo = TestRepository::new(vec![], vec![]);
        let product = create_product(payload(dec!(10), None), &admin(), &repo).unwrap();
        delete_product(product.id, &admin(), &repo).unwrap();
        assert!(repo.products().is_empty());
    }
}
