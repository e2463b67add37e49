//! Public catalog pages: listing, detail and the home-page product blocks.

use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::repository::{ProductListQuery, ProductReader};

use super::{ServiceError, ServiceResult};

/// Product blocks rendered on the home page.
#[derive(Debug, Clone)]
pub struct HomePage {
    /// Four oldest products.
    pub flash_sales: Vec<Product>,
    /// Four most-reviewed products.
    pub best_sellers: Vec<Product>,
    /// Eight products after the first four, in catalog order.
    pub explore: Vec<Product>,
    /// Three newest products.
    pub new_arrivals: Vec<Product>,
}

fn list<R>(query: ProductListQuery, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    match repo.list_products(query) {
        Ok(products) => Ok(products),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// All products, newest first.
pub fn show_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    list(ProductListQuery::default().newest_first(), repo)
}

/// One product plus the four newest others as related items.
pub fn show_product<R>(product_id: ProductId, repo: &R) -> ServiceResult<(Product, Vec<Product>)>
where
    R: ProductReader,
{
    let product = match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load product {product_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let related = list(
        ProductListQuery::default()
            .newest_first()
            .exclude(product_id)
            .take(4),
        repo,
    )?;

    Ok((product, related))
}

/// The home page product blocks.
pub fn show_home<R>(repo: &R) -> ServiceResult<HomePage>
where
    R: ProductReader,
{
    Ok(HomePage {
        flash_sales: list(ProductListQuery::default().oldest_first().take(4), repo)?,
        best_sellers: list(ProductListQuery::default().most_reviewed().take(4), repo)?,
        explore: list(ProductListQuery::default().skip(4).take(8), repo)?,
        new_arrivals: list(ProductListQuery::default().newest_first().take(3), repo)?,
    })
}

/// "Just for you" block on the wishlist page: the four newest products.
pub fn just_for_you<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    list(ProductListQuery::default().newest_first().take(4), repo)
}
