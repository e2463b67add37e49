use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product};
use crate::domain::types::ProductId;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductOrder, ProductReader, ProductWriter,
    RepositoryResult,
};

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(exclude) = query.exclude {
            items = items.filter(products::id.ne(exclude.get()));
        }

        items = match query.order {
            ProductOrder::IdAsc => items.order(products::id.asc()),
            ProductOrder::NewestFirst => items.order(products::created_at.desc()),
            ProductOrder::OldestFirst => items.order(products::created_at.asc()),
            ProductOrder::MostReviewed => items.order(products::review_count.desc()),
        };

        if let Some(skip) = query.skip {
            items = items.offset(skip);
        }
        if let Some(take) = query.take {
            items = items.limit(take);
        }

        let items = items
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(TryInto::try_into).transpose()?)
    }

    fn get_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> RepositoryResult<HashMap<ProductId, Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let items = products::table
            .filter(products::id.eq_any(raw_ids))
            .load::<DbProduct>(&mut conn)?;

        let mut map = HashMap::with_capacity(items.len());
        for item in items {
            let product: Product = item.try_into()?;
            map.insert(product.id, product);
        }
        Ok(map)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let created: DbProduct = diesel::insert_into(products::table)
            .values(db_product)
            .get_result(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let mut changeset: ProductChangeset = product.clone().into();
        changeset.updated_at = Utc::now().naive_utc();

        let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set(changeset)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = diesel::delete(products::table.filter(products::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
