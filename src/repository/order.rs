use diesel::prelude::*;

use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::domain::types::{OrderId, UserId};
use crate::models::decimal_to_db;
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
    OrderItem as DbOrderItem,
};
use crate::repository::{
    DieselRepository, OrderReader, OrderWriter, RepositoryError, RepositoryResult,
};

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let order = orders::table
            .filter(orders::id.eq(id.get()))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        Ok(order.map(TryInto::try_into).transpose()?)
    }

    fn list_orders_by_customer(&self, customer_id: UserId) -> RepositoryResult<Vec<Order>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let items = orders::table
            .filter(orders::customer_id.eq(customer_id.get()))
            .order(orders::created_at.desc())
            .load::<DbOrder>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Order>, _>>()?;

        Ok(items)
    }

    fn list_order_items(&self, order_id: OrderId) -> RepositoryResult<Vec<OrderItem>> {
        use crate::schema::order_items;

        let mut conn = self.conn()?;

        let items = order_items::table
            .filter(order_items::order_id.eq(order_id.get()))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<OrderItem>, _>>()?;

        Ok(items)
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, order: &NewOrder, items: &[NewOrderItem]) -> RepositoryResult<Order> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let created = conn.transaction::<DbOrder, RepositoryError, _>(|conn| {
            let db_order: DbNewOrder = order.clone().into();

            let created: DbOrder = diesel::insert_into(orders::table)
                .values(db_order)
                .get_result(conn)?;

            let db_items: Vec<DbNewOrderItem> = items
                .iter()
                .map(|item| DbNewOrderItem {
                    order_id: created.id,
                    product_id: item.product_id.get(),
                    quantity: item.quantity.get(),
                    unit_price: decimal_to_db(item.unit_price),
                })
                .collect();

            diesel::insert_into(order_items::table)
                .values(&db_items)
                .execute(conn)?;

            Ok(created)
        })?;

        Ok(created.try_into()?)
    }
}
