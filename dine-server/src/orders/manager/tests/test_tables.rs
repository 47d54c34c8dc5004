use super::*;

#[tokio::test]
async fn test_staff_add_item_opens_walk_in_order() {
    let f = fixture().await;
    let chef = f.staff().await;
    let fries = f.product("Fries", 4.5).await;
    let t1 = f.table("T1").await;

    let detail = f
        .manager
        .add_item_to_table(
            &chef,
            t1,
            TableItemAdd {
                product_id: fries.id,
                quantity: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(detail.order.customer_id, None);
    assert_eq!(detail.order.table_id, Some(t1));
    assert_eq!(detail.order.total_amount, 9.0);
    assert!(f.is_occupied(t1).await);

    // second add lands on the same order
    let detail2 = f
        .manager
        .add_item_to_table(
            &chef,
            t1,
            TableItemAdd {
                product_id: fries.id,
                quantity: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(detail2.order.id, detail.order.id);
    assert_eq!(detail2.items[0].quantity, 3);

    let overview = f.manager.table_overview(t1).await.unwrap();
    assert_eq!(overview.current_order.unwrap().id, detail.order.id);
    assert_eq!(overview.total_amount, 13.5);
}

#[tokio::test]
async fn test_staff_add_item_to_customer_order_reopens_it() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let chef = f.staff().await;
    let fries = f.product("Fries", 4.5).await;
    let t1 = f.table("T1").await;

    let placed = f.placed_order(&ada, fries.id, 1, t1).await;
    let detail = f
        .manager
        .add_item_to_table(
            &chef,
            t1,
            TableItemAdd {
                product_id: fries.id,
                quantity: Some(1),
            },
        )
        .await
        .unwrap();
    assert_eq!(detail.order.id, placed.order.id);
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.order.total_amount, 9.0);
}

#[tokio::test]
async fn test_unknown_table() {
    let f = fixture().await;
    let chef = f.staff().await;

    assert!(matches!(
        f.manager.table_overview(77).await,
        Err(ManagerError::TableNotFound(77))
    ));
    assert!(matches!(
        f.manager.open_split_order(&chef, 77).await,
        Err(ManagerError::TableNotFound(77))
    ));
    assert!(matches!(
        f.manager.delete_table(77).await,
        Err(ManagerError::TableNotFound(77))
    ));
}

#[tokio::test]
async fn test_delete_table_blocked_by_active_orders() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let chef = f.staff().await;
    let fries = f.product("Fries", 4.5).await;
    let t1 = f.table("T1").await;

    let placed = f.placed_order(&ada, fries.id, 1, t1).await;
    assert!(matches!(
        f.manager.delete_table(t1).await,
        Err(ManagerError::TableHasActiveOrders(_))
    ));

    f.manager
        .complete_payment(&chef, placed.order.id, &cash())
        .await
        .unwrap();
    f.manager.delete_table(t1).await.unwrap();

    // history survives with no table reference
    let detail = f
        .manager
        .order_detail(&as_staff(&chef), placed.order.id)
        .await
        .unwrap();
    assert_eq!(detail.order.table_id, None);
    assert_eq!(detail.order.status, OrderStatus::Paid);
}

#[tokio::test]
async fn test_manual_hold_and_release() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let chef = f.staff().await;
    let fries = f.product("Fries", 4.5).await;
    let t1 = f.table("T1").await;

    let held = f.manager.set_table_occupancy(&chef, t1, true).await.unwrap();
    assert!(held.is_occupied);
    let released = f.manager.set_table_occupancy(&chef, t1, false).await.unwrap();
    assert!(!released.is_occupied);

    f.placed_order(&ada, fries.id, 1, t1).await;
    assert!(matches!(
        f.manager.set_table_occupancy(&chef, t1, false).await,
        Err(ManagerError::TableHasActiveOrders(_))
    ));
    assert!(f.is_occupied(t1).await);
}

#[tokio::test]
async fn test_orders_for_table_lists_history() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let chef = f.staff().await;
    let fries = f.product("Fries", 4.5).await;
    let t1 = f.table("T1").await;

    let first = f.placed_order(&ada, fries.id, 1, t1).await;
    f.manager
        .complete_payment(&chef, first.order.id, &cash())
        .await
        .unwrap();
    f.placed_order(&ada, fries.id, 2, t1).await;

    let orders = f.manager.orders_for_table(t1).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(f.manager.active_orders().await.unwrap().len(), 1);
}
