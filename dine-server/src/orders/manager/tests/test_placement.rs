use super::*;

#[tokio::test]
async fn test_place_binds_table_and_sends_to_kitchen() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;

    assert!(!f.is_occupied(t1).await);
    let placed = f.placed_order(&ada, pasta.id, 2, t1).await;

    assert_eq!(placed.order.status, OrderStatus::Completed);
    assert_eq!(placed.order.table_id, Some(t1));
    assert_eq!(placed.table_name.as_deref(), Some("T1"));
    assert_eq!(placed.order.total_amount, 28.0);
    assert!(f.is_occupied(t1).await);
}

#[tokio::test]
async fn test_place_requires_items_and_table() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;

    assert!(matches!(
        f.manager.place_order(&ada, PlaceOrder::default()).await,
        Err(ManagerError::NoActiveCart)
    ));

    let cart = f.manager.add_to_cart(&ada, pasta.id, Some(1)).await.unwrap();
    assert!(matches!(
        f.manager.place_order(&ada, PlaceOrder::default()).await,
        Err(ManagerError::TableRequired)
    ));

    f.manager
        .remove_cart_item(&as_customer(&ada), cart.items[0].id)
        .await
        .unwrap();
    assert!(matches!(
        f.manager
            .place_order(
                &ada,
                PlaceOrder {
                    order_id: None,
                    table_id: Some(t1)
                }
            )
            .await,
        Err(ManagerError::OrderEmpty(_))
    ));
    assert!(!f.is_occupied(t1).await);
}

#[tokio::test]
async fn test_occupied_table_rejected_for_another_party() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let bob = f.customer("Bob").await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;

    f.placed_order(&ada, pasta.id, 1, t1).await;

    f.manager.add_to_cart(&bob, pasta.id, Some(1)).await.unwrap();
    let result = f
        .manager
        .place_order(
            &bob,
            PlaceOrder {
                order_id: None,
                table_id: Some(t1),
            },
        )
        .await;
    assert!(matches!(result, Err(ManagerError::TableOccupied(id)) if id == t1));

    let bob_cart = f.manager.cart(&bob).await.unwrap().unwrap();
    assert_eq!(bob_cart.order.status, OrderStatus::Pending);
    assert_eq!(bob_cart.order.table_id, None);
}

#[tokio::test]
async fn test_walk_in_hold_blocks_placement() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let chef = f.staff().await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;

    f.manager.set_table_occupancy(&chef, t1, true).await.unwrap();
    f.manager.add_to_cart(&ada, pasta.id, Some(1)).await.unwrap();
    assert!(matches!(
        f.manager
            .place_order(
                &ada,
                PlaceOrder {
                    order_id: None,
                    table_id: Some(t1)
                }
            )
            .await,
        Err(ManagerError::TableOccupied(_))
    ));
}

#[tokio::test]
async fn test_replace_after_adding_keeps_own_table() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;

    let placed = f.placed_order(&ada, pasta.id, 1, t1).await;
    f.manager.add_to_cart(&ada, pasta.id, Some(1)).await.unwrap();

    // table is occupied, but by this very order
    let again = f
        .manager
        .place_order(&ada, PlaceOrder::default())
        .await
        .unwrap();
    assert_eq!(again.order.id, placed.order.id);
    assert_eq!(again.order.status, OrderStatus::Completed);
    assert_eq!(again.order.total_amount, 28.0);
}

#[tokio::test]
async fn test_moving_table_releases_the_old_one() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;
    let t2 = f.table("T2").await;

    let placed = f.placed_order(&ada, pasta.id, 1, t1).await;
    let moved = f
        .manager
        .place_order(
            &ada,
            PlaceOrder {
                order_id: Some(placed.order.id),
                table_id: Some(t2),
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.order.table_id, Some(t2));
    assert!(!f.is_occupied(t1).await);
    assert!(f.is_occupied(t2).await);
}

#[tokio::test]
async fn test_cannot_place_someone_elses_order() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let bob = f.customer("Bob").await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;

    let cart = f.manager.add_to_cart(&ada, pasta.id, Some(1)).await.unwrap();
    assert!(matches!(
        f.manager
            .place_order(
                &bob,
                PlaceOrder {
                    order_id: Some(cart.order.id),
                    table_id: Some(t1)
                }
            )
            .await,
        Err(ManagerError::NotOrderOwner(_))
    ));
}

#[tokio::test]
async fn test_payment_pending_order_cannot_be_placed() {
    let f = fixture().await;
    let ada = f.customer("Ada").await;
    let pasta = f.product("Pasta", 14.0).await;
    let t1 = f.table("T1").await;

    let placed = f.placed_order(&ada, pasta.id, 1, t1).await;
    f.manager
        .request_payment(&as_customer(&ada), placed.order.id)
        .await
        .unwrap();

    assert!(matches!(
        f.manager.place_order(&ada, PlaceOrder::default()).await,
        Err(ManagerError::OrderNotEditable { .. })
    ));
}
