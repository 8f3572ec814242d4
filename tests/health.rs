use storefront_api::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert!(response.0.success);
    assert_eq!(response.0.message.as_deref(), Some("Server is running"));
    assert!(response.0.data.is_none());
}
