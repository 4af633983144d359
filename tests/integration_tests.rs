use acquiring::{AcquiringClient, CancelRequest, GetStateRequest, InitRequest};
use mockito::{Matcher, Server};
use serde_json::json;

fn test_client(base_url: &str) -> AcquiringClient {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    AcquiringClient::with_base_url("TestTerm", "secretpwd", base_url)
}

#[tokio::test]
async fn test_full_payment_flow() {
    let mut server = Server::new_async().await;

    // Session creation: the wire body must carry the exact token for
    // {Amount: 10000, OrderId: "order-1"} plus the credentials,
    // SHA-256("10000order-1secretpwdTestTerm").
    let init_mock = server
        .mock("POST", "/Init")
        .match_body(Matcher::PartialJson(json!({
            "TerminalKey": "TestTerm",
            "Amount": 10000,
            "OrderId": "order-1",
            "Token": "dbc40887b5d964bced6646bfcca6a1c4b05b6e27fe0c226b1b72874ebaa5eacc",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "TerminalKey": "TestTerm",
                "Success": true,
                "ErrorCode": "0",
                "Amount": 10000,
                "OrderId": "order-1",
                "Status": "NEW",
                "PaymentId": "13660",
                "PaymentURL": "https://securepay.example/rest/Aj9tQy"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = test_client(&server.url());

    let session = client
        .init(InitRequest::new(10000, "order-1"))
        .await
        .expect("session creation should succeed");
    assert_eq!(session.status, "NEW");
    assert_eq!(session.payment_id, "13660");
    assert!(!session.payment_url.is_empty());

    // The API reports the confirmed payment through a signed notification.
    let notification_body = json!({
        "TerminalKey": "TestTerm",
        "OrderId": "order-1",
        "Success": true,
        "Status": "CONFIRMED",
        "PaymentId": 13660,
        "ErrorCode": "0",
        "Amount": 10000,
        "Pan": "430000******0777",
        "ExpDate": "1122",
        "Token": "893e7d7c08dcc1690663b121a98a15d9e8ad2756c49a9fe7837b378937ee40fb"
    })
    .to_string();

    let notification = client
        .parse_notification(notification_body.as_bytes())
        .expect("genuine notification should verify");
    assert_eq!(notification.status, "CONFIRMED");
    assert_eq!(notification.payment_id, 13660);
    assert_eq!(client.notification_success_response(), "OK");

    // Partial refund of the confirmed payment.
    let cancel_mock = server
        .mock("POST", "/Cancel")
        .match_body(Matcher::PartialJson(json!({
            "TerminalKey": "TestTerm",
            "PaymentId": "13660",
            "Amount": 3000,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "TerminalKey": "TestTerm",
                "Success": true,
                "ErrorCode": "0",
                "OriginalAmount": 10000,
                "NewAmount": 7000,
                "OrderId": "order-1",
                "Status": "PARTIAL_REFUNDED",
                "PaymentId": "13660"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let refund = client
        .cancel(CancelRequest::new("13660").with_amount(3000))
        .await
        .expect("refund should succeed");
    assert_eq!(refund.new_amount, 7000);

    init_mock.assert_async().await;
    cancel_mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/GetState")
        .expect(2)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "TerminalKey": "TestTerm",
                "Success": true,
                "ErrorCode": "0",
                "OrderId": "order-1",
                "Status": "CONFIRMED",
                "PaymentId": "13660"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = test_client(&server.url());

    let (first, second) = tokio::join!(
        client.get_state(GetStateRequest::new("13660")),
        client.get_state(GetStateRequest::new("13660")),
    );

    assert_eq!(first.unwrap().status, "CONFIRMED");
    assert_eq!(second.unwrap().status, "CONFIRMED");
}

#[tokio::test]
async fn test_tampered_notification_never_reaches_business_logic() {
    let client = AcquiringClient::new("TestTerm", "secretpwd");

    let tampered = json!({
        "TerminalKey": "TestTerm",
        "OrderId": "order-1",
        "Success": true,
        "Status": "CONFIRMED",
        "PaymentId": 13660,
        "ErrorCode": "0",
        // Amount inflated after signing; token is the original one
        "Amount": 99999999,
        "Pan": "430000******0777",
        "ExpDate": "1122",
        "Token": "893e7d7c08dcc1690663b121a98a15d9e8ad2756c49a9fe7837b378937ee40fb"
    })
    .to_string();

    let err = client.parse_notification(tampered.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        acquiring::AcquiringError::SignatureVerification { .. }
    ));
}
