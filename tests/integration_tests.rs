use cep_lookup::{
    AddressHistoryManager, CepError, LocalStorage, LookupError, ViaCepClient, HISTORY_KEY,
};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

fn client_for(server: &MockServer) -> ViaCepClient {
    ViaCepClient::new(format!("{}/ws/{{cep}}/json/", server.base_url()))
        .with_timeout(Duration::from_secs(5))
}

fn paulista() -> serde_json::Value {
    serde_json::json!({
        "cep": "01310-100",
        "logradouro": "Av. Paulista",
        "complemento": "de 612 a 1510 - lado par",
        "bairro": "Bela Vista",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308"
    })
}

#[tokio::test]
async fn test_end_to_end_lookup_with_real_http() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/ws/01310-100/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(paulista());
    });

    let storage = LocalStorage::new(temp_dir.path());
    let manager = AddressHistoryManager::initialize(client_for(&server), storage.clone())
        .await
        .unwrap();

    let address = manager.lookup("01310-100").await.unwrap().unwrap();

    api_mock.assert();
    assert_eq!(address.street.as_deref(), Some("Av. Paulista"));
    assert_eq!(address.neighborhood.as_deref(), Some("Bela Vista"));
    assert_eq!(address.city.as_deref(), Some("São Paulo"));
    assert_eq!(address.state.as_deref(), Some("SP"));

    // 檔案內容是原始回應組成的陣列
    let stored = std::fs::read_to_string(storage.path_for(HISTORY_KEY)).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored, serde_json::json!([paulista()]));
}

#[tokio::test]
async fn test_end_to_end_not_found() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/ws/00000-000/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"erro": true}));
    });

    let storage = LocalStorage::new(temp_dir.path());
    let manager = AddressHistoryManager::initialize(client_for(&server), storage.clone())
        .await
        .unwrap();

    let address = manager.lookup("00000-000").await.unwrap();

    api_mock.assert();
    assert!(address.is_none());
    assert_eq!(manager.history_len().await, 0);
    assert!(!storage.path_for(HISTORY_KEY).exists());
}

#[tokio::test]
async fn test_end_to_end_service_failure_keeps_history() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ws/01310-100/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(paulista());
    });
    let failing = server.mock(|when, then| {
        when.method(GET).path("/ws/0131/json/");
        then.status(400).body("Bad Request");
    });

    let storage = LocalStorage::new(temp_dir.path());
    let manager = AddressHistoryManager::initialize(client_for(&server), storage)
        .await
        .unwrap();
    manager.lookup("01310-100").await.unwrap();

    let err = manager.lookup("0131").await.unwrap_err();

    failing.assert();
    assert!(matches!(
        err,
        CepError::Lookup(LookupError::Status { status: 400 })
    ));
    assert_eq!(manager.history_len().await, 1);
}

#[tokio::test]
async fn test_history_survives_restart_and_clear() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/ws/01310-100/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(paulista());
    });

    let first = AddressHistoryManager::initialize(
        client_for(&server),
        LocalStorage::new(temp_dir.path()),
    )
    .await
    .unwrap();
    first.lookup("01310-100").await.unwrap();
    first.lookup("01310-100").await.unwrap();
    let before = first.history().await;
    drop(first);

    api_mock.assert_hits(2);

    let second = AddressHistoryManager::initialize(
        client_for(&server),
        LocalStorage::new(temp_dir.path()),
    )
    .await
    .unwrap();
    assert_eq!(second.history().await, before);
    assert_eq!(before.len(), 2);

    second.clear_history().await.unwrap();
    second.clear_history().await.unwrap();

    let third = AddressHistoryManager::initialize(
        client_for(&server),
        LocalStorage::new(temp_dir.path()),
    )
    .await
    .unwrap();
    assert!(third.history().await.is_empty());
}
