//! Integration tests against the real binary and file store: state survives
//! a restart and periodic reports land in their log.

mod common;

use common::{SpawnedServer, TestClient, USERS};
use emcomd::store::LogKind;
use std::time::Duration;

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let port = 17311;

    let server = SpawnedServer::spawn(port, dir.path(), USERS)
        .await
        .expect("Failed to spawn server");
    {
        let mut alice = TestClient::login(&server.address(), "alice", "pw-alice")
            .await
            .unwrap();
        alice.request("criar canal:geral").await.unwrap();
        alice.request("entrar canal:geral").await.unwrap();
        alice.request("solicitar:DRE").await.unwrap();
        alice
            .request("criar_user:carol:pw1:Coordenador Regional")
            .await
            .unwrap();
        alice.request("mensagem:bob:guardada").await.unwrap();
    }
    server.stop();

    let server = SpawnedServer::spawn(port, dir.path(), USERS)
        .await
        .expect("Failed to respawn server");

    let mut alice = TestClient::login(&server.address(), "alice", "pw-alice")
        .await
        .unwrap();
    assert_eq!(
        alice.request("entrar canal:geral").await.unwrap(),
        "Você já está no canal geral"
    );

    let mut carol = TestClient::login(&server.address(), "carol", "pw1")
        .await
        .expect("created user survives restart");
    carol.send_line("aprovar").await.unwrap();
    assert_eq!(
        carol.recv_lines(3).await.unwrap()[1],
        "1. Cliente: alice | Tipo: DRE"
    );
    assert_eq!(
        carol.request("1").await.unwrap(),
        "Solicitação de DRE aprovada!"
    );

    let mut bob = TestClient::login(&server.address(), "bob", "pw-bob")
        .await
        .unwrap();
    assert_eq!(
        bob.request("ler mensagens").await.unwrap(),
        "De: alice Para: bob Mensagem: guardada"
    );

    assert!(
        server
            .read_log(LogKind::Requests)
            .contains("alice:DRE:APPROVED:carol")
    );
}

#[tokio::test]
async fn test_periodic_report_lists_clients() {
    let dir = tempfile::tempdir().unwrap();
    let server = SpawnedServer::spawn(17312, dir.path(), USERS)
        .await
        .expect("Failed to spawn server");

    let _alice = TestClient::login(&server.address(), "alice", "pw-alice")
        .await
        .unwrap();

    let mut found = false;
    for _ in 0..30 {
        if server
            .read_log(LogKind::Reports)
            .contains("Clientes Conectados: [alice]")
        {
            found = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(found, "no report listing alice");
    assert!(
        server
            .read_log(LogKind::Reports)
            .contains("Relatório Periódico - ")
    );
}
