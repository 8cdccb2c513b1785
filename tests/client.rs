//! Integration tests for the terminal client against an in-process server.

mod common;

use common::{TestClient, TestServer, USERS};
use emcomd::client::{self, DISCONNECTED, HELP_HINT, ID_PROMPT, PASSWORD_PROMPT};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::{sleep, timeout};

async fn run_scripted(server: &TestServer, script: &[u8]) -> Vec<String> {
    let mut screen = Vec::new();
    timeout(
        Duration::from_secs(5),
        client::run(&server.address(), script, &mut screen),
    )
    .await
    .expect("client finished")
    .expect("client ran");
    String::from_utf8(screen)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_client_logs_in_and_logs_out() {
    let server = TestServer::start(USERS).await.expect("server");
    let lines = run_scripted(&server, b"alice\npw-alice\najuda\nsair\n").await;

    assert_eq!(lines[0], ID_PROMPT);
    assert!(lines.iter().any(|l| l == PASSWORD_PROMPT));
    assert!(lines.iter().any(|l| l == HELP_HINT));
    assert!(lines.iter().any(|l| l == "Autenticação bem-sucedida! Bem-vindo, alice!"));
    assert!(lines.iter().any(|l| l == "Comandos disponíveis:"));
    assert_eq!(lines.last().map(String::as_str), Some(DISCONNECTED));
    server.wait_disconnected("alice").await.unwrap();
}

#[tokio::test]
async fn test_client_reports_failed_login() {
    let server = TestServer::start(USERS).await.expect("server");
    let lines = run_scripted(&server, b"alice\nerrada\n").await;

    assert!(
        lines
            .iter()
            .any(|l| l == "Autenticação falhou. Conexão encerrada.")
    );
    assert_eq!(lines.last().map(String::as_str), Some(DISCONNECTED));
    assert!(!server.matrix.session_manager.is_connected("alice"));
}

#[tokio::test]
async fn test_client_shows_deliveries_while_idle() {
    let server = TestServer::start(USERS).await.expect("server");
    let (mut keyboard, input) = tokio::io::duplex(1024);
    let (output, screen) = tokio::io::duplex(4096);

    let addr = server.address();
    let session = tokio::spawn(async move { client::run(&addr, input, output).await });

    keyboard.write_all(b"alice\npw-alice\n").await.unwrap();
    for _ in 0..100 {
        if server.matrix.session_manager.is_connected("alice") {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }
    assert!(server.matrix.session_manager.is_connected("alice"));

    let mut bob = TestClient::login(&server.address(), "bob", "pw-bob")
        .await
        .unwrap();
    assert_eq!(
        bob.request("mensagem:alice:abrigo na escola").await.unwrap(),
        "Mensagem enviada para alice."
    );

    let mut screen = BufReader::new(screen).lines();
    let delivered = timeout(Duration::from_secs(5), async {
        while let Some(line) = screen.next_line().await.unwrap() {
            if line == "Mensagem recebida de bob: abrigo na escola" {
                return true;
            }
        }
        false
    })
    .await
    .expect("delivery shown");
    assert!(delivered);

    // Closing the keyboard ends the session.
    drop(keyboard);
    timeout(Duration::from_secs(5), session)
        .await
        .expect("client finished")
        .unwrap()
        .unwrap();
    server.wait_disconnected("alice").await.unwrap();
}
