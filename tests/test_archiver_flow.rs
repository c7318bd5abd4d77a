//! End-to-end session matching what an archiving client does against the
//! fixture database: discover groups, select each one, download every
//! article by number, quit.


use anyhow::Result;
use nntp_mock::ServerOptions;
use test_helpers::{TestClient, code, spawn_fixture_server};

#[tokio::test]
async fn test_greeting_is_201() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (client, greeting) = TestClient::connect(&server).await?;

    assert_eq!(greeting, "201 nntp-mock server ready (no posting)");
    assert_eq!(code(&client.quit().await?), "205");

    server.shutdown().await
}

#[tokio::test]
async fn test_capabilities_advertise_reader() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;

    let (_, caps) = client.multiline("CAPABILITIES", "101").await?;
    assert_eq!(caps[0], "VERSION 2");
    assert!(caps.iter().any(|c| c == "READER"));
    assert!(caps.iter().any(|c| c.starts_with("LIST ACTIVE")));
    assert!(!caps.iter().any(|c| c.starts_with("POST")));

    client.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_list_reports_all_groups() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;

    let (_, active) = client.multiline("LIST", "215").await?;
    assert_eq!(
        active,
        vec![
            "test.groups.bar 1 1 n".to_string(),
            "test.groups.foo 2 1 n".to_string(),
        ]
    );

    let (_, newsgroups) = client.multiline("LIST NEWSGROUPS test.groups.f*", "215").await?;
    assert_eq!(newsgroups, vec!["test.groups.foo\tFoo mailing list archive"]);

    client.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_download_every_article() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;

    let (_, active) = client.multiline("LIST", "215").await?;
    let mut downloaded = Vec::new();

    for line in active {
        let name = line.split(' ').next().unwrap_or_default().to_string();
        let status = client.command(&format!("GROUP {name}")).await?;
        let fields: Vec<&str> = status.split(' ').collect();
        assert_eq!(fields[0], "211", "GROUP {name}: {status}");
        let low: u64 = fields[2].parse()?;
        let high: u64 = fields[3].parse()?;

        for n in low..=high {
            let (status, lines) = client.multiline(&format!("ARTICLE {n}"), "220").await?;
            downloaded.push((name.clone(), n, status, lines));
        }
    }

    assert_eq!(downloaded.len(), 3);

    let (group, number, status, lines) = &downloaded[1];
    assert_eq!(group, "test.groups.foo");
    assert_eq!(*number, 1);
    assert_eq!(status, "220 1 <foo-1@example.com>");
    assert_eq!(lines[0], "From: Alice <alice@example.com>");
    let blank = lines.iter().position(String::is_empty).unwrap();
    assert_eq!(lines[blank + 1], "Hello from foo.");
    assert_eq!(lines.last().unwrap(), "This is the first article.");

    client.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_dot_stuffed_body_line_round_trips() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;

    client.command("GROUP test.groups.foo").await?;
    client.send_raw(b"BODY 2\r\n").await?;
    assert_eq!(client.read_line().await?, "222 2 <foo-2@example.com>");

    // Read the raw wire lines before undoing the stuffing
    assert_eq!(client.read_line().await?, "> Hello from foo.");
    assert_eq!(client.read_line().await?, "..leading dot survives dot-stuffing");
    assert_eq!(client.read_line().await?, "Reply body.");
    assert_eq!(client.read_line().await?, ".");

    client.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_generated_message_id() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;

    client.command("GROUP test.groups.bar").await?;
    let stat = client.command("STAT 1").await?;
    assert_eq!(stat, "223 1 <1.test.groups.bar@nntp-mock>");

    let (_, head) = client
        .multiline("HEAD <1.test.groups.bar@nntp-mock>", "221")
        .await?;
    assert!(head.contains(&"Message-ID: <1.test.groups.bar@nntp-mock>".to_string()));

    client.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_navigation_and_overview() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;

    assert_eq!(client.command("GROUP test.groups.foo").await?, "211 2 1 2 test.groups.foo");
    assert_eq!(client.command("NEXT").await?, "223 2 <foo-2@example.com>");
    assert_eq!(code(&client.command("NEXT").await?), "421");
    assert_eq!(client.command("LAST").await?, "223 1 <foo-1@example.com>");

    let (_, over) = client.multiline("OVER 1-", "224").await?;
    assert_eq!(over.len(), 2);
    let fields: Vec<&str> = over[1].split('\t').collect();
    assert_eq!(fields[0], "2");
    assert_eq!(fields[1], "Re: First post");
    assert_eq!(fields[4], "<foo-2@example.com>");
    assert_eq!(fields[5], "<foo-1@example.com>");

    let (_, subjects) = client.multiline("HDR Subject 1-2", "225").await?;
    assert_eq!(subjects, vec!["1 First post", "2 Re: First post"]);

    client.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_posting_is_refused() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;

    assert_eq!(code(&client.command("POST").await?), "440");
    assert_eq!(code(&client.command("IHAVE <new@example.com>").await?), "435");

    client.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_concurrent_clients_have_independent_state() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut first, _) = TestClient::connect(&server).await?;
    let (mut second, _) = TestClient::connect(&server).await?;

    first.command("GROUP test.groups.foo").await?;
    assert_eq!(code(&second.command("STAT 1").await?), "412");
    assert_eq!(code(&first.command("STAT 1").await?), "223");

    first.quit().await?;
    second.quit().await?;
    server.shutdown().await
}

#[tokio::test]
async fn test_shutdown_notifies_connected_clients() -> Result<()> {
    let server = spawn_fixture_server(ServerOptions::default()).await?;
    let (mut client, _) = TestClient::connect(&server).await?;
    assert_eq!(code(&client.command("DATE").await?), "111");

    server.shutdown().await?;
    assert_eq!(code(&client.read_line().await?), "400");
    Ok(())
}
