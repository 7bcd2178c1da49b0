//! SMTP transport against a scripted loopback server.

use exreport_common::{MailTransport, OutgoingMail, ReportError, SmtpTransport};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

/// Serve one SMTP session; returns every line the client sent
fn spawn_server(rcpt_reply: &'static str) -> (u16, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);
        let mut received = Vec::new();
        let mut in_data = false;

        writer.write_all(b"220 test.local ESMTP ready\r\n").unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 {
                break;
            }
            let line = line.trim_end_matches("\r\n").to_string();
            received.push(line.clone());

            if in_data {
                if line == "." {
                    in_data = false;
                    writer.write_all(b"250 2.0.0 queued\r\n").unwrap();
                }
                continue;
            }

            let reply: &str = if line.starts_with("EHLO") {
                "250-test.local\r\n250 SIZE 1000000\r\n"
            } else if line.starts_with("MAIL FROM") {
                "250 ok\r\n"
            } else if line.starts_with("RCPT TO") {
                rcpt_reply
            } else if line == "DATA" {
                in_data = true;
                "354 go ahead\r\n"
            } else if line == "QUIT" {
                writer.write_all(b"221 bye\r\n").unwrap();
                break;
            } else {
                "500 unknown\r\n"
            };
            writer.write_all(reply.as_bytes()).unwrap();
        }
        received
    });

    (port, handle)
}

fn mail(port: u16) -> OutgoingMail {
    OutgoingMail {
        smtp_host: "127.0.0.1".to_string(),
        smtp_port: port,
        from: "exception_reporter".to_string(),
        to: "ops@example.com".to_string(),
        message: "Subject: Exception Report\nContent-Type: text/html\n\n<html>\n.hidden\n</html>"
            .to_string(),
    }
}

#[test]
fn test_sends_one_message() {
    let (port, server) = spawn_server("250 ok\r\n");

    SmtpTransport.send(&mail(port)).unwrap();
    let received = server.join().unwrap();

    assert_eq!(received[0], "EHLO localhost");
    assert_eq!(received[1], "MAIL FROM:<exception_reporter>");
    assert_eq!(received[2], "RCPT TO:<ops@example.com>");
    assert_eq!(received[3], "DATA");
    assert_eq!(
        &received[4..],
        &[
            "Subject: Exception Report",
            "Content-Type: text/html",
            "",
            "<html>",
            "..hidden",
            "</html>",
            ".",
            "QUIT",
        ]
    );
}

#[test]
fn test_rejected_recipient_propagates() {
    let (port, server) = spawn_server("550 5.1.1 no such user\r\n");

    let err = SmtpTransport.send(&mail(port)).unwrap_err();
    match err {
        ReportError::Smtp { stage, reply } => {
            assert_eq!(stage, "RCPT TO");
            assert!(reply.starts_with("550"));
        }
        other => panic!("unexpected error: {other}"),
    }

    drop(server);
}

#[test]
fn test_connection_refused_is_transport_error() {
    // bind then drop to get a port nothing listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let err = SmtpTransport.send(&mail(port)).unwrap_err();
    assert!(matches!(err, ReportError::Transport(_)));
}
