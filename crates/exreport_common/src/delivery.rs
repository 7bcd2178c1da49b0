//! Report delivery over SMTP
//!
//! The transport speaks just enough SMTP to hand one message to a relay:
//! greeting, EHLO (HELO fallback), MAIL FROM, RCPT TO, DATA, QUIT. The
//! connection is opened and closed inside a single `send` call.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use tracing::{debug, info};

use crate::config::MailSettings;
use crate::error::{ReportError, Result};

/// Name announced in EHLO/HELO
const CLIENT_NAME: &str = "localhost";

/// One message ready for a mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from: String,
    pub to: String,
    /// Headers, blank line, body
    pub message: String,
}

impl OutgoingMail {
    /// HTML report mail addressed per the mail settings
    pub fn html_report(settings: &MailSettings, to: &str, html: &str) -> Self {
        Self {
            smtp_host: settings.smtp_host.clone(),
            smtp_port: settings.smtp_port,
            from: settings.from.clone(),
            to: to.to_string(),
            message: compose_message(&settings.subject, html),
        }
    }
}

/// Subject and HTML content type headers followed by the body
pub fn compose_message(subject: &str, html: &str) -> String {
    format!("Subject: {}\nContent-Type: text/html\n\n{}", subject, html)
}

/// Something that can send a composed message
pub trait MailTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

impl<T: MailTransport + ?Sized> MailTransport for &T {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        (**self).send(mail)
    }
}

/// Plain SMTP over TCP
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpTransport;

impl MailTransport for SmtpTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        info!("Connecting to SMTP {}:{}", mail.smtp_host, mail.smtp_port);
        let stream = TcpStream::connect((mail.smtp_host.as_str(), mail.smtp_port))
            .map_err(ReportError::Transport)?;
        let mut session = SmtpSession::new(stream)?;

        session.expect("greeting", &[220])?;
        if session.command(&format!("EHLO {}", CLIENT_NAME), "EHLO", &[250]).is_err() {
            session.command(&format!("HELO {}", CLIENT_NAME), "HELO", &[250])?;
        }
        session.command(&format!("MAIL FROM:<{}>", mail.from), "MAIL FROM", &[250])?;
        session.command(&format!("RCPT TO:<{}>", mail.to), "RCPT TO", &[250, 251])?;
        session.command("DATA", "DATA", &[354])?;
        session.write_data(&mail.message)?;
        session.expect("message", &[250])?;
        // The message is accepted; a failed QUIT changes nothing
        if let Err(e) = session.command("QUIT", "QUIT", &[221]) {
            debug!("SMTP QUIT: {}", e);
        }
        Ok(())
    }
}

struct SmtpSession {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl SmtpSession {
    fn new(stream: TcpStream) -> Result<Self> {
        let writer = stream.try_clone().map_err(ReportError::Transport)?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    fn command(&mut self, line: &str, stage: &'static str, accept: &[u16]) -> Result<String> {
        debug!("SMTP > {}", line);
        self.write_raw(&[line.as_bytes(), b"\r\n"])?;
        self.expect(stage, accept)
    }

    /// Read a (possibly multi-line) reply and check its code
    fn expect(&mut self, stage: &'static str, accept: &[u16]) -> Result<String> {
        let mut reply = String::new();
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(ReportError::Transport)?;
            if read == 0 {
                return Err(ReportError::Smtp {
                    stage,
                    reply: "connection closed".to_string(),
                });
            }
            let line = line.trim_end();
            debug!("SMTP < {}", line);
            reply.push_str(line);
            // "250-..." continues, "250 ..." ends
            if line.as_bytes().get(3) != Some(&b'-') {
                break;
            }
            reply.push('\n');
        }

        let code = reply.get(..3).and_then(|c| c.parse::<u16>().ok());
        match code {
            Some(code) if accept.contains(&code) => Ok(reply),
            _ => Err(ReportError::Smtp { stage, reply }),
        }
    }

    fn write_data(&mut self, message: &str) -> Result<()> {
        self.write_raw(&[dot_stuff(message).as_bytes(), b".\r\n"])
    }

    fn write_raw(&mut self, chunks: &[&[u8]]) -> Result<()> {
        let write = |writer: &mut TcpStream| -> std::io::Result<()> {
            for chunk in chunks {
                writer.write_all(chunk)?;
            }
            writer.flush()
        };
        write(&mut self.writer).map_err(ReportError::Transport)
    }
}

/// CRLF line endings with leading dots doubled, ending in CRLF
fn dot_stuff(message: &str) -> String {
    let mut out = String::with_capacity(message.len() + 64);
    for line in message.lines() {
        if line.starts_with('.') {
            out.push('.');
        }
        out.push_str(line);
        out.push_str("\r\n");
    }
    out
}
