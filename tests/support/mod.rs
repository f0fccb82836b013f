// Scripted HTTP endpoint for driving the uploader end to end. Each
// accepted connection consumes one `Reply`; the raw request text is kept
// so tests can look at what was sent.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use lpix_send::config::{Settings, MEGABYTE};

pub enum Reply {
    /// 200 with this body.
    Body(&'static str),
    /// Headers promise more body than is sent, then the socket closes.
    Truncated,
    /// Read the request and hang up without answering.
    Hangup,
}

pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    pub fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept() else { return };
                let request = read_request(&mut stream);
                seen.lock().unwrap().push(request);
                answer(&mut stream, reply);
            }
        });

        MockServer { url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn settings(&self) -> Settings {
        Settings {
            username: "MayOrMayNotBeACat".into(),
            password: "hunter2".into(),
            endpoint: self.url.clone(),
            gallery: "Default".into(),
            limit_bytes: MEGABYTE,
            timeout: None,
            unknown_code_fatal: true,
        }
    }
}

fn answer(stream: &mut TcpStream, reply: Reply) {
    let raw = match reply {
        Reply::Body(body) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ),
        Reply::Truncated => "HTTP/1.1 200 OK\r\nContent-Length: 200\r\nConnection: close\r\n\r\n{\"imageurl\":\"ht"
            .to_string(),
        Reply::Hangup => String::new(),
    };
    let _ = stream.write_all(raw.as_bytes());
    let _ = stream.flush();
    let _ = stream.shutdown(Shutdown::Write);
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let head_end = loop {
        if let Some(i) = find(&buf, b"\r\n\r\n") {
            break i + 4;
        }
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&buf).into_owned(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());

    loop {
        let done = match content_length {
            Some(len) => buf.len() >= head_end + len,
            None => buf.ends_with(b"0\r\n\r\n"),
        };
        if done {
            break;
        }
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
