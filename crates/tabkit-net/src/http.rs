//! Minimal HTTP/1.1 GET client.
//!
//! Plain HTTP over `std::net::TcpStream`. HTTPS is refused with an
//! [`TabsError::AdapterFetch`] error; hosts that need TLS plug in their own
//! [`Fetcher`].

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tabkit_types::error::{Result, TabsError};
use url::Url;

use crate::{FetchResponse, Fetcher};

/// Maximum response body size (8 MB).
const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: u8 = 5;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(15);

fn fetch_err(msg: impl Into<String>) -> TabsError {
    TabsError::AdapterFetch(msg.into())
}

/// Blocking HTTP/1.1 fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            user_agent: format!("tabkit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetcher for HttpFetcher {
    /// GET a URL, following redirects (301/302/307/308) up to
    /// [`MAX_REDIRECTS`] hops.
    fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        let mut current = url.clone();
        for _ in 0..MAX_REDIRECTS {
            match current.scheme() {
                "http" => {},
                "https" => return Err(fetch_err(format!("TLS not available for {current}"))),
                other => return Err(fetch_err(format!("unsupported scheme: {other}"))),
            }

            let resp = do_request(&current, &self.user_agent)?;
            if is_redirect(resp.head.status)
                && let Some(location) = resp.head.header("location")
            {
                current = current
                    .join(location)
                    .map_err(|e| fetch_err(format!("bad redirect Location {location}: {e}")))?;
                log::debug!("Following redirect to {current}");
                continue;
            }

            return Ok(FetchResponse {
                url: current.to_string(),
                status: resp.head.status,
                content_type: resp.head.header("content-type").map(str::to_string),
                body: resp.body,
            });
        }
        Err(fetch_err("too many redirects"))
    }
}

// -------------------------------------------------------------------
// Internals
// -------------------------------------------------------------------

/// Status line and headers.
#[derive(Debug)]
struct Head {
    status: u16,
    headers: Vec<(String, String)>,
}

impl Head {
    fn parse(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw).map_err(|_| fetch_err("non-UTF-8 headers"))?;
        let mut lines = text.split("\r\n");
        let status = parse_status_line(lines.next().unwrap_or_default())?;
        let headers = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
            .collect();
        Ok(Self { status, headers })
    }

    /// Case-insensitive header lookup.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn framing(&self) -> Result<Framing> {
        if self
            .header("transfer-encoding")
            .is_some_and(|v| v.contains("chunked"))
        {
            return Ok(Framing::Chunked);
        }
        match self.header("content-length") {
            Some(raw) => raw
                .parse()
                .map(Framing::Length)
                .map_err(|_| fetch_err("bad Content-Length")),
            None => Ok(Framing::UntilClose),
        }
    }
}

/// How the body is delimited.
enum Framing {
    Chunked,
    Length(usize),
    UntilClose,
}

#[derive(Debug)]
struct HttpResponse {
    head: Head,
    body: Vec<u8>,
}

fn do_request(url: &Url, user_agent: &str) -> Result<HttpResponse> {
    let host = url
        .host_str()
        .ok_or_else(|| fetch_err(format!("URL has no host: {url}")))?;
    let port = url.port_or_known_default().unwrap_or(80);

    let addr = format!("{host}:{port}")
        .to_socket_addrs()
        .map_err(|e| fetch_err(format!("DNS resolution failed: {e}")))?
        .next()
        .ok_or_else(|| fetch_err(format!("no addresses for {host}:{port}")))?;
    let mut stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
        .map_err(|e| fetch_err(format!("TCP connect failed: {e}")))?;
    stream
        .set_read_timeout(Some(READ_TIMEOUT))
        .map_err(|e| fetch_err(format!("set read timeout: {e}")))?;

    send_request(&mut stream, url, user_agent)?;
    let raw = read_response(&mut stream)?;
    parse_response(&raw)
}

fn send_request(stream: &mut impl Write, url: &Url, user_agent: &str) -> Result<()> {
    let host_header = match (url.host_str(), url.port()) {
        (Some(h), Some(p)) => format!("{h}:{p}"),
        (Some(h), None) => h.to_string(),
        (None, _) => String::new(),
    };
    let path = match url.query() {
        Some(q) => format!("{}?{q}", url.path()),
        None => url.path().to_string(),
    };
    let request = format!(
        "GET {path} HTTP/1.1\r\n\
         Host: {host_header}\r\n\
         User-Agent: {user_agent}\r\n\
         Accept: */*\r\n\
         Connection: close\r\n\
         \r\n"
    );
    stream
        .write_all(request.as_bytes())
        .map_err(|e| fetch_err(format!("send request: {e}")))
}

/// Slack allowed on top of the body cap for the status line and headers.
const HEAD_ALLOWANCE: usize = 4096;

/// Read until EOF or until the read timeout fires.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>> {
    let limit = (MAX_BODY_SIZE + HEAD_ALLOWANCE) as u64;
    let mut raw = Vec::new();
    match stream.take(limit + 1).read_to_end(&mut raw) {
        Ok(_) => {},
        // A timeout after the server stops sending ends the response.
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {},
        Err(e) => return Err(fetch_err(format!("read response: {e}"))),
    }
    if raw.len() as u64 > limit {
        return Err(fetch_err("response too large"));
    }
    Ok(raw)
}

fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let split = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| fetch_err("malformed HTTP response: no header terminator"))?;
    let head = Head::parse(&data[..split])?;
    let rest = &data[split + 4..];

    let body = match head.framing()? {
        Framing::Chunked => decode_chunked(rest)?,
        Framing::Length(len) if len > MAX_BODY_SIZE => {
            return Err(fetch_err("response body exceeds 8 MB limit"));
        },
        Framing::Length(len) => rest[..len.min(rest.len())].to_vec(),
        Framing::UntilClose => rest.to_vec(),
    };
    Ok(HttpResponse { head, body })
}

/// Parse the status code from `HTTP/1.x NNN REASON`.
fn parse_status_line(line: &str) -> Result<u16> {
    line.split(' ')
        .nth(1)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| fetch_err(format!("bad status line: {line}")))
}

/// Decode a chunked body. A body cut off mid-chunk keeps what arrived.
fn decode_chunked(mut rest: &[u8]) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(eol) = rest.windows(2).position(|w| w == b"\r\n") {
        let size = std::str::from_utf8(&rest[..eol])
            .ok()
            .and_then(|line| line.split(';').next())
            .and_then(|hex| usize::from_str_radix(hex.trim(), 16).ok())
            .ok_or_else(|| fetch_err("bad chunk size"))?;
        if size == 0 {
            break;
        }
        rest = &rest[eol + 2..];
        let available = size.min(rest.len());
        if body.len() + available > MAX_BODY_SIZE {
            return Err(fetch_err("chunked body exceeds 8 MB limit"));
        }
        body.extend_from_slice(&rest[..available]);
        match rest.get(size + 2..) {
            Some(next) if available == size => rest = next,
            _ => break,
        }
    }
    Ok(body)
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 307 | 308)
}
