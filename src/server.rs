// ABOUTME: Local HTTP listener that hands a generated document to the browser
// ABOUTME: Serves the standalone presentation page from memory with tiny_http

use crate::errors::{Result, SlideError};
use log::{debug, error, info};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// A bound listener holding one document.
pub struct DocumentServer {
    server: Server,
    html: String,
}

impl DocumentServer {
    /// Bind to `127.0.0.1:port`. Port 0 picks a free port.
    pub fn bind(html: String, port: u16) -> Result<Self> {
        let server = Server::http(("127.0.0.1", port))
            .map_err(|e| SlideError::ServeError(format!("Failed to start HTTP server: {}", e)))?;
        Ok(Self { server, html })
    }

    pub fn port(&self) -> Option<u16> {
        self.server.server_addr().to_ip().map(|addr| addr.port())
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port().unwrap_or_default())
    }

    /// Answer requests until the listener is closed.
    pub fn serve_forever(&self) -> Result<()> {
        info!("HTTP server listening on {}", self.url());
        for request in self.server.incoming_requests() {
            self.respond(request);
        }
        Ok(())
    }

    /// Answer at most `count` requests, then return.
    pub fn serve_requests(&self, count: usize) -> Result<()> {
        for _ in 0..count {
            let request = self
                .server
                .recv()
                .map_err(|e| SlideError::ServeError(format!("Failed to receive request: {}", e)))?;
            self.respond(request);
        }
        Ok(())
    }

    fn respond(&self, request: Request) {
        let url_path = request.url().split('?').next().unwrap_or("/").to_string();
        debug!("Request for {:?}", url_path);

        let result = match url_path.as_str() {
            "/" | "/index.html" => {
                let response = Response::from_string(self.html.clone());
                match Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
                    Ok(header) => request.respond(response.with_header(header)),
                    Err(()) => request.respond(response),
                }
            }
            _ => request.respond(
                Response::from_string("404 Not Found").with_status_code(StatusCode(404)),
            ),
        };

        if let Err(e) = result {
            error!("Failed to send response: {}", e);
        }
    }
}
