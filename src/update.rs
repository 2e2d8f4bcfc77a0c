//! Release update probe. Not part of the conversion or playback core: every
//! failure path degrades to `None` so a broken network can never block a
//! conversion.

use std::time::Duration;

use log::debug;
use serde::Deserialize;

/// GitHub repository slug consulted for the latest release tag.
pub const UPDATE_REPO: &str = "pdf-narrator/pdf-narrator";

/// Overrides the release endpoint, for tests and mirrors.
pub const UPDATE_URL_ENV: &str = "NARRATOR_UPDATE_URL";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    tag_name: String,
}

/// Return the latest release tag when it differs from the running version.
pub fn check_latest() -> Option<String> {
    let url = std::env::var(UPDATE_URL_ENV).unwrap_or_else(|_| {
        format!("https://api.github.com/repos/{UPDATE_REPO}/releases/latest")
    });

    let release = match fetch_release(&url) {
        Ok(release) => release,
        Err(err) => {
            debug!("update check skipped: {err}");
            return None;
        }
    };

    let current = concat!("v", env!("CARGO_PKG_VERSION"));
    if release.tag_name != current {
        Some(release.tag_name)
    } else {
        None
    }
}

fn fetch_release(url: &str) -> Result<ReleaseInfo, reqwest::Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("pdf-narrator/", env!("CARGO_PKG_VERSION")))
        .build()?;
    client.get(url).send()?.error_for_status()?.json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    struct EnvVarGuard {
        key: &'static str,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: String) -> Self {
            std::env::set_var(key, value);
            Self { key }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            std::env::remove_var(self.key);
        }
    }

    /// One-shot HTTP server answering with the given body.
    fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/releases/latest")
    }

    #[test]
    #[serial]
    fn newer_tag_is_reported() {
        let url = serve_once(r#"{"tag_name":"v9.9.9"}"#);
        let _guard = EnvVarGuard::set(UPDATE_URL_ENV, url);
        assert_eq!(check_latest().as_deref(), Some("v9.9.9"));
    }

    #[test]
    #[serial]
    fn matching_tag_is_silent() {
        let body: &'static str = Box::leak(
            format!(r#"{{"tag_name":"v{}"}}"#, env!("CARGO_PKG_VERSION")).into_boxed_str(),
        );
        let url = serve_once(body);
        let _guard = EnvVarGuard::set(UPDATE_URL_ENV, url);
        assert_eq!(check_latest(), None);
    }

    #[test]
    #[serial]
    fn unreachable_endpoint_degrades_to_none() {
        let _guard = EnvVarGuard::set(
            UPDATE_URL_ENV,
            "http://127.0.0.1:9/releases/latest".to_string(),
        );
        assert_eq!(check_latest(), None);
    }
}
