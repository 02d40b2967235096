//! Fixtures shared by the integration and CLI tests.
#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::net::TcpListener;

use cpe2csv::fetch::DICTIONARY_FILE;

/// Wrap `items` in a `cpe-list` root in the dictionary namespace.
pub fn dictionary(items: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<cpe-list xmlns="http://cpe.mitre.org/dictionary/2.0"
          xmlns:cpe-23="http://scap.nist.gov/schema/cpe-extension/2.3"
          xmlns:meta="http://scap.nist.gov/schema/cpe-dictionary-metadata/0.2">
  <generator>
    <product_name>National Vulnerability Database (NVD)</product_name>
    <schema_version>2.3</schema_version>
  </generator>
{items}
</cpe-list>
"#
    )
}

/// A small dictionary resembling the NVD feed.
pub fn sample_dictionary() -> String {
    dictionary(
        r#"  <cpe-item name="cpe:/a:apache:http_server:2.4.0">
    <title xml:lang="en-US">Apache HTTP Server 2.4.0</title>
    <cpe-23:cpe23-item name="cpe:2.3:a:apache:http_server:2.4.0:*:*:*:*:*:*:*"/>
  </cpe-item>
  <cpe-item name="cpe:/a:openbsd:openssh:9.0:p1">
    <title xml:lang="en-US">OpenBSD OpenSSH 9.0 p1</title>
    <references>
      <reference href="https://www.openssh.com/">Product</reference>
      <reference href="https://www.openssh.com/txt/release-9.0">Change Log</reference>
    </references>
    <cpe-23:cpe23-item name="cpe:2.3:a:openbsd:openssh:9.0:p1:*:*:*:*:*:*"/>
  </cpe-item>
  <cpe-item name="cpe:/o:microsoft:windows_7:-:sp1:x64:en-us">
    <cpe-23:cpe23-item name="cpe:2.3:o:microsoft:windows_7:-:sp1:x64:*:*:*:*:*"/>
  </cpe-item>
"#,
    )
}

/// A zip archive holding `xml` under the well-known dictionary name.
pub fn dictionary_archive(xml: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(DICTIONARY_FILE, zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Serve a single HTTP response on a loopback port and return its URL.
pub fn serve_once(status: &str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let status = status.to_string();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        // Drain the request head before answering.
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
    });

    format!("http://{addr}/feeds/xml/cpe/dictionary/official-cpe-dictionary_v2.3.xml.zip")
}
