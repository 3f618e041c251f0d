#![allow(missing_docs)]

pub(crate) mod fakes;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod hx;

pub(crate) use fakes::{FakeTransport, TEST_USER, test_identity_config, test_user};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::assert_status_ok;
pub(crate) use hx::assert_hx_endpoint;
