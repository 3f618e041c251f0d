//! Alerts for reporting failed requests to users.
//!
//! Error alerts are swapped into the `#alert-container` element that every page
//! includes, via `hx-target-error` or out-of-band swaps.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message with the styling for its kind.
///
/// Only errors are reported this way. Successful actions redirect instead.
#[derive(Debug, Clone)]
pub enum Alert {
    /// An error message with details on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_markup(self) -> Markup {
        let Alert::Error { message, details } = self;

        html! {
            div
                role="alert"
                class=(ERROR_STYLE)
            {
                div class="flex justify-between items-start gap-4"
                {
                    div
                    {
                        p class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1 text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="text-sm underline"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "Dismiss"
                    }
                }
            }
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

const ERROR_STYLE: &str = "p-4 mb-4 rounded-lg border text-red-800 bg-red-50 \
    border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";
