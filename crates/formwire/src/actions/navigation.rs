// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Turning redirect outcomes into navigation that cannot resubmit the form.

use serde_json::json;

use super::outcome::InvocationOutcome;
use crate::adapter::SubmissionMode;
use crate::response::FormwireResponse;

/// Header telling a scripted caller where to navigate.
pub const CLIENT_REDIRECT_HEADER: &str = "x-formwire-redirect";

/// How the client is sent to the new location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// `303 See Other`: the browser follows with a GET, so reloading the
    /// target page never replays the POST.
    SeeOther,
    /// A `200` carrying the location for script to navigate to.
    ClientNavigate,
}

/// A navigation instruction for the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationDirective {
    /// How to navigate.
    pub kind: NavigationKind,
    /// Where to.
    pub location: String,
}

impl NavigationDirective {
    /// HTTP status of the response.
    pub fn status(&self) -> u16 {
        match self.kind {
            NavigationKind::SeeOther => 303,
            NavigationKind::ClientNavigate => 200,
        }
    }

    /// Builds the response.
    pub fn into_response(self) -> FormwireResponse {
        match self.kind {
            NavigationKind::SeeOther => FormwireResponse::see_other(self.location),
            NavigationKind::ClientNavigate => FormwireResponse::json(
                200,
                json!({ "type": "redirect", "location": self.location }),
            )
            .with_header(CLIENT_REDIRECT_HEADER, self.location),
        }
    }
}

/// Maps outcomes to navigation directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectController;

impl RedirectController {
    /// Returns a directive for `Redirect` outcomes and `None` for everything
    /// else.
    pub fn on_outcome(&self, outcome: &InvocationOutcome, mode: SubmissionMode) -> Option<NavigationDirective> {
        let InvocationOutcome::Redirect { location } = outcome else {
            return None;
        };
        let kind = match mode {
            SubmissionMode::Native => NavigationKind::SeeOther,
            SubmissionMode::Enhanced => NavigationKind::ClientNavigate,
        };
        Some(NavigationDirective {
            kind,
            location: location.clone(),
        })
    }
}
