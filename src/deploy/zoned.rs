use std::fmt;

use serde::Serialize;

use crate::http::{self, WorkersApi, WorkersRoute};
use crate::terminal::message::{Message, StdErr};

/// Routes to point at a script within one zone.
#[derive(Clone, Debug, PartialEq)]
pub struct ZonedTarget {
    pub zone_id: String,
    pub script_name: String,
    pub patterns: Vec<String>,
}

impl ZonedTarget {
    pub fn build(script_name: &str, zone_id: &str, routes: &[String]) -> Self {
        let patterns = routes
            .iter()
            .filter_map(|route| {
                if route.trim().is_empty() {
                    StdErr::warn("your configuration file contains an empty route");
                    None
                } else {
                    Some(route.clone())
                }
            })
            .collect();

        ZonedTarget {
            zone_id: zone_id.to_string(),
            script_name: script_name.to_string(),
            patterns,
        }
    }

    /// Never fails as a whole: a pattern that could not be published comes
    /// back as `RouteUploadResult::Error`.
    pub fn deploy(&self, api: &impl WorkersApi) -> Vec<RouteUploadResult> {
        log::info!("publishing to zone {}", self.zone_id);

        // One listing up front decides everything. Another client could change
        // the routes in between; the results report what actually happened.
        let existing_routes = match api.list_routes(&self.zone_id) {
            Ok(routes) => routes,
            Err(e) => {
                log::warn!("could not list routes for zone {}: {}", self.zone_id, e);
                let message = http::format_error(&e);
                return self
                    .patterns
                    .iter()
                    .map(|pattern| RouteUploadResult::Error {
                        pattern: pattern.clone(),
                        message: message.clone(),
                    })
                    .collect();
            }
        };

        self.patterns
            .iter()
            .map(|pattern| self.deploy_route(api, pattern, &existing_routes))
            .collect()
    }

    fn deploy_route(
        &self,
        api: &impl WorkersApi,
        pattern: &str,
        existing_routes: &[WorkersRoute],
    ) -> RouteUploadResult {
        if let Some(existing) = existing_routes.iter().find(|r| r.pattern == pattern) {
            if existing.script.as_deref() == Some(self.script_name.as_str()) {
                return RouteUploadResult::Same(existing.clone());
            }
            return RouteUploadResult::Conflict(existing.clone());
        }

        match api.create_route(&self.zone_id, pattern, &self.script_name) {
            Ok(created) => RouteUploadResult::New(created),
            Err(e) => RouteUploadResult::Error {
                pattern: pattern.to_string(),
                message: http::format_error(&e),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RouteUploadResult {
    Same(WorkersRoute),
    Conflict(WorkersRoute),
    New(WorkersRoute),
    Error { pattern: String, message: String },
}

impl RouteUploadResult {
    pub fn needs_attention(&self) -> bool {
        matches!(self, RouteUploadResult::Error { .. } | RouteUploadResult::Conflict(_))
    }
}

impl fmt::Display for RouteUploadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteUploadResult::Same(route) => write!(f, "{} => stayed the same", route.pattern),
            RouteUploadResult::Conflict(route) => write!(
                f,
                "{} => is already pointing to {}",
                route.pattern,
                route.script.as_deref().unwrap_or("null worker")
            ),
            RouteUploadResult::New(route) => write!(f, "{} => created", route.pattern),
            RouteUploadResult::Error { pattern, message } => {
                write!(f, "{} => creation failed: {}", pattern, message)
            }
        }
    }
}
