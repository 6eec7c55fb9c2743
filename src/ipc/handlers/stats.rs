use crate::ipc::error::ok;
use crate::ipc::helpers::require_role;
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use serde_json::json;

fn handle_stats_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(resp) = require_role(state, req, &[Role::Teacher, Role::Admin]) {
        return resp;
    }
    ok(&req.id, json!(state.roster.stats()))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.get" => Some(handle_stats_get(state, req)),
        _ => None,
    }
}
