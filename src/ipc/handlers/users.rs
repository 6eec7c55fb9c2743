use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{forbidden, require_role, role_param, str_param};
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use serde_json::json;

fn handle_users_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let caller = match require_role(state, req, &[Role::Admin, Role::Teacher]) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let role = match role_param(req, "role") {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    // Teachers only need the student picker.
    if caller.role == Role::Teacher && role != Role::Student {
        return forbidden(req, caller.role);
    }

    ok(
        &req.id,
        json!({ "role": role, "users": state.roster.users(role) }),
    )
}

fn handle_users_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(resp) = require_role(state, req, &[Role::Admin]) {
        return resp;
    }
    let role = match role_param(req, "role") {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let Some(username) = str_param(req, "username") else {
        return err(&req.id, "bad_params", "missing username", None);
    };

    let removed = state.roster.delete_user(role, username);
    if removed {
        tracing::info!(%role, username, "user deleted");
    }
    ok(
        &req.id,
        json!({ "role": role, "username": username, "removed": removed }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "users.list" => Some(handle_users_list(state, req)),
        "users.delete" => Some(handle_users_delete(state, req)),
        _ => None,
    }
}
