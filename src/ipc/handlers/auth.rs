use crate::ipc::error::{err, ok, roster_err};
use crate::ipc::helpers::{role_param, str_param};
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use crate::roster::RosterError;
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let role = match role_param(req, "role") {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let username = str_param(req, "username").unwrap_or("");
    let password = str_param(req, "password").unwrap_or("");

    match state.roster.authenticate(role, username, password) {
        Ok(user) => {
            let user = user.clone();
            tracing::info!(%role, username = %user.username, "login");
            let resp = ok(&req.id, json!({ "user": user }));
            state.session.login(user);
            resp
        }
        Err(e) => {
            tracing::debug!(%role, username, "login rejected");
            roster_err(&req.id, &e)
        }
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let role = state.session.role();
    let was_logged_in = state.session.logout();
    if let Some(role) = role {
        tracing::info!(%role, "logout");
    }
    ok(&req.id, json!({ "loggedOut": was_logged_in }))
}

fn handle_session(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "user": state.session.current() }))
}

fn handle_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    // An unselected role is an empty form field, not a malformed request.
    let role = match str_param(req, "role").map(str::trim) {
        None | Some("") => return roster_err(&req.id, &RosterError::MissingField("role")),
        Some(raw) => match raw.parse::<Role>() {
            Ok(r) => r,
            Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
        },
    };
    let username = str_param(req, "username").unwrap_or("");
    let password = str_param(req, "password").unwrap_or("");
    let full_name = str_param(req, "fullName").unwrap_or("");

    match state.roster.register(role, username, password, full_name) {
        Ok(user) => {
            tracing::info!(%role, username = %user.username, "registered");
            ok(&req.id, json!({ "user": user }))
        }
        Err(e) => roster_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        "auth.session" => Some(handle_session(state, req)),
        "auth.register" => Some(handle_register(state, req)),
        _ => None,
    }
}
