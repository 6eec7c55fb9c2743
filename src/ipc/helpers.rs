use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::model::{Role, User};

pub fn str_param<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

pub fn role_param(req: &Request, key: &str) -> Result<Role, serde_json::Value> {
    let Some(raw) = str_param(req, key) else {
        return Err(err(&req.id, "bad_params", format!("missing {key}"), None));
    };
    raw.parse::<Role>()
        .map_err(|e| err(&req.id, "bad_params", e.to_string(), None))
}

/// The signed-in user, cloned so handlers may go on to mutate the roster.
pub fn require_login(state: &AppState, req: &Request) -> Result<User, serde_json::Value> {
    state
        .session
        .current()
        .cloned()
        .ok_or_else(|| err(&req.id, "not_logged_in", "log in first", None))
}

pub fn require_role(
    state: &AppState,
    req: &Request,
    allowed: &[Role],
) -> Result<User, serde_json::Value> {
    let user = require_login(state, req)?;
    if !allowed.contains(&user.role) {
        return Err(forbidden(req, user.role));
    }
    Ok(user)
}

pub fn forbidden(req: &Request, role: Role) -> serde_json::Value {
    err(
        &req.id,
        "forbidden",
        format!("{} users may not call {}", role, req.method),
        None,
    )
}
